use std::collections::BTreeSet;

use axum::http::Extensions;
use thiserror::Error;

use super::Role;

/// Numeric identity of a user (primary key of the users table).
pub type UserId = i64;

/// Verified identity attached to a request by the authentication stage.
///
/// Fields are private: once a principal is in the request context nothing
/// downstream can change who the caller is or which roles they hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    id: UserId,
    roles: BTreeSet<Role>,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("no authenticated principal in request context")]
pub struct NoPrincipalInContext;

impl Principal {
    pub fn new(id: UserId, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            id,
            roles: roles.into_iter().collect(),
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Typed accessor for the principal stored by the authentication stage.
    ///
    /// Fails when authentication did not run for this request or did not
    /// succeed.
    pub fn from_extensions(extensions: &Extensions) -> Result<&Principal, NoPrincipalInContext> {
        extensions.get::<Principal>().ok_or(NoPrincipalInContext)
    }
}
