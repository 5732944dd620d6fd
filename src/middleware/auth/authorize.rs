//! Stage 3: role gate.
//!
//! A [`RoleGuard`] holds the roles a route accepts (any-of) and the
//! role-checker capability it delegates to.

use std::fmt;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{Extensions, Request},
    middleware::Next,
    response::Response,
};
use thiserror::Error;

use crate::error::AppError;
use crate::identity::{Principal, Role, RoleChecker};

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum GuardConfigError {
    #[error("a role guard needs at least one role")]
    EmptyRoleSet,
}

#[derive(Clone)]
pub struct RoleGuard {
    checker: Arc<dyn RoleChecker>,
    required: Arc<[Role]>,
}

impl fmt::Debug for RoleGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RoleGuard")
            .field("required", &self.required)
            .finish()
    }
}

impl RoleGuard {
    /// Accept principals holding at least one of `roles`.
    pub fn any_of(
        checker: Arc<dyn RoleChecker>,
        roles: impl IntoIterator<Item = Role>,
    ) -> Result<Self, GuardConfigError> {
        let mut required: Vec<Role> = roles.into_iter().collect();
        required.sort();
        required.dedup();

        if required.is_empty() {
            return Err(GuardConfigError::EmptyRoleSet);
        }

        Ok(Self {
            checker,
            required: required.into(),
        })
    }

    pub fn required(&self) -> &[Role] {
        &self.required
    }

    /// A request without a principal is never allowed.
    pub fn allows(&self, extensions: &Extensions) -> bool {
        match Principal::from_extensions(extensions) {
            Ok(principal) => self.checker.has_any_role(principal, &self.required),
            Err(_) => false,
        }
    }
}

pub async fn authorize(
    State(guard): State<RoleGuard>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    if !guard.allows(req.extensions()) {
        tracing::info!(required = ?guard.required(), "access denied");
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
