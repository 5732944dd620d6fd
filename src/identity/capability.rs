//! Capabilities the request pipeline consumes.
//!
//! The security service implements both traits; the pipeline receives them
//! as `Arc<dyn ...>` at wiring time and never names the concrete type.

use async_trait::async_trait;

use super::{Principal, RawCredential, Role};
use crate::services::security::SecurityError;

/// Maps a raw credential to a verified principal.
#[async_trait]
pub trait PrincipalResolver: Send + Sync {
    async fn resolve(&self, credential: &RawCredential) -> Result<Principal, SecurityError>;
}

/// Answers "does this principal hold at least one of these roles?".
pub trait RoleChecker: Send + Sync {
    fn has_any_role(&self, principal: &Principal, roles: &[Role]) -> bool;
}
