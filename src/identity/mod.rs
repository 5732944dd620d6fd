//! Transport-agnostic identity vocabulary.
//!
//! The request pipeline (`middleware::auth`) and the security service both
//! speak in these types. Neither side depends on the other directly: the
//! pipeline only sees the [`PrincipalResolver`] and [`RoleChecker`] traits.

mod capability;
mod credential;
mod principal;
mod role;

pub use capability::{PrincipalResolver, RoleChecker};
pub use credential::{Credential, RawCredential};
pub use principal::{NoPrincipalInContext, Principal, UserId};
pub use role::{Role, UnknownRole};
