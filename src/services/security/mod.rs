/*
 * Responsibility
 * - Registration / login (password hashing, token issuance)
 * - Token → Principal resolution and role membership checks
 * - No HTTP types in here
 */
pub mod password;
mod service;
pub mod token;

pub use service::{DEFAULT_ROLES, SecurityError, SecurityService};
pub use token::{Token, TokenError, TokenIssuer};
