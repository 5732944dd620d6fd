use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::identity::Principal;

/// Hands the authenticated principal to a handler.
///
/// Relies on the auth pipeline having stored a `Principal` in the request
/// extensions; on a route without the pipeline this rejects with 401.
#[derive(Debug, Clone)]
pub struct Authenticated(pub Principal);

impl<S> FromRequestParts<S> for Authenticated
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let principal = Principal::from_extensions(&parts.extensions)?;
        Ok(Authenticated(principal.clone()))
    }
}
