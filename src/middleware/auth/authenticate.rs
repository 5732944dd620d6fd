//! Stage 2: credential → Principal.
//!
//! The resolver is injected as `Arc<dyn PrincipalResolver>`. Every resolver
//! failure is reported as 401; the reason is only logged.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::error::AppError;
use crate::identity::{Credential, PrincipalResolver};

pub async fn authenticate(
    State(resolver): State<Arc<dyn PrincipalResolver>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // The credential is consumed here; later stages only see the principal.
    let credential = req
        .extensions_mut()
        .remove::<Credential>()
        .unwrap_or(Credential::Absent);

    let Credential::Bearer(raw) = credential else {
        tracing::debug!("no bearer credential presented");
        return Err(AppError::Unauthenticated);
    };

    let principal = match resolver.resolve(&raw).await {
        Ok(principal) => principal,
        Err(err) => {
            tracing::warn!(error = %err, "credential rejected");
            return Err(AppError::Unauthenticated);
        }
    };

    tracing::debug!(user_id = principal.id(), "request authenticated");
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
