//! Stage 1: pull the bearer credential off the request.
//!
//! Never rejects. Whatever is found (or `Credential::Absent`) goes into the
//! request extensions for the authentication stage.

use axum::{
    body::Body,
    http::{HeaderMap, Request, header},
    middleware::Next,
    response::Response,
};

use crate::identity::{Credential, RawCredential};

/// Read `Authorization: Bearer <token>`. Anything else counts as absent.
pub fn extract(headers: &HeaderMap) -> Credential {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| Credential::Bearer(RawCredential::new(token)))
        .unwrap_or(Credential::Absent)
}

pub async fn extract_credential(mut req: Request<Body>, next: Next) -> Response {
    let credential = extract(req.headers());
    req.extensions_mut().insert(credential);
    next.run(req).await
}
