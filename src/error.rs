/*
 * Responsibility
 * - AppError: the one error type handlers and middleware return
 * - IntoResponse (HTTP status + JSON error body)
 * - Translate security / business errors; internal detail goes to the log, never the client
 */
use axum::{
    Json,
    extract::rejection::FormRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::identity::NoPrincipalInContext;
use crate::services::business::BusinessError;
use crate::services::security::SecurityError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthenticated")]
    Unauthenticated,
    #[error("forbidden")]
    Forbidden,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHENTICATED",
                "authentication required".into(),
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "FORBIDDEN", "forbidden".into()),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<SecurityError> for AppError {
    fn from(e: SecurityError) -> Self {
        match e {
            SecurityError::Validation(message) => AppError::bad_request("INVALID_REQUEST", message),
            SecurityError::DuplicateLogin => {
                AppError::bad_request("DUPLICATE_LOGIN", "login already exists")
            }
            SecurityError::InvalidCredentials => {
                AppError::bad_request("INVALID_CREDENTIALS", "invalid login or password")
            }
            SecurityError::InvalidToken => AppError::Unauthenticated,
            SecurityError::Storage(err) => {
                tracing::error!(error = ?err, "security storage failure");
                AppError::Internal
            }
            SecurityError::Internal(err) => {
                tracing::error!(error = %err, "security internal failure");
                AppError::Internal
            }
        }
    }
}

impl From<BusinessError> for AppError {
    fn from(e: BusinessError) -> Self {
        match e {
            BusinessError::InvalidAmount(_) => {
                AppError::bad_request("INVALID_AMOUNT", "amount must be a positive integer")
            }
            BusinessError::Storage(err) => {
                tracing::error!(error = ?err, "payment storage failure");
                AppError::Internal
            }
        }
    }
}

impl From<FormRejection> for AppError {
    fn from(rejection: FormRejection) -> Self {
        tracing::debug!(error = %rejection, "form body rejected");
        AppError::bad_request("INVALID_REQUEST", rejection.body_text())
    }
}

impl From<NoPrincipalInContext> for AppError {
    fn from(_: NoPrincipalInContext) -> Self {
        AppError::Unauthenticated
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repos::RepoError;

    #[test]
    fn storage_failures_do_not_leak_detail() {
        let err: AppError = SecurityError::Storage(RepoError::Db(sqlx::Error::PoolTimedOut)).into();
        assert!(matches!(err, AppError::Internal));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn registration_failures_are_bad_requests() {
        for e in [SecurityError::DuplicateLogin, SecurityError::InvalidCredentials] {
            let status = AppError::from(e).into_response().status();
            assert_eq!(status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn authentication_and_authorization_statuses_differ() {
        assert_eq!(
            AppError::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.into_response().status(), StatusCode::FORBIDDEN);
    }
}
