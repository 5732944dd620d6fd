/*
 * Responsibility
 * - POST /users (register) and PUT /users (login), both answer with a token
 * - Form → validate() → SecurityService; errors become AppError
 */
use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
};

use crate::{
    api::dto::users::{CredentialsForm, TokenResponse},
    error::AppError,
    state::AppState,
};

pub async fn register(
    State(state): State<AppState>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let Form(form) = form?;
    let (login, password) = form
        .validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let token = state.security.register(login, password).await?;

    Ok((StatusCode::CREATED, Json(TokenResponse { token })))
}

pub async fn login(
    State(state): State<AppState>,
    form: Result<Form<CredentialsForm>, FormRejection>,
) -> Result<Json<TokenResponse>, AppError> {
    let Form(form) = form?;
    let (login, password) = form
        .validate()
        .map_err(|msg| AppError::bad_request("INVALID_REQUEST", msg))?;

    let token = state.security.login(login, password).await?;

    Ok(Json(TokenResponse { token }))
}
