/*
 * Responsibility
 * - POST/GET /user/payments: scoped to the authenticated sender
 * - GET /admin/payments: unscoped listing
 * - Role checks already happened in the pipeline; handlers only read the principal
 */
use axum::{
    Form, Json,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
};

use crate::{
    api::{
        dto::payments::{CreatePaymentForm, PaymentResponse},
        extractors::Authenticated,
    },
    error::AppError,
    services::business::Payment,
    state::AppState,
};

pub async fn create_payment(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
    form: Result<Form<CreatePaymentForm>, FormRejection>,
) -> Result<(StatusCode, Json<PaymentResponse>), AppError> {
    let Form(form) = form?;
    let amount = form
        .validate()
        .map_err(|msg| AppError::bad_request("INVALID_AMOUNT", msg))?;

    let sender_id = principal.id();
    let id = state.business.create_payment(sender_id, amount).await?;

    Ok((
        StatusCode::CREATED,
        Json(PaymentResponse {
            id,
            sender_id,
            amount,
        }),
    ))
}

pub async fn list_own_payments(
    State(state): State<AppState>,
    Authenticated(principal): Authenticated,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let payments = state.business.get_user_payments(principal.id()).await?;
    Ok(Json(to_responses(payments)))
}

pub async fn list_all_payments(
    State(state): State<AppState>,
) -> Result<Json<Vec<PaymentResponse>>, AppError> {
    let payments = state.business.get_all_payments().await?;
    Ok(Json(to_responses(payments)))
}

fn to_responses(payments: Vec<Payment>) -> Vec<PaymentResponse> {
    payments.into_iter().map(PaymentResponse::from).collect()
}
