/*
 * Responsibility
 * - URL layout, split into three groups:
 *   - open:  /health, /public, /users
 *   - USER:  /user, /user/payments
 *   - ADMIN: /admin, /admin/payments
 * - Each guarded group gets the full auth pipeline via route_layer
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::{
    api::handlers::{
        areas::{admin_area, public_area, user_area},
        health::health,
        payments::{create_payment, list_all_payments, list_own_payments},
        users::{login, register},
    },
    identity::Role,
    middleware::auth::{GuardConfigError, RoleGuard, protect},
    state::AppState,
};

pub fn routes(state: &AppState) -> Result<Router<AppState>, GuardConfigError> {
    let open = Router::new()
        .route("/health", get(health))
        .route("/public", get(public_area))
        .route("/users", post(register).put(login));

    let user = protect(
        Router::new()
            .route("/user", get(user_area))
            .route(
                "/user/payments",
                get(list_own_payments).post(create_payment),
            ),
        state.resolver.clone(),
        RoleGuard::any_of(state.role_checker.clone(), [Role::User])?,
    );

    let admin = protect(
        Router::new()
            .route("/admin", get(admin_area))
            .route("/admin/payments", get(list_all_payments)),
        state.resolver.clone(),
        RoleGuard::any_of(state.role_checker.clone(), [Role::Admin])?,
    );

    Ok(open.merge(user).merge(admin))
}
