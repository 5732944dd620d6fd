/*
 * Responsibility
 * - Logging + panic hook
 * - Config → pool → migrations → services → AppState
 * - Router assembly (routes + HTTP layers) and axum::serve with graceful shutdown
 */
use std::{panic, process, sync::Arc};

use anyhow::{Context, Result};
use axum::Router;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::config::Config;
use crate::db;
use crate::middleware::auth::GuardConfigError;
use crate::middleware::http::{self, HttpLimits};
use crate::repos::{PaymentStore, PgPaymentRepo, PgUserRepo, UserStore};
use crate::services::security::TokenIssuer;
use crate::services::{BusinessService, SecurityService};
use crate::state::AppState;

fn init_tracing() {
    // RUST_LOG wins when set, e.g.
    // RUST_LOG=info,payments_api=trace,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        tracing_subscriber::EnvFilter::new("info,payments_api=debug,tower_http=info")
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash loudly. Production: keep serving.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    let config = Config::from_env().context("loading configuration")?;
    init_panic_hook(!config.app_env.is_production());

    tracing::info!(config = ?config, "starting payments API in {:?} mode", config.app_env);

    let pool = db::connect(&config)
        .await
        .context("connecting to postgres")?;
    db::run_migrations(&pool)
        .await
        .context("running migrations")?;

    let tokens = TokenIssuer::new(
        &config.auth_token_secret,
        config.auth_issuer.clone(),
        config.access_token_ttl_seconds,
        config.access_token_leeway_seconds,
    );
    let state = build_state(
        Arc::new(PgUserRepo::new(pool.clone())),
        Arc::new(PgPaymentRepo::new(pool.clone())),
        tokens,
    );

    if let Some(admin) = &config.bootstrap_admin {
        let (user_id, created) = state
            .security
            .ensure_admin(&admin.login, &admin.password)
            .await
            .context("bootstrapping admin account")?;
        tracing::info!(user_id, created, "bootstrap admin ready");
    }

    let app = build_router(state, HttpLimits::from(&config))?;

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("binding {}", config.addr))?;
    tracing::info!(addr = %config.addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;
    tracing::info!("server stopped");
    Ok(())
}

/// Wire services over the given stores. The security service is injected a
/// second time as the resolver / role-checker capabilities.
pub fn build_state(
    users: Arc<dyn UserStore>,
    payments: Arc<dyn PaymentStore>,
    tokens: TokenIssuer,
) -> AppState {
    let security = Arc::new(SecurityService::new(users, tokens));
    let business = Arc::new(BusinessService::new(payments));
    AppState::new(security, business)
}

pub fn build_router(state: AppState, limits: HttpLimits) -> Result<Router, GuardConfigError> {
    let router = api::routes(&state)?.with_state(state);
    Ok(http::apply(router, limits))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received SIGINT, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
