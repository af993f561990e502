pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod hooks;
pub mod middleware;
pub mod models;
pub mod operations;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod suggestions;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Database;
use crate::email::SystemMailer;
use crate::hooks::email::EmailNotifier;
use crate::hooks::HookRegistry;
use crate::middleware::auth_redirect::redirect_unauthorized;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};

pub fn build_app(db: Database, config: Config) -> Router {
    build_router(build_state(db, config))
}

/// Wire stores, hooks and limiters together.
pub fn build_state(db: Database, config: Config) -> SharedState {
    // Unknown-email logins must not pay for the first dummy hash
    auth::password::prepare_dummy();

    let mut hooks = HookRegistry::new();

    if config.features.email_notifications {
        match config.smtp.as_ref().map(SystemMailer::new) {
            Some(Ok(mailer)) => {
                tracing::info!("Email notifications enabled");
                hooks.register(Arc::new(EmailNotifier::new(
                    Arc::new(mailer),
                    db.settings.clone(),
                    config.base_url.clone(),
                )));
            }
            Some(Err(e)) => tracing::warn!("Email notifications unavailable: {e}"),
            None => tracing::warn!("Email notifications enabled but SMTP is not configured"),
        }
    }

    Arc::new(AppState {
        db,
        config,
        hooks,
        login_limiter: LoginRateLimiter::new(),
    })
}

pub fn build_router(state: SharedState) -> Router {
    let max_body_size = state.config.max_body_size;

    Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes().layer(axum::middleware::from_fn(redirect_unauthorized)))
        .route("/health", axum::routing::get(health))
        // Security headers
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .layer(RequestBodyLimitLayer::new(max_body_size))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
