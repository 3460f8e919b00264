pub mod auth;
pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod services;
pub mod state;
pub mod storage;
pub mod upload;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::db::Store;
use crate::email::{LogNotifier, Notifier, SystemMailer};
use crate::middleware::identity::attach_identity;
use crate::rate_limit::LoginRateLimiter;
use crate::state::{AppState, SharedState};
use crate::storage::ImageStore;

/// SMTP mailer when configured, otherwise a notifier that only logs.
pub fn notifier_from_config(config: &Config) -> Arc<dyn Notifier> {
    match config.smtp.as_ref().map(SystemMailer::new) {
        Some(Ok(mailer)) => {
            tracing::info!("System SMTP configured");
            Arc::new(mailer)
        }
        Some(Err(e)) => {
            tracing::warn!("System SMTP not available: {e}");
            Arc::new(LogNotifier)
        }
        None => {
            tracing::warn!("System SMTP not configured; password reset links are only logged at debug");
            Arc::new(LogNotifier)
        }
    }
}

pub fn build_app(
    store: Arc<dyn Store>,
    notifier: Arc<dyn Notifier>,
    images: Arc<dyn ImageStore>,
    config: Config,
) -> Router {
    let upload_dir = config.upload_dir.clone();
    let max_body_size = config.max_body_size;

    let state: SharedState = Arc::new(AppState {
        store,
        notifier,
        images,
        config,
        login_limiter: LoginRateLimiter::new(),
    });

    Router::new()
        .merge(
            routes::api_routes().layer(axum::middleware::from_fn_with_state(
                state.clone(),
                attach_identity,
            )),
        )
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .route("/health", axum::routing::get(health))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive())
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
                .layer(DefaultBodyLimit::max(max_body_size)),
        )
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
