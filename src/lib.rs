pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod merchant;
pub mod middleware;
pub mod models;
pub mod rate_limit;
pub mod routes;
pub mod state;
pub mod submission;
pub mod views;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderName, HeaderValue};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::client::SheetClient;
use crate::config::Config;
use crate::db::{SheetStore, StoreError};
use crate::rate_limit::AppendRateLimiter;
use crate::state::{AppState, SharedState};

pub fn build_app(
    store: Arc<dyn SheetStore>,
    config: Config,
) -> Result<(Router, SharedState), String> {
    let mut config = config;
    config.trust_loopback_for_local_sheet();

    let sheet_client = SheetClient::new(config.sheet.clone(), config.http_timeout_secs)?;

    let state: SharedState = Arc::new(AppState {
        store,
        append_limiter: AppendRateLimiter::new(config.rate_limit, config.rate_limit_window_secs),
        sheet_client,
        config,
    });

    let sheet = routes::sheet_routes().layer(axum::middleware::from_fn_with_state(
        state.clone(),
        middleware::cors::allow_origin,
    ));

    let app = Router::new()
        .merge(sheet)
        .merge(views::view_routes())
        .nest_service("/static", ServeDir::new("static"))
        .route("/health", axum::routing::get(health))
        .layer(RequestBodyLimitLayer::new(state.config.max_body_size))
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
        .layer(TraceLayer::new_for_http())
        .with_state(state.clone());

    Ok((app, state))
}

/// Startup work against the store: write the header row into an empty sheet.
pub async fn prepare_store(store: &dyn SheetStore, config: &Config) -> Result<(), StoreError> {
    if config.provision_header && db::provision_header(store).await? {
        tracing::info!("Wrote header row to empty {} sheet", store.kind());
    }
    Ok(())
}

/// Periodically drop stale rate-limit entries.
pub fn spawn_limiter_cleanup(state: SharedState) -> tokio::task::JoinHandle<()> {
    let window = Duration::from_secs(state.config.rate_limit_window_secs.max(1));
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(window * 2);
        loop {
            interval.tick().await;
            state.append_limiter.cleanup(window);
        }
    })
}

async fn health() -> &'static str {
    "ok"
}
