pub mod core;
pub mod error_handler;
pub mod middleware_layer;
pub mod routes;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    middleware,
    routing::post,
};
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    core::app_state::{AppState, api_address_from_lookup},
    error_handler::{AppError, AppResult},
    middleware_layer::access_gate::{
        AccessGate, EXTENSION_KEY_HEADER, RejectionStyle, access_gate,
    },
    routes::{
        file_summary::file_summary_route::file_summary_route,
        impact::impact_route::impact_route,
        narrate::narrate_route::narrate_route,
        risk::risk_route::risk_route,
        search::search_route::search_route,
    },
};

/// Reads configuration from the environment, binds `API_ADDRESS` and serves
/// until Ctrl+C.
pub async fn start() -> AppResult<()> {
    let host_url = api_address_from_lookup(&|k| std::env::var(k).ok());
    let state = Arc::new(AppState::from_env()?);

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&host_url)
        .await
        .map_err(AppError::Bind)?;
    info!(address = %host_url, "GitLore API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    info!("GitLore API stopped");
    Ok(())
}

/// All routes with their gates and request tracing.
///
/// Search is called from the extension webview, so its sub-router carries
/// CORS outside the gate: preflights are answered without a key, and every
/// search response (gate rejections included) allows any origin.
pub fn build_router(state: Arc<AppState>) -> Router {
    let gate = |style| {
        middleware::from_fn_with_state(
            AccessGate::new(state.extension_secret.clone(), style),
            access_gate,
        )
    };

    let extension = Router::new()
        .route("/api/extension/impact", post(impact_route))
        .route("/api/extension/narrate", post(narrate_route))
        .route_layer(gate(RejectionStyle::Hard))
        .merge(
            Router::new()
                .route("/api/extension/risk", post(risk_route))
                .route_layer(gate(RejectionStyle::SoftRisk)),
        )
        .merge(
            Router::new()
                .route("/api/extension/search", post(search_route))
                .route_layer(gate(RejectionStyle::Search))
                .layer(search_cors()),
        );

    Router::new()
        .merge(extension)
        .route("/api/file-summary", post(file_summary_route))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn search_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(EXTENSION_KEY_HEADER),
        ])
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
