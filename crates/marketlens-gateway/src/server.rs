// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use marketlens_agent::Analyst;
use marketlens_agent::shutdown::shutdown_signal;
use marketlens_core::MarketlensError;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::handlers;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub analyst: Arc<Analyst>,
    /// Service name shown by the index and health endpoints.
    pub app_name: Arc<str>,
}

impl GatewayState {
    pub fn new(analyst: Arc<Analyst>, app_name: &str) -> Self {
        Self {
            analyst,
            app_name: Arc::from(app_name),
        }
    }
}

/// Bind address for the server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Builds the application router.
///
/// - GET / and GET /api/v1/health
/// - POST /api/v1/qa, /api/v1/summary, /api/v1/extract, /api/v1/auto
pub fn router(state: GatewayState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/qa", post(handlers::post_qa))
        .route("/summary", post(handlers::post_summary))
        .route("/extract", post(handlers::post_extract))
        .route("/auto", post(handlers::post_auto));

    Router::new()
        .route("/", get(handlers::get_index))
        .nest("/api/v1", api_routes)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serves the API until SIGINT or SIGTERM.
pub async fn start_server(config: &ServerConfig, state: GatewayState) -> Result<(), MarketlensError> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| MarketlensError::Internal(format!("failed to bind server to {addr}: {e}")))?;

    tracing::info!("API server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| MarketlensError::Internal(format!("server error: {e}")))?;

    tracing::info!("API server stopped");
    Ok(())
}
