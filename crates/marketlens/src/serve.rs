// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service wiring and the `serve` command.

use std::sync::Arc;

use marketlens_agent::Analyst;
use marketlens_config::model::MarketlensConfig;
use marketlens_core::{DocumentStore, MarketlensError};
use marketlens_gateway::{GatewayState, ServerConfig, start_server};
use marketlens_gemini::{API_KEY_NAME, GeminiProvider};
use marketlens_retrieval::ModelManager;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber. `RUST_LOG` overrides `log_level`.
pub fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(log_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

fn default_filter(log_level: &str) -> String {
    format!("marketlens={log_level},warn")
}

/// Logs the effective settings. The API key itself is never logged.
pub fn log_startup_banner(config: &MarketlensConfig, api_key_present: bool) {
    info!(
        provider = %config.llm.provider,
        model = %config.gemini.model,
        router_model = %config.gemini.router_model,
        embeddings = %config.embedding.model,
        documents = %config.documents.directory,
        "starting {}",
        config.app.name
    );
    info!(
        chunk_size = config.documents.chunk_size,
        chunk_overlap = config.documents.chunk_overlap,
        top_k = config.documents.top_k,
        guardrails = config.guardrails.enabled,
        max_input_chars = config.guardrails.max_input_chars,
        "retrieval and guardrail settings"
    );
    if api_key_present {
        info!("{API_KEY_NAME} configured");
    } else {
        error!("{API_KEY_NAME} not configured; LLM-backed endpoints will report errors");
    }
}

/// Embeds the corpus into an in-memory store.
pub async fn build_document_store(
    config: &MarketlensConfig,
) -> Result<Arc<dyn DocumentStore>, MarketlensError> {
    let manager = ModelManager::new(&config.embedding.data_dir, &config.embedding.model);
    let embedder = manager.embedder().await?;
    let store = marketlens_retrieval::build_store(embedder, &config.documents).await?;
    Ok(Arc::new(store))
}

/// Builds the analyst. A corpus that fails to load leaves the service
/// running without a store, and QA then reports the store as unavailable.
pub async fn build_analyst(config: &MarketlensConfig) -> Result<Analyst, MarketlensError> {
    let provider = Arc::new(GeminiProvider::new(&config.gemini)?);

    let store = match build_document_store(config).await {
        Ok(store) => Some(store),
        Err(e) => {
            warn!(error = %e, "document store unavailable; QA will be degraded");
            None
        }
    };

    Ok(Analyst::new(provider, store, config))
}

/// Runs the HTTP API until SIGINT or SIGTERM.
pub async fn run_serve(config: MarketlensConfig) -> Result<(), MarketlensError> {
    init_tracing(&config.app.log_level);
    log_startup_banner(&config, config.gemini.resolved_api_key().is_some());

    let analyst = build_analyst(&config).await?;
    info!(chunks = analyst.indexed_chunks(), "analyst ready");

    let analyst = Arc::new(analyst);
    let state = GatewayState::new(analyst.clone(), &config.app.name);
    let server = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };
    let served = start_server(&server, state).await;
    analyst.shutdown().await;
    served
}
