// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The [`Analyst`] facade for the Marketlens service.
//!
//! The analyst is the single entry point used by the HTTP gateway and the CLI:
//! - Validates every input with the guardrails before any model call
//! - Runs the QA, summary, and extraction chains
//! - Auto-routes free-text requests to the matching chain

pub mod error;
pub mod shutdown;

use std::sync::Arc;

use marketlens_chains::{
    ExtractionChain, ExtractionResult, ExtractionSchema, QaAnswer, QaChain, SummaryChain,
};
use marketlens_config::model::MarketlensConfig;
use marketlens_core::{DocumentStore, HealthStatus, PluginAdapter, ProviderAdapter, RouteDecision};
use marketlens_guardrails::Guardrails;
use marketlens_router::AutoRouter;
use serde::Serialize;
use tracing::{debug, info, warn};

pub use error::AnalystError;

/// Summary length used by the auto route.
pub const AUTO_SUMMARY_WORDS: usize = 500;

/// Description given to extractions the router picked without a caller schema.
pub const AUTO_EXTRACT_DESCRIPTION: &str = "Extract key information";

/// Result of [`Analyst::auto_route`].
#[derive(Debug, Clone, Serialize)]
pub struct AutoOutcome {
    pub route: RouteDecision,
    pub result: AutoResult,
}

/// Route-specific payload; serializes to the body of the matching direct endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AutoResult {
    Qa(QaAnswer),
    Summary { summary: String },
    Extract { data: ExtractionResult },
}

/// Health of the analyst's collaborators.
#[derive(Debug, Clone)]
pub struct AnalystStatus {
    pub provider: HealthStatus,
    /// `None` when no store was built.
    pub store: Option<HealthStatus>,
    pub guardrails_enabled: bool,
}

impl AnalystStatus {
    /// Human-readable reasons the service is degraded, empty when all is well.
    pub fn problems(&self) -> Vec<String> {
        let mut problems: Vec<String> =
            self.provider.reason().map(str::to_string).into_iter().collect();
        match &self.store {
            None => problems.push("vector store not available".to_string()),
            Some(status) => problems.extend(status.reason().map(str::to_string)),
        }
        problems
    }
}

pub struct Analyst {
    guardrails: Guardrails,
    provider: Arc<dyn ProviderAdapter>,
    store: Option<Arc<dyn DocumentStore>>,
    qa: QaChain,
    summary: SummaryChain,
    extraction: ExtractionChain,
    router: AutoRouter,
}

impl Analyst {
    /// Wires the chains over `provider` and an optional document store.
    pub fn new(
        provider: Arc<dyn ProviderAdapter>,
        store: Option<Arc<dyn DocumentStore>>,
        config: &MarketlensConfig,
    ) -> Self {
        Self {
            guardrails: Guardrails::new(&config.guardrails),
            qa: QaChain::new(provider.clone(), store.clone(), config.documents.top_k),
            summary: SummaryChain::new(provider.clone()),
            extraction: ExtractionChain::new(provider.clone()),
            router: AutoRouter::new(provider.clone(), config.gemini.router_model.as_str()),
            provider,
            store,
        }
    }

    /// Answers a question from the document corpus.
    pub async fn answer(&self, question: &str) -> Result<QaAnswer, AnalystError> {
        self.guardrails.validate(question, "query")?;
        Ok(self.qa.answer(question).await)
    }

    /// Summarizes `text` in roughly `max_words` words.
    pub async fn summarize(&self, text: &str, max_words: usize) -> Result<String, AnalystError> {
        self.guardrails.validate(text, "summary")?;
        Ok(self.summary.summarize(text, max_words).await)
    }

    /// Fills `schema` from `text`.
    ///
    /// The facade owns the empty-schema check and reports it as
    /// `InvalidRequest("Schema is required")`, the HTTP detail callers see.
    /// `ExtractionError::EmptySchema` is only produced by direct chain use.
    pub async fn extract(
        &self,
        text: &str,
        schema: &ExtractionSchema,
        description: Option<&str>,
    ) -> Result<ExtractionResult, AnalystError> {
        self.guardrails.validate(text, "extract")?;
        if schema.is_empty() {
            return Err(AnalystError::InvalidRequest("Schema is required".into()));
        }
        Ok(self.extraction.extract(text, schema, description).await?)
    }

    /// Picks a task for the request and runs it.
    ///
    /// A non-empty `schema` always means extraction over `text` (or `question`).
    /// Otherwise the trimmed `question` (or `text`) is classified by the router.
    pub async fn auto_route(
        &self,
        question: Option<&str>,
        text: Option<&str>,
        schema: Option<&ExtractionSchema>,
    ) -> Result<AutoOutcome, AnalystError> {
        if let Some(schema) = schema.filter(|s| !s.is_empty()) {
            let input = first_non_empty(text, question).unwrap_or_default();
            self.guardrails.validate(input, "extract")?;
            let data = self.extraction.extract(input, schema, None).await?;
            return Ok(AutoOutcome {
                route: RouteDecision::Extract,
                result: AutoResult::Extract { data },
            });
        }

        let input = first_non_empty(question, text).unwrap_or_default().trim();
        if input.is_empty() {
            return Err(AnalystError::InvalidRequest(
                "Provide 'question' or 'text'".into(),
            ));
        }
        self.guardrails.validate(input, "query")?;

        let route = self.router.route(input).await;
        info!(%route, "dispatching auto-routed request");
        let result = match route {
            RouteDecision::Qa => AutoResult::Qa(self.qa.answer(input).await),
            RouteDecision::Summary => AutoResult::Summary {
                summary: self.summary.summarize(input, AUTO_SUMMARY_WORDS).await,
            },
            RouteDecision::Extract => AutoResult::Extract {
                data: self
                    .extraction
                    .extract(
                        input,
                        &ExtractionSchema::key_information(),
                        Some(AUTO_EXTRACT_DESCRIPTION),
                    )
                    .await?,
            },
        };
        Ok(AutoOutcome { route, result })
    }

    /// Number of indexed chunks, zero without a store.
    pub fn indexed_chunks(&self) -> usize {
        self.store.as_ref().map_or(0, |s| s.len())
    }

    /// Queries collaborator health checks.
    pub async fn status(&self) -> Result<AnalystStatus, AnalystError> {
        let provider = self.provider.health_check().await?;
        let store = match &self.store {
            Some(store) => Some(store.health_check().await?),
            None => None,
        };
        Ok(AnalystStatus {
            provider,
            store,
            guardrails_enabled: self.guardrails.enabled(),
        })
    }

    /// Shuts down the provider and the store. Failures are logged, not returned.
    pub async fn shutdown(&self) {
        let provider: &dyn PluginAdapter = self.provider.as_ref();
        let mut collaborators = vec![provider];
        if let Some(store) = &self.store {
            let store: &dyn PluginAdapter = store.as_ref();
            collaborators.push(store);
        }
        for adapter in collaborators {
            match adapter.shutdown().await {
                Ok(()) => debug!(adapter = adapter.name(), "shut down"),
                Err(e) => warn!(adapter = adapter.name(), error = %e, "shutdown failed"),
            }
        }
    }
}

/// The first argument that is present and not the empty string.
fn first_non_empty<'a>(first: Option<&'a str>, second: Option<&'a str>) -> Option<&'a str> {
    first
        .filter(|s| !s.is_empty())
        .or_else(|| second.filter(|s| !s.is_empty()))
}
