// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end testing.
//!
//! `TestHarness` assembles a complete [`Analyst`] over mock adapters so the
//! full guardrail, routing, and chain pipeline runs without network access.

use std::sync::Arc;

use marketlens_agent::Analyst;
use marketlens_config::model::{GuardrailsConfig, MarketlensConfig};
use marketlens_core::DocumentStore;

use crate::mock_provider::MockProvider;
use crate::mock_store::MockDocumentStore;

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    responses: Vec<String>,
    chunks: Vec<(String, String)>,
    with_store: bool,
    credentials: bool,
    guardrails: GuardrailsConfig,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            responses: Vec::new(),
            chunks: Vec::new(),
            with_store: true,
            credentials: true,
            guardrails: GuardrailsConfig::default(),
        }
    }

    /// Set mock provider responses.
    pub fn with_mock_responses<S: Into<String>>(mut self, responses: impl IntoIterator<Item = S>) -> Self {
        self.responses = responses.into_iter().map(Into::into).collect();
        self
    }

    /// Add a `(source, text)` chunk to the mock store.
    pub fn with_chunk(mut self, source: &str, text: &str) -> Self {
        self.chunks.push((source.to_string(), text.to_string()));
        self
    }

    /// Build the analyst with no document store.
    pub fn without_store(mut self) -> Self {
        self.with_store = false;
        self
    }

    /// Make the provider report a missing credential.
    pub fn without_credentials(mut self) -> Self {
        self.credentials = false;
        self
    }

    /// Replace the guardrail settings.
    pub fn with_guardrails(mut self, guardrails: GuardrailsConfig) -> Self {
        self.guardrails = guardrails;
        self
    }

    pub fn build(self) -> TestHarness {
        let mock_provider = Arc::new(MockProvider::with_responses(self.responses));
        mock_provider.set_credentials(self.credentials);

        let mock_store = self.with_store.then(|| {
            Arc::new(MockDocumentStore::with_chunks(
                self.chunks.iter().map(|(s, t)| (s.as_str(), t.as_str())),
            ))
        });

        let config = MarketlensConfig {
            guardrails: self.guardrails,
            ..MarketlensConfig::default()
        };

        let analyst = Analyst::new(
            mock_provider.clone(),
            mock_store
                .clone()
                .map(|s| s as Arc<dyn DocumentStore>),
            &config,
        );

        TestHarness {
            analyst: Arc::new(analyst),
            mock_provider,
            mock_store,
            config,
        }
    }
}

/// A fully wired analyst plus handles to its mocks.
pub struct TestHarness {
    pub analyst: Arc<Analyst>,
    /// The mock LLM provider.
    pub mock_provider: Arc<MockProvider>,
    /// The mock document store, unless built `without_store`.
    pub mock_store: Option<Arc<MockDocumentStore>>,
    pub config: MarketlensConfig,
}

impl TestHarness {
    /// Create a new builder for configuring the test harness.
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Add a response to the mock provider's queue.
    pub async fn add_provider_response(&self, text: &str) {
        self.mock_provider.add_response(text).await;
    }
}
