// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM provider adapter for deterministic testing.
//!
//! `MockProvider` implements `ProviderAdapter` with pre-configured responses
//! and records every request, so chains can be tested without network calls.

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use marketlens_core::traits::adapter::PluginAdapter;
use marketlens_core::traits::provider::ProviderAdapter;
use marketlens_core::types::{HealthStatus, ProviderRequest, ProviderResponse};
use marketlens_core::MarketlensError;

/// Model reported when a request does not name one.
pub const MOCK_MODEL: &str = "mock-model";

/// A mock LLM provider that returns pre-configured responses.
///
/// Responses (or errors) are popped from a FIFO queue. When the queue is
/// empty, a default "mock response" text is returned.
pub struct MockProvider {
    responses: Arc<Mutex<VecDeque<Result<String, MarketlensError>>>>,
    requests: Arc<Mutex<Vec<ProviderRequest>>>,
    credentials: AtomicBool,
    shut_down: AtomicBool,
    models: Vec<String>,
}

impl MockProvider {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            requests: Arc::new(Mutex::new(Vec::new())),
            credentials: AtomicBool::new(true),
            shut_down: AtomicBool::new(false),
            models: vec![MOCK_MODEL.to_string()],
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue = responses.into_iter().map(|r| Ok(r.into())).collect();
        Self {
            responses: Arc::new(Mutex::new(queue)),
            ..Self::new()
        }
    }

    /// Reports no usable credential from `has_credentials`.
    pub fn without_credentials(self) -> Self {
        self.credentials.store(false, Ordering::SeqCst);
        self
    }

    /// Changes what `has_credentials` reports from now on.
    pub fn set_credentials(&self, present: bool) {
        self.credentials.store(present, Ordering::SeqCst);
    }

    /// Sets the model list returned by `available_models`.
    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.models = models;
        self
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: impl Into<String>) {
        self.responses.lock().await.push_back(Ok(text.into()));
    }

    /// Queue an error for the next call.
    pub async fn add_error(&self, error: MarketlensError) {
        self.responses.lock().await.push_back(Err(error));
    }

    /// All requests received so far, in order.
    pub async fn requests(&self) -> Vec<ProviderRequest> {
        self.requests.lock().await.clone()
    }

    /// Number of completion calls made.
    pub async fn call_count(&self) -> usize {
        self.requests.lock().await.len()
    }

    /// Whether `shutdown` has been called.
    pub fn is_shut_down(&self) -> bool {
        self.shut_down.load(Ordering::SeqCst)
    }

    /// Pop the next response, or return the default.
    async fn next_response(&self) -> Result<String, MarketlensError> {
        self.responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok("mock response".to_string()))
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PluginAdapter for MockProvider {
    fn name(&self) -> &str {
        "mock-provider"
    }

    async fn health_check(&self) -> Result<HealthStatus, MarketlensError> {
        Ok(if self.has_credentials() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded("GEMINI_API_KEY not configured".to_string())
        })
    }

    async fn shutdown(&self) -> Result<(), MarketlensError> {
        self.shut_down.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for MockProvider {
    fn has_credentials(&self) -> bool {
        self.credentials.load(Ordering::SeqCst)
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, MarketlensError> {
        let model = request
            .model
            .clone()
            .unwrap_or_else(|| MOCK_MODEL.to_string());
        self.requests.lock().await.push(request);
        let text = self.next_response().await?;
        Ok(ProviderResponse { text, model })
    }

    async fn available_models(&self) -> Result<Vec<String>, MarketlensError> {
        Ok(self.models.clone())
    }
}
