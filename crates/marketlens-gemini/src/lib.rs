// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Google Gemini provider adapter.
//!
//! Implements [`ProviderAdapter`] over the Gemini REST API. Every call resolves
//! the requested model against the provider's listing, falling back through
//! known-good identifiers when the preferred one is not served.

pub mod client;
pub mod models;
pub mod types;

use std::time::Duration;

use async_trait::async_trait;
use marketlens_config::model::GeminiConfig;
use marketlens_core::error::MarketlensError;
use marketlens_core::traits::{PluginAdapter, ProviderAdapter};
use marketlens_core::types::{HealthStatus, ProviderRequest, ProviderResponse};
use tokio::sync::OnceCell;
use tracing::{debug, info, warn};

use crate::client::GeminiClient;
use crate::models::{Selection, select_model};

/// Temperature used when a request does not specify one.
pub const DEFAULT_TEMPERATURE: f32 = 0.4;

/// Name of the credential, as reported in configuration errors.
pub const API_KEY_NAME: &str = "GEMINI_API_KEY";

/// Gemini provider implementing [`ProviderAdapter`].
///
/// A provider without a credential can still be constructed so the service
/// starts; every completion then fails with
/// [`MarketlensError::ConfigurationMissing`].
pub struct GeminiProvider {
    client: Option<GeminiClient>,
    default_model: String,
    /// Non-empty model listing, fetched once per process.
    models: OnceCell<Vec<String>>,
}

impl GeminiProvider {
    /// Creates a provider, resolving the key from config then `GEMINI_API_KEY`.
    pub fn new(config: &GeminiConfig) -> Result<Self, MarketlensError> {
        Self::with_api_key(config, config.resolved_api_key())
    }

    /// Creates a provider with an explicitly resolved key.
    pub fn with_api_key(
        config: &GeminiConfig,
        api_key: Option<String>,
    ) -> Result<Self, MarketlensError> {
        let timeout = Duration::from_secs(config.timeout_secs);
        let client = api_key
            .map(|key| GeminiClient::new(&key, &config.base_url, timeout))
            .transpose()?;

        match client {
            Some(_) => info!(model = %config.model, "Gemini provider initialized"),
            None => warn!("{API_KEY_NAME} not configured; completions will fail"),
        }

        Ok(Self {
            client,
            default_model: config.model.clone(),
            models: OnceCell::new(),
        })
    }

    fn client(&self) -> Result<&GeminiClient, MarketlensError> {
        self.client
            .as_ref()
            .ok_or_else(|| MarketlensError::ConfigurationMissing {
                key: API_KEY_NAME.to_string(),
            })
    }

    /// Resolves `preferred` (or the configured default) to a served model.
    ///
    /// A failed listing is treated as empty and yields the last-resort model.
    pub async fn best_available_model(&self, preferred: Option<&str>) -> String {
        let preferred = preferred
            .filter(|p| !p.trim().is_empty())
            .unwrap_or(&self.default_model);

        let available = match self.available_models().await {
            Ok(models) => models,
            Err(e) => {
                warn!(error = %e, "failed to list Gemini models");
                Vec::new()
            }
        };

        let (model, selection) = select_model(preferred, &available);
        match selection {
            Selection::Fallback => warn!(preferred, model = %model, "using fallback model"),
            Selection::FirstListed => warn!(preferred, model = %model, "using first listed model"),
            Selection::Preferred | Selection::Unlisted => {
                debug!(preferred, model = %model, "model resolved")
            }
        }
        model
    }
}

#[async_trait]
impl PluginAdapter for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn health_check(&self) -> Result<HealthStatus, MarketlensError> {
        // Avoid spending quota on health checks; credential presence is enough.
        Ok(if self.has_credentials() {
            HealthStatus::Healthy
        } else {
            HealthStatus::Degraded(format!("{API_KEY_NAME} not configured"))
        })
    }

    async fn shutdown(&self) -> Result<(), MarketlensError> {
        debug!("Gemini provider shutting down");
        Ok(())
    }
}

#[async_trait]
impl ProviderAdapter for GeminiProvider {
    fn has_credentials(&self) -> bool {
        self.client.is_some()
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> Result<ProviderResponse, MarketlensError> {
        let client = self.client()?;
        let model = self.best_available_model(request.model.as_deref()).await;
        let temperature = request.temperature.unwrap_or(DEFAULT_TEMPERATURE);

        match client.generate(&model, &request.prompt, temperature).await {
            Ok(text) => Ok(ProviderResponse { text, model }),
            Err(MarketlensError::ModelUnavailable { requested, .. }) => {
                let available = self.available_models().await.unwrap_or_default();
                warn!(model = %requested, available = ?available, "model not found");
                Err(MarketlensError::ModelUnavailable {
                    requested,
                    available,
                })
            }
            Err(e) => Err(e),
        }
    }

    async fn available_models(&self) -> Result<Vec<String>, MarketlensError> {
        if let Some(models) = self.models.get() {
            return Ok(models.clone());
        }
        let models = self.client()?.list_models().await?;
        if !models.is_empty() {
            // A concurrent caller may have won the race; either listing is fine.
            let _ = self.models.set(models.clone());
        }
        Ok(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_key_reports_configuration_missing() {
        let provider = GeminiProvider::with_api_key(&GeminiConfig::default(), None).unwrap();
        assert!(!provider.has_credentials());

        let err = provider
            .complete(ProviderRequest::new("hello"))
            .await
            .unwrap_err();
        assert!(matches!(err, MarketlensError::ConfigurationMissing { ref key } if key == API_KEY_NAME));
    }

    #[tokio::test]
    async fn health_degraded_without_key() {
        let provider = GeminiProvider::with_api_key(&GeminiConfig::default(), None).unwrap();
        assert!(matches!(
            provider.health_check().await.unwrap(),
            HealthStatus::Degraded(_)
        ));
    }

    #[test]
    fn adapter_identity() {
        let provider =
            GeminiProvider::with_api_key(&GeminiConfig::default(), Some("k".into())).unwrap();
        assert_eq!(provider.name(), "gemini");
        assert!(provider.has_credentials());
    }
}
