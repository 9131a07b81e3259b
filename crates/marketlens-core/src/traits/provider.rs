// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Provider adapter trait for hosted LLM integrations.

use async_trait::async_trait;

use crate::error::MarketlensError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{ProviderRequest, ProviderResponse};

/// Adapter for text-in/text-out LLM providers.
#[async_trait]
pub trait ProviderAdapter: PluginAdapter {
    /// Whether a usable credential is configured.
    ///
    /// Chains check this before issuing any request so a missing key
    /// surfaces as a configuration message instead of a transport error.
    fn has_credentials(&self) -> bool;

    /// Sends a completion request and returns the full response.
    async fn complete(&self, request: ProviderRequest)
    -> Result<ProviderResponse, MarketlensError>;

    /// Lists models the provider can serve for completions.
    async fn available_models(&self) -> Result<Vec<String>, MarketlensError>;
}
