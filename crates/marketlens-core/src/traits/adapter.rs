// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lifecycle trait shared by the service's collaborators.

use async_trait::async_trait;

use crate::error::MarketlensError;
use crate::types::HealthStatus;

/// Identity, health, and shutdown for a collaborator of the analyst.
///
/// Health is surfaced by `GET /api/v1/health`; `shutdown` runs once after the
/// HTTP server stops.
#[async_trait]
pub trait PluginAdapter: Send + Sync + 'static {
    /// Short name used in health messages and logs.
    fn name(&self) -> &str;

    /// Reports whether the collaborator can serve requests right now.
    async fn health_check(&self) -> Result<HealthStatus, MarketlensError>;

    /// Releases held resources. The default does nothing.
    async fn shutdown(&self) -> Result<(), MarketlensError> {
        Ok(())
    }
}
