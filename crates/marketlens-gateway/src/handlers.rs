// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the REST API.
//!
//! Handles GET /, GET /api/v1/health, and POST /api/v1/{qa,summary,extract,auto}.

use axum::{Json, extract::State};
use marketlens_agent::AutoOutcome;
use marketlens_chains::summary::DEFAULT_MAX_WORDS;
use marketlens_chains::{ExtractionResult, ExtractionSchema, QaAnswer};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::ApiError;
use crate::server::GatewayState;

/// Description used by the direct extraction endpoint.
const EXTRACT_DESCRIPTION: &str = "Extract structured data from the text";

/// Request body for POST /api/v1/qa.
#[derive(Debug, Deserialize)]
pub struct QaRequest {
    pub question: String,
}

/// Request body for POST /api/v1/summary.
#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub text: String,
    /// Target summary length in words.
    #[serde(default)]
    pub max_length: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Request body for POST /api/v1/extract.
#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub text: String,
    #[serde(alias = "json_schema")]
    pub schema: ExtractionSchema,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub data: ExtractionResult,
}

/// Request body for POST /api/v1/auto.
#[derive(Debug, Deserialize)]
pub struct AutoRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, alias = "json_schema")]
    pub schema: Option<ExtractionSchema>,
}

/// Response body for GET /api/v1/health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct Endpoints {
    pub health: &'static str,
    pub qa: &'static str,
    pub summary: &'static str,
    pub extract: &'static str,
    pub auto: &'static str,
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct IndexResponse {
    pub message: String,
    pub version: &'static str,
    pub endpoints: Endpoints,
}

/// GET /
pub async fn get_index(State(state): State<GatewayState>) -> Json<IndexResponse> {
    Json(IndexResponse {
        message: format!("{} API", state.app_name),
        version: env!("CARGO_PKG_VERSION"),
        endpoints: Endpoints {
            health: "/api/v1/health",
            qa: "/api/v1/qa",
            summary: "/api/v1/summary",
            extract: "/api/v1/extract",
            auto: "/api/v1/auto",
        },
    })
}

/// GET /api/v1/health
///
/// Always 200 while the process serves requests. A missing credential or an
/// unavailable store is appended to `message`.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    let running = format!("{} API is running", state.app_name);
    let problems = match state.analyst.status().await {
        Ok(status) => status.problems(),
        Err(e) => {
            warn!(error = %e, "health check failed");
            vec![format!("health check failed: {e}")]
        }
    };
    let message = if problems.is_empty() {
        running
    } else {
        format!("{running} (degraded: {})", problems.join("; "))
    };
    Json(HealthResponse {
        status: "healthy",
        message,
    })
}

/// POST /api/v1/qa
pub async fn post_qa(
    State(state): State<GatewayState>,
    Json(body): Json<QaRequest>,
) -> Result<Json<QaAnswer>, ApiError> {
    Ok(Json(state.analyst.answer(&body.question).await?))
}

/// POST /api/v1/summary
///
/// A missing or zero `max_length` means the default length.
pub async fn post_summary(
    State(state): State<GatewayState>,
    Json(body): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let max_words = body
        .max_length
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_MAX_WORDS);
    let summary = state.analyst.summarize(&body.text, max_words).await?;
    Ok(Json(SummaryResponse { summary }))
}

/// POST /api/v1/extract
pub async fn post_extract(
    State(state): State<GatewayState>,
    Json(body): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let data = state
        .analyst
        .extract(&body.text, &body.schema, Some(EXTRACT_DESCRIPTION))
        .await?;
    Ok(Json(ExtractResponse { data }))
}

/// POST /api/v1/auto
pub async fn post_auto(
    State(state): State<GatewayState>,
    Json(body): Json<AutoRequest>,
) -> Result<Json<AutoOutcome>, ApiError> {
    let outcome = state
        .analyst
        .auto_route(
            body.question.as_deref(),
            body.text.as_deref(),
            body.schema.as_ref(),
        )
        .await?;
    Ok(Json(outcome))
}
