// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mapping of analyst errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use marketlens_agent::AnalystError;
use marketlens_chains::ExtractionError;
use marketlens_guardrails::GuardrailError;
use serde::Serialize;
use tracing::error;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    /// Model output attached to parse failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// An error ready to be returned from a handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                detail: detail.into(),
                raw: None,
            },
        }
    }
}

impl From<AnalystError> for ApiError {
    fn from(err: AnalystError) -> Self {
        let status = match &err {
            AnalystError::Guardrail(GuardrailError::InjectionDetected) => StatusCode::FORBIDDEN,
            AnalystError::Guardrail(_)
            | AnalystError::InvalidRequest(_)
            | AnalystError::Extraction(ExtractionError::EmptyText | ExtractionError::EmptySchema) => {
                StatusCode::BAD_REQUEST
            }
            AnalystError::Extraction(_) | AnalystError::Core(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let raw = match &err {
            AnalystError::Extraction(e) => e.raw().map(str::to_string),
            _ => None,
        };
        if status.is_server_error() {
            error!(error = %err, "request failed");
        }
        Self {
            status,
            body: ErrorBody {
                detail: err.to_string(),
                raw,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guardrail_statuses() {
        let injection: ApiError = AnalystError::Guardrail(GuardrailError::InjectionDetected).into();
        assert_eq!(injection.status, StatusCode::FORBIDDEN);
        assert_eq!(
            injection.body.detail,
            "Input contains potentially malicious patterns. Request blocked by guardrails."
        );

        let too_long: ApiError = AnalystError::Guardrail(GuardrailError::TooLong {
            label: "query".into(),
            max: 10,
        })
        .into();
        assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn parse_failures_carry_raw_text() {
        let err: ApiError = AnalystError::Extraction(ExtractionError::NotAnObject {
            raw: "[1]".into(),
        })
        .into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body.raw.as_deref(), Some("[1]"));
        assert_eq!(err.body.detail, "Extracted data is not a valid object.");
    }

    #[test]
    fn missing_credential_is_server_error() {
        let err: ApiError = AnalystError::Extraction(ExtractionError::NotConfigured).into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(err.body.raw.is_none());
    }
}
