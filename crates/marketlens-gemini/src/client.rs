// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the Gemini REST API.
//!
//! Provides [`GeminiClient`], which handles authentication, model listing,
//! and `generateContent` calls. Requests are never retried.

use std::time::Duration;

use marketlens_core::MarketlensError;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::types::{
    ApiErrorResponse, GenerateContentRequest, GenerateContentResponse, ListModelsResponse,
};

/// Page size requested when listing models.
const LIST_PAGE_SIZE: u32 = 1000;

/// Generation method a model must support to be listed as usable.
const GENERATE_CONTENT: &str = "generateContent";

/// HTTP client for Gemini API communication.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    base_url: String,
}

impl GeminiClient {
    /// Creates a client that authenticates with `api_key`.
    pub fn new(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, MarketlensError> {
        let mut headers = HeaderMap::new();
        let mut key = HeaderValue::from_str(api_key)
            .map_err(|e| MarketlensError::Config(format!("invalid API key header value: {e}")))?;
        key.set_sensitive(true);
        headers.insert("x-goog-api-key", key);
        headers.insert("content-type", HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(timeout)
            .build()
            .map_err(|e| MarketlensError::Provider {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Lists models that support `generateContent`, without the `models/` prefix.
    pub async fn list_models(&self) -> Result<Vec<String>, MarketlensError> {
        let url = format!("{}/models", self.base_url);
        let page_size = LIST_PAGE_SIZE.to_string();
        let mut models = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            // Page tokens are opaque and may hold `+`, `/` or `=`.
            let token = page_token.take();
            let mut params = vec![("pageSize", page_size.as_str())];
            if let Some(token) = token.as_deref() {
                params.push(("pageToken", token));
            }
            let page_url = reqwest::Url::parse_with_params(&url, &params).map_err(|e| {
                MarketlensError::provider(format!("invalid model listing URL {url}: {e}"))
            })?;

            let response = self
                .client
                .get(page_url)
                .send()
                .await
                .map_err(request_failed)?;

            let status = response.status();
            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(MarketlensError::provider(describe_failure(status, &body)));
            }

            let page: ListModelsResponse = response.json().await.map_err(|e| {
                MarketlensError::Provider {
                    message: format!("failed to parse model listing: {e}"),
                    source: Some(Box::new(e)),
                }
            })?;

            models.extend(
                page.models
                    .into_iter()
                    .filter(|m| m.supported_generation_methods.iter().any(|g| g == GENERATE_CONTENT))
                    .map(|m| m.name.replace("models/", "")),
            );

            match page.next_page_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        debug!(count = models.len(), "listed Gemini models");
        Ok(models)
    }

    /// Generates a completion for `prompt` with `model`.
    ///
    /// A 404, or an error body saying the model was not found, is reported as
    /// [`MarketlensError::ModelUnavailable`] with an empty `available` list.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        temperature: f32,
    ) -> Result<String, MarketlensError> {
        let url = format!("{}/models/{model}:generateContent", self.base_url);
        let body = GenerateContentRequest::user_prompt(prompt, temperature);

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(request_failed)?;

        let status = response.status();
        debug!(status = %status, model, "generateContent response received");

        if status.is_success() {
            let parsed: GenerateContentResponse =
                response.json().await.map_err(|e| MarketlensError::Provider {
                    message: format!("failed to parse API response: {e}"),
                    source: Some(Box::new(e)),
                })?;
            return Ok(parsed.text());
        }

        let body = response.text().await.unwrap_or_default();
        let message = describe_failure(status, &body);
        if status == reqwest::StatusCode::NOT_FOUND || message.to_lowercase().contains("not found")
        {
            return Err(MarketlensError::ModelUnavailable {
                requested: model.to_string(),
                available: Vec::new(),
            });
        }
        Err(MarketlensError::provider(message))
    }
}

fn request_failed(e: reqwest::Error) -> MarketlensError {
    MarketlensError::Provider {
        message: format!("HTTP request failed: {e}"),
        source: Some(Box::new(e)),
    }
}

/// Human-readable failure text, preferring the API's own error message.
fn describe_failure(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ApiErrorResponse>(body) {
        Ok(api_err) => format!(
            "Gemini API error ({} {}): {}",
            api_err.error.code, api_err.error.status, api_err.error.message
        ),
        Err(_) => format!("API returned {status}: {body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> GeminiClient {
        GeminiClient::new("test-api-key", base_url, Duration::from_secs(5)).unwrap()
    }

    fn completion(text: &str) -> serde_json::Value {
        serde_json::json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}]
        })
    }

    #[tokio::test]
    async fn generate_sends_key_and_prompt() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/gemini-2.5-flash:generateContent"))
            .and(header("x-goog-api-key", "test-api-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "Say hi"}]}]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(" hi \n")))
            .expect(1)
            .mount(&server)
            .await;

        let text = test_client(&server.uri())
            .generate("gemini-2.5-flash", "Say hi", 0.4)
            .await
            .unwrap();
        assert_eq!(text, "hi");
    }

    #[tokio::test]
    async fn generate_maps_404_to_model_unavailable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
                "error": {"code": 404, "message": "models/gemini-x is not found", "status": "NOT_FOUND"}
            })))
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate("gemini-x", "p", 0.4)
            .await
            .unwrap_err();
        assert!(
            matches!(err, MarketlensError::ModelUnavailable { ref requested, .. } if requested == "gemini-x")
        );
    }

    #[tokio::test]
    async fn generate_does_not_retry_server_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_json(serde_json::json!({
                "error": {"code": 503, "message": "overloaded", "status": "UNAVAILABLE"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let err = test_client(&server.uri())
            .generate("gemini-2.5-flash", "p", 0.4)
            .await
            .unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("overloaded"), "got: {msg}");
        assert!(msg.contains("UNAVAILABLE"), "got: {msg}");
    }

    #[tokio::test]
    async fn list_models_filters_and_strips_prefix() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("pageSize", "1000"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [
                    {"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent", "countTokens"]},
                    {"name": "models/text-embedding-004", "supportedGenerationMethods": ["embedContent"]},
                    {"name": "models/gemini-pro", "supportedGenerationMethods": ["generateContent"]}
                ]
            })))
            .mount(&server)
            .await;

        let models = test_client(&server.uri()).list_models().await.unwrap();
        assert_eq!(models, vec!["gemini-2.5-flash", "gemini-pro"]);
    }

    #[tokio::test]
    async fn list_models_follows_page_tokens() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .and(query_param("pageToken", "next"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "models/gemini-pro", "supportedGenerationMethods": ["generateContent"]}]
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent"]}],
                "nextPageToken": "next"
            })))
            .mount(&server)
            .await;

        let models = test_client(&server.uri()).list_models().await.unwrap();
        assert_eq!(models, vec!["gemini-2.5-flash", "gemini-pro"]);
    }
}
