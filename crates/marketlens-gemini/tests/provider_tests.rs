// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests of the Gemini provider against a mock REST server.

use marketlens_config::model::GeminiConfig;
use marketlens_core::{MarketlensError, ProviderAdapter, ProviderRequest};
use std::time::Duration;

use marketlens_gemini::GeminiProvider;
use marketlens_gemini::client::GeminiClient;
use wiremock::matchers::{body_partial_json, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn provider(server: &MockServer) -> GeminiProvider {
    let config = GeminiConfig {
        base_url: server.uri(),
        ..GeminiConfig::default()
    };
    GeminiProvider::with_api_key(&config, Some("test-key".into())).unwrap()
}

async fn mount_listing(server: &MockServer, names: &[&str], expected_calls: u64) {
    let models: Vec<_> = names
        .iter()
        .map(|n| serde_json::json!({"name": format!("models/{n}"), "supportedGenerationMethods": ["generateContent"]}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/models"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"models": models})))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn completion(text: &str) -> serde_json::Value {
    serde_json::json!({"candidates": [{"content": {"parts": [{"text": text}]}}]})
}

#[tokio::test]
async fn router_model_alias_is_normalized() {
    let server = MockServer::start().await;
    mount_listing(&server, &["gemini-1.5-flash-002", "gemini-2.5-flash"], 1).await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-flash-002:generateContent"))
        .and(body_partial_json(serde_json::json!({"generationConfig": {"temperature": 0.0}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("qa")))
        .expect(1)
        .mount(&server)
        .await;

    let response = provider(&server)
        .complete(
            ProviderRequest::new("route me")
                .with_model("gemini-1.5-flash")
                .with_temperature(0.0),
        )
        .await
        .unwrap();
    assert_eq!(response.text, "qa");
    assert_eq!(response.model, "gemini-1.5-flash-002");
}

#[tokio::test]
async fn unlisted_preferred_falls_back() {
    let server = MockServer::start().await;
    mount_listing(&server, &["gemini-pro", "gemini-1.5-pro-002"], 1).await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro-002:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .mount(&server)
        .await;

    let response = provider(&server)
        .complete(ProviderRequest::new("hi"))
        .await
        .unwrap();
    assert_eq!(response.model, "gemini-1.5-pro-002");
}

#[tokio::test]
async fn default_temperature_applied() {
    let server = MockServer::start().await;
    mount_listing(&server, &["gemini-2.5-flash"], 1).await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-flash:generateContent"))
        .and(body_partial_json(serde_json::json!({"generationConfig": {"temperature": 0.4}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    provider(&server)
        .complete(ProviderRequest::new("hi"))
        .await
        .unwrap();
}

#[tokio::test]
async fn listing_is_cached_across_calls() {
    let server = MockServer::start().await;
    mount_listing(&server, &["gemini-2.5-flash"], 1).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(3)
        .mount(&server)
        .await;

    let provider = provider(&server);
    for _ in 0..3 {
        provider.complete(ProviderRequest::new("hi")).await.unwrap();
    }
}

#[tokio::test]
async fn empty_listing_is_not_cached_and_uses_last_resort() {
    let server = MockServer::start().await;
    mount_listing(&server, &[], 2).await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(2)
        .mount(&server)
        .await;

    let provider = provider(&server);
    for _ in 0..2 {
        let response = provider.complete(ProviderRequest::new("hi")).await.unwrap();
        assert_eq!(response.model, "gemini-pro");
    }
}

#[tokio::test]
async fn not_found_carries_listing() {
    let server = MockServer::start().await;
    mount_listing(&server, &["gemini-2.5-flash", "gemini-pro"], 1).await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": {"code": 404, "message": "not found", "status": "NOT_FOUND"}
        })))
        .mount(&server)
        .await;

    let err = provider(&server)
        .complete(ProviderRequest::new("hi"))
        .await
        .unwrap_err();
    match err {
        MarketlensError::ModelUnavailable {
            requested,
            available,
        } => {
            assert_eq!(requested, "gemini-2.5-flash");
            assert_eq!(available, vec!["gemini-2.5-flash", "gemini-pro"]);
        }
        other => panic!("expected ModelUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn page_token_is_sent_percent_encoded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("pageSize", "1000"))
        .and(query_param_is_missing("pageToken"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [{"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent"]}],
            "nextPageToken": "Ab+c/d=="
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/models"))
        .and(query_param("pageToken", "Ab+c/d=="))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "models": [
                {"name": "models/gemini-1.5-flash-002", "supportedGenerationMethods": ["generateContent"]},
                {"name": "models/embedding-001", "supportedGenerationMethods": ["embedContent"]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GeminiClient::new("test-key", &server.uri(), Duration::from_secs(5)).unwrap();
    let models = client.list_models().await.unwrap();
    assert_eq!(models, vec!["gemini-2.5-flash", "gemini-1.5-flash-002"]);
}
