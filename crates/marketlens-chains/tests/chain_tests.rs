// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use std::sync::Arc;

use marketlens_chains::qa::{self, DEFAULT_TOP_K};
use marketlens_chains::summary::{self, CHUNK_OVERLAP, CHUNK_SIZE, DEFAULT_MAX_WORDS};
use marketlens_chains::{
    ExtractionChain, ExtractionError, ExtractionSchema, FieldValue, QaChain, SummaryChain,
};
use marketlens_core::{DocumentStore, MarketlensError};
use marketlens_retrieval::TextSplitter;
use marketlens_test_utils::{MockDocumentStore, MockProvider};

/// Number of chunks the summary chain maps over for `text`.
fn summary_chunks(text: &str) -> usize {
    TextSplitter::new(CHUNK_SIZE, CHUNK_OVERLAP).split(text).len()
}

fn store() -> Arc<dyn DocumentStore> {
    Arc::new(MockDocumentStore::with_chunks([
        ("q1.md", "Revenue rose 12% in Q1 driven by enterprise demand."),
        ("q2.md", "Operating margin widened to 18% in Q2."),
        ("outlook.txt", "Guidance for the full year was raised."),
        ("risks.txt", "Currency headwinds remain the main risk."),
        ("extra.txt", "This chunk is beyond the retrieval depth."),
    ]))
}

// --- QA ---

#[tokio::test]
async fn qa_answers_from_top_chunks() {
    let provider = Arc::new(MockProvider::with_responses(["Revenue rose 12%."]));
    let chain = QaChain::new(provider.clone(), Some(store()), DEFAULT_TOP_K);

    let answer = chain.answer("How much did revenue grow?").await;
    assert_eq!(answer.answer, "Revenue rose 12%.");
    assert_eq!(answer.sources.len(), 3);
    assert_eq!(answer.sources[0].source, "q1.md");
    assert!(answer.sources[0].page_content.ends_with("..."));

    let requests = provider.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].temperature, Some(0.7));
    let prompt = &requests[0].prompt;
    assert!(prompt.contains(
        "Revenue rose 12% in Q1 driven by enterprise demand.\n\nOperating margin widened"
    ));
    assert!(prompt.contains("Currency headwinds"));
    assert!(!prompt.contains("beyond the retrieval depth"));
    assert!(prompt.contains("Question: How much did revenue grow?"));
}

#[tokio::test]
async fn qa_without_credentials_skips_retrieval() {
    let provider = Arc::new(MockProvider::new().without_credentials());
    let store = Arc::new(MockDocumentStore::with_chunks([("a.txt", "text")]));
    let chain = QaChain::new(provider.clone(), Some(store.clone()), 4);

    let answer = chain.answer("anything").await;
    assert_eq!(answer.answer, qa::NOT_CONFIGURED);
    assert!(answer.sources.is_empty());
    assert!(store.queries().await.is_empty());
    assert_eq!(provider.call_count().await, 0);
}

#[tokio::test]
async fn qa_without_store_is_degraded() {
    let chain = QaChain::new(Arc::new(MockProvider::new()), None, 4);
    let answer = chain.answer("anything").await;
    assert_eq!(answer.answer, qa::STORE_UNAVAILABLE);
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn qa_retrieval_failure_becomes_answer_text() {
    let store: Arc<dyn DocumentStore> = Arc::new(MockDocumentStore::failing("index offline"));
    let chain = QaChain::new(Arc::new(MockProvider::new()), Some(store), 4);
    let answer = chain.answer("anything").await;
    assert_eq!(
        answer.answer,
        "Error processing question: retrieval error: index offline"
    );
    assert!(answer.sources.is_empty());
}

#[tokio::test]
async fn qa_provider_failure_becomes_sentinel() {
    let provider = Arc::new(MockProvider::new());
    provider
        .add_error(MarketlensError::ModelUnavailable {
            requested: "gemini-9".into(),
            available: vec!["gemini-2.5-flash".into()],
        })
        .await;
    let chain = QaChain::new(provider, Some(store()), 4);
    let answer = chain.answer("anything").await;
    assert_eq!(
        answer.answer,
        "Error: Model not available. Please update the configured model to one of: gemini-2.5-flash"
    );
    assert_eq!(answer.sources.len(), 3);
}

// --- Summary ---

#[tokio::test]
async fn summary_of_short_text_is_single_call() {
    let provider = Arc::new(MockProvider::with_responses(["Short summary."]));
    let chain = SummaryChain::new(provider.clone());

    let summary = chain.summarize("Revenue grew.", 100).await;
    assert_eq!(summary, "Short summary.");

    let requests = provider.requests().await;
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].temperature, Some(0.3));
    assert!(requests[0].prompt.contains("approximately 100 words"));
    assert!(requests[0].prompt.contains("Text:\nRevenue grew.\n\nSummary:"));
}

#[tokio::test]
async fn summary_sentinels() {
    let provider = Arc::new(MockProvider::new());
    let chain = SummaryChain::new(provider.clone());
    assert_eq!(chain.summarize("   ", 500).await, summary::EMPTY_INPUT);

    provider.set_credentials(false);
    assert_eq!(chain.summarize("text", 500).await, summary::NOT_CONFIGURED);
    assert_eq!(provider.call_count().await, 0);
}

#[tokio::test]
async fn long_text_is_mapped_then_reduced() {
    let paragraph = "Market conditions improved across every region this quarter. ".repeat(20);
    let text = vec![paragraph; 8].join("\n\n");
    assert!(text.chars().count() > CHUNK_SIZE);

    let provider = Arc::new(MockProvider::new());
    let chain = SummaryChain::new(provider.clone());
    let summary = chain.summarize(&text, DEFAULT_MAX_WORDS).await;
    assert_eq!(summary, "mock response");

    let requests = provider.requests().await;
    let chunks = summary_chunks(&text);
    assert!(chunks >= 2);
    assert_eq!(requests.len(), chunks + 1, "one call per chunk plus one reduce");
    let (reduce, map) = requests.split_last().unwrap();

    let total = map.len();
    for (i, request) in map.iter().enumerate() {
        assert!(request
            .prompt
            .contains(&format!("text chunk ({}/{total}):", i + 1)));
    }
    assert!(reduce.prompt.starts_with("Combine the following summaries"));
    assert!(reduce.prompt.contains("mock response\n\nmock response"));
    assert!(requests.iter().all(|r| r.temperature == Some(0.3)));
}

#[tokio::test]
async fn no_call_carries_more_than_chunk_size_of_source_text() {
    let sentence = "Operating income rose while costs fell sharply. ";
    let text = sentence.repeat(1000);

    let provider = Arc::new(MockProvider::new());
    SummaryChain::new(provider.clone())
        .summarize(&text, 300)
        .await;

    let requests = provider.requests().await;
    assert_eq!(requests.len(), summary_chunks(&text) + 1);
    let map = &requests[..requests.len() - 1];
    for request in map {
        let source = request
            .prompt
            .split_once("):\n\n")
            .and_then(|(_, rest)| rest.rsplit_once("\n\nConcise summary:"))
            .map(|(chunk, _)| chunk)
            .unwrap();
        assert!(source.chars().count() <= CHUNK_SIZE);
    }
}

#[tokio::test]
async fn long_combined_summaries_use_comprehensive_wording() {
    let text = "Sales in the northern territory expanded again. ".repeat(300);
    let long_partial = "p".repeat(2000);
    let provider = Arc::new(MockProvider::new());
    for _ in 0..10 {
        provider.add_response(long_partial.clone()).await;
    }

    SummaryChain::new(provider.clone())
        .summarize(&text, 250)
        .await;

    let requests = provider.requests().await;
    let reduce = requests.last().unwrap();
    assert!(reduce
        .prompt
        .starts_with("The following are summaries of different sections of a document."));
    assert!(reduce.prompt.ends_with("Final comprehensive summary:"));
}

// --- Extraction ---

fn person_schema() -> ExtractionSchema {
    ExtractionSchema::new()
        .field("name", "string")
        .field("age", "number")
}

#[tokio::test]
async fn extracts_and_backfills() {
    let provider = Arc::new(MockProvider::with_responses(["```json\n{\"name\": \"Alice\"}\n```"]));
    let chain = ExtractionChain::new(provider.clone());

    let result = chain
        .extract("Alice, 30 years old", &person_schema(), None)
        .await
        .unwrap();
    assert_eq!(result.get("name").and_then(FieldValue::as_str), Some("Alice"));
    assert!(result.get("age").unwrap().is_null());

    let requests = provider.requests().await;
    assert_eq!(requests[0].temperature, Some(0.1));
    assert!(requests[0].prompt.contains("Task: Extract structured information"));
    assert!(requests[0].prompt.contains("  \"age\": <number>"));
}

#[tokio::test]
async fn extraction_round_trip_example() {
    let provider = Arc::new(MockProvider::with_responses([r#"{"name": "Alice", "age": 30}"#]));
    let result = ExtractionChain::new(provider)
        .extract("Alice, 30 years old", &person_schema(), Some("Extract people"))
        .await
        .unwrap();
    assert_eq!(
        serde_json::to_value(&result).unwrap(),
        serde_json::json!({"name": "Alice", "age": 30})
    );
}

#[tokio::test]
async fn extraction_input_errors_come_before_any_call() {
    let provider = Arc::new(MockProvider::new());
    let chain = ExtractionChain::new(provider.clone());

    assert_eq!(
        chain.extract(" ", &person_schema(), None).await.unwrap_err(),
        ExtractionError::EmptyText
    );
    assert_eq!(
        chain
            .extract("text", &ExtractionSchema::new(), None)
            .await
            .unwrap_err(),
        ExtractionError::EmptySchema
    );
    provider.set_credentials(false);
    assert_eq!(
        chain.extract("text", &person_schema(), None).await.unwrap_err(),
        ExtractionError::NotConfigured
    );
    assert_eq!(provider.call_count().await, 0);
}

#[tokio::test]
async fn empty_completion_is_no_response() {
    let provider = Arc::new(MockProvider::with_responses(["  "]));
    let err = ExtractionChain::new(provider)
        .extract("text", &person_schema(), None)
        .await
        .unwrap_err();
    assert_eq!(err, ExtractionError::NoResponse);
}

#[tokio::test]
async fn provider_failure_is_upstream() {
    let provider = Arc::new(MockProvider::new());
    provider.add_error(MarketlensError::provider("quota exceeded")).await;
    let err = ExtractionChain::new(provider)
        .extract("text", &person_schema(), None)
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ExtractionError::Upstream("Error calling Gemini API: quota exceeded".into())
    );
}

#[tokio::test]
async fn unparseable_output_keeps_raw_text() {
    let provider = Arc::new(MockProvider::with_responses(["Sorry, I cannot help with that."]));
    let err = ExtractionChain::new(provider)
        .extract("text", &person_schema(), None)
        .await
        .unwrap_err();
    assert_eq!(err.raw(), Some("Sorry, I cannot help with that."));
}
