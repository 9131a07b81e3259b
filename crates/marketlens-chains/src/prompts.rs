// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt templates.

use crate::schema::ExtractionSchema;

/// Combined per-chunk summaries longer than this get the "comprehensive" wording.
pub const COMBINE_THRESHOLD: usize = 3000;

pub fn qa(context: &str, question: &str) -> String {
    format!(
        "Use the following pieces of context to answer the question at the end.
If you don't know the answer based on the context, just say that you don't know, don't try to make up an answer.

Context:
{context}

Question: {question}

Answer based on the context:"
    )
}

pub fn summary(text: &str, max_words: usize) -> String {
    format!(
        "Summarize the following text in approximately {max_words} words.
Be concise and capture the key points.

Text:
{text}

Summary:"
    )
}

/// `position` is one-based.
pub fn chunk_summary(chunk: &str, position: usize, total: usize) -> String {
    format!(
        "Write a concise summary of the following text chunk ({position}/{total}):

{chunk}

Concise summary:"
    )
}

/// Final reduce prompt over the joined chunk summaries.
pub fn combine_summaries(combined: &str, max_words: usize) -> String {
    if combined.chars().count() > COMBINE_THRESHOLD {
        format!(
            "The following are summaries of different sections of a document.
Combine them into a final, comprehensive summary in approximately {max_words} words:

{combined}

Final comprehensive summary:"
        )
    } else {
        format!(
            "Combine the following summaries into a final, comprehensive summary in approximately {max_words} words:

{combined}

Final summary:"
        )
    }
}

pub fn extraction(text: &str, schema: &ExtractionSchema, description: &str) -> String {
    let fields = schema
        .iter()
        .map(|(name, hint)| format!("  \"{name}\": <{hint}>"))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "You are an expert data extraction AI. Follow the instructions strictly.

Task: {description}

Input Text:
{text}

Output format (valid JSON only):
{{
{fields}
}}

Rules:
- Always output valid JSON only, no explanations.
- Fill missing fields with null.
- Use consistent field names exactly as in schema.
- Do not include extra commentary.
- Validate that output is JSON-parseable.
- Return only the JSON object, nothing else.

Begin extraction:"
    )
}
