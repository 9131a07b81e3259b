// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lenient JSON parsing of model output.

use crate::extract::ExtractionError;
use crate::schema::{ExtractionResult, ExtractionSchema, FieldValue};

/// Removes a surrounding Markdown code fence (```` ```json ```` or ```` ``` ````).
pub fn strip_code_fence(text: &str) -> &str {
    let mut body = text.trim();
    if let Some(rest) = body.strip_prefix("```json") {
        body = rest;
    } else if let Some(rest) = body.strip_prefix("```") {
        body = rest;
    }
    if let Some(rest) = body.strip_suffix("```") {
        body = rest;
    }
    body.trim()
}

/// The slice from the first `{` to the last `}`, if both exist in that order.
fn embedded_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parses a completion into an object and backfills missing schema keys.
///
/// Tries the fence-stripped text first, then the outermost `{...}` span.
/// Errors carry the fence-stripped text as `raw`.
pub fn parse_extraction(
    completion: &str,
    schema: &ExtractionSchema,
) -> Result<ExtractionResult, ExtractionError> {
    let body = strip_code_fence(completion);

    let direct_error = match serde_json::from_str::<FieldValue>(body) {
        Ok(FieldValue::Object(fields)) => return Ok(ExtractionResult::backfilled(fields, schema)),
        Ok(_) => {
            return Err(ExtractionError::NotAnObject {
                raw: body.to_string(),
            });
        }
        Err(e) => e,
    };

    if let Some(FieldValue::Object(fields)) =
        embedded_object(body).and_then(|span| serde_json::from_str::<FieldValue>(span).ok())
    {
        return Ok(ExtractionResult::backfilled(fields, schema));
    }

    Err(ExtractionError::Unparseable {
        detail: direct_error.to_string(),
        raw: body.to_string(),
    })
}
