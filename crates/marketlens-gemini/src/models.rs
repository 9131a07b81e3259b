// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Model-name normalization and fallback selection.

/// Aliases mapped to the concrete identifiers the API serves.
const MODEL_ALIASES: &[(&str, &str)] = &[
    ("gemini-1.5-flash", "gemini-1.5-flash-002"),
    ("gemini-1.5-pro", "gemini-1.5-pro-002"),
    ("gemini-2.5-flash", "gemini-2.5-flash"),
    ("gemini-2.5-pro", "gemini-2.5-pro"),
    ("gemini-pro", "gemini-pro"),
    ("gemini-flash", "gemini-1.5-flash-002"),
];

/// Tried in order when the preferred model is not listed.
pub const FALLBACK_MODELS: &[&str] = &[
    "gemini-2.5-flash",
    "gemini-2.5-flash-preview-05-20",
    "gemini-1.5-flash-002",
    "gemini-1.5-pro-002",
    "gemini-pro",
];

/// Used when the provider lists no models at all.
pub const LAST_RESORT_MODEL: &str = "gemini-pro";

/// Resolves an abstract model name to the identifier the API expects.
pub fn normalize_model_name(model: &str) -> String {
    let model = model.replace("models/", "");

    if let Some((_, concrete)) = MODEL_ALIASES.iter().find(|(alias, _)| *alias == model) {
        return (*concrete).to_string();
    }

    // Already versioned.
    if ["-002", "-latest", "2.5"].iter().any(|m| model.contains(m)) {
        return model;
    }

    if model.contains("gemini-1.5") {
        return format!("{model}-002");
    }

    model
}

/// Why [`select_model`] chose the model it returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// The listing was empty; the last-resort model was returned blind.
    Unlisted,
    /// The normalized preferred model is listed.
    Preferred,
    /// A known-good fallback was listed.
    Fallback,
    /// Nothing known was listed; the first listed model was taken.
    FirstListed,
}

/// Picks the model to call given the preferred name and the listing.
pub fn select_model(preferred: &str, available: &[String]) -> (String, Selection) {
    let Some(first) = available.first() else {
        return (LAST_RESORT_MODEL.to_string(), Selection::Unlisted);
    };

    let normalized = normalize_model_name(preferred);
    if available.contains(&normalized) {
        return (normalized, Selection::Preferred);
    }

    if let Some(fallback) = FALLBACK_MODELS
        .iter()
        .find(|fb| available.iter().any(|a| a == *fb))
    {
        return ((*fallback).to_string(), Selection::Fallback);
    }

    (first.clone(), Selection::FirstListed)
}
