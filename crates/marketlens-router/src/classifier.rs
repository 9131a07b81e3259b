// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of router replies.
//!
//! The model is asked for a single word, but replies are matched by
//! substring so "Extract." or "I'd say summary" still route correctly.

use marketlens_core::RouteDecision;

/// Keywords checked in order; the first route with a matching keyword wins.
const ROUTE_KEYWORDS: &[(RouteDecision, &[&str])] = &[
    (RouteDecision::Extract, &["extract"]),
    (RouteDecision::Summary, &["summary", "summarize"]),
];

/// Route used when no keyword matches.
const DEFAULT_ROUTE: RouteDecision = RouteDecision::Qa;

/// Maps a raw model reply to a route. Never fails.
pub fn classify(reply: &str) -> RouteDecision {
    let normalized = reply.trim().to_lowercase();
    ROUTE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| normalized.contains(k)))
        .map(|(route, _)| *route)
        .unwrap_or(DEFAULT_ROUTE)
}
