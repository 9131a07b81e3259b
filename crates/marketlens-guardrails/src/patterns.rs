// SPDX-FileCopyrightText: 2026 Marketlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prompt-injection signatures.

use std::sync::LazyLock;

use regex::RegexSet;

/// Case-insensitive signatures of instruction overrides, role reassignment,
/// and chat-template delimiters. Any match anywhere in the input trips them.
const INJECTION_PATTERNS: &[&str] = &[
    r"ignore\s+(previous|all|above)\s+instructions?",
    r"system\s+prompt\s+override",
    r"forget\s+(all|previous|everything)",
    r"you\s+are\s+now\s+(a|an)\s+[^.]*",
    r"act\s+as\s+if\s+you\s+are",
    r"pretend\s+to\s+be",
    r"disregard\s+(the\s+)?(above|previous|instructions)",
    r"new\s+instructions?:",
    r"override\s+(the\s+)?(system|previous|instructions)",
    // Instruction-tuned model markers
    r"\[INST\]|\[/INST\]",
    // ChatML turn markers
    r"<\|im_start\|>|<\|im_end\|>",
];

static INJECTION_SET: LazyLock<RegexSet> = LazyLock::new(|| {
    let patterns = INJECTION_PATTERNS.iter().map(|p| format!("(?i){p}"));
    RegexSet::new(patterns).expect("injection patterns are valid regexes")
});

/// Returns `true` if `text` contains a known prompt-injection signature.
///
/// Empty input never matches.
pub fn check_injection(text: &str) -> bool {
    !text.is_empty() && INJECTION_SET.is_match(text)
}

/// Every signature that matched, for logging.
pub fn matched_patterns(text: &str) -> Vec<&'static str> {
    INJECTION_SET
        .matches(text)
        .into_iter()
        .map(|i| INJECTION_PATTERNS[i])
        .collect()
}
