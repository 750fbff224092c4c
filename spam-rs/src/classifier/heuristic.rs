//! Keyword heuristic used when no trained classifier is usable

use super::types::Label;

/// Substrings that suggest spam
pub const SPAM_INDICATORS: &[&str] = &[
    "win",
    "prize",
    "free",
    "click",
    "buy now",
    "unsubscribe",
    "claim",
    "urgent",
    "lottery",
    "congrat",
];

/// Distinct indicators needed to call a message spam
pub const SPAM_INDICATOR_THRESHOLD: usize = 2;

/// Indicators found in the text, each at most once
///
/// Matching is case-insensitive substring containment, so `"winner"`
/// counts for `win` and `"congratulations"` for `congrat`.
pub fn heuristic_matches(text: &str) -> Vec<&'static str> {
    let text = text.to_lowercase();
    SPAM_INDICATORS
        .iter()
        .copied()
        .filter(|indicator| text.contains(indicator))
        .collect()
}

/// Classify text by counting spam indicators
pub fn heuristic_predict(text: &str) -> Label {
    if heuristic_matches(text).len() >= SPAM_INDICATOR_THRESHOLD {
        Label::Spam
    } else {
        Label::Ham
    }
}
