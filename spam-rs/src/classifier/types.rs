//! Classifier types and data structures

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, SpamError};

/// Textual labels that count as spam once trimmed and lower-cased
const SPAM_TEXT_LABELS: &[&str] = &["1", "spam", "true", "yes"];

/// Strip surrounding whitespace, including the ASCII separators U+001C..U+001F
pub fn trim_text(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c))
}

/// Binary classification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    Spam,
    Ham,
}

impl Label {
    /// Display name shown to users
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Spam => "Spam",
            Label::Ham => "Ham",
        }
    }

    pub fn is_spam(&self) -> bool {
        matches!(self, Label::Spam)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label as emitted by a classifier, before normalization
///
/// Artifacts may encode their classes as numbers (`0`/`1`), booleans or
/// strings (`"spam"`, `"ham"`), so the JSON form is untagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawLabel {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl RawLabel {
    /// Coerce into a binary label
    ///
    /// Numbers are truncated toward zero and only `1` is spam. A NaN or
    /// infinite number cannot be coerced and is an error. Text is trimmed
    /// and lower-cased, then matched against `1`, `spam`, `true` and `yes`.
    /// Anything else is ham.
    pub fn to_label(&self) -> Result<Label> {
        match self {
            RawLabel::Bool(true) => Ok(Label::Spam),
            RawLabel::Bool(false) => Ok(Label::Ham),
            RawLabel::Number(value) if !value.is_finite() => Err(SpamError::Prediction(
                format!("cannot convert label {} to an integer", value),
            )),
            RawLabel::Number(value) => Ok(if value.trunc() == 1.0 {
                Label::Spam
            } else {
                Label::Ham
            }),
            RawLabel::Text(text) => {
                let text = trim_text(text).to_lowercase();
                Ok(if SPAM_TEXT_LABELS.contains(&text.as_str()) {
                    Label::Spam
                } else {
                    Label::Ham
                })
            }
        }
    }
}

impl From<f64> for RawLabel {
    fn from(value: f64) -> Self {
        RawLabel::Number(value)
    }
}

impl From<i64> for RawLabel {
    fn from(value: i64) -> Self {
        RawLabel::Number(value as f64)
    }
}

impl From<bool> for RawLabel {
    fn from(value: bool) -> Self {
        RawLabel::Bool(value)
    }
}

impl From<&str> for RawLabel {
    fn from(value: &str) -> Self {
        RawLabel::Text(value.to_string())
    }
}

impl From<String> for RawLabel {
    fn from(value: String) -> Self {
        RawLabel::Text(value)
    }
}

impl fmt::Display for RawLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawLabel::Bool(value) => write!(f, "{}", value),
            RawLabel::Number(value) => write!(f, "{}", value),
            RawLabel::Text(value) => write!(f, "{:?}", value),
        }
    }
}

/// Which strategy produced a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionSource {
    /// Vectorizer followed by the trained classifier
    Model,
    /// Trained classifier fed the raw text
    ModelOnly,
    /// No trained classifier loaded
    Heuristic,
    /// Trained path failed and the heuristic was used instead
    Fallback,
}

/// Prediction result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Prediction {
    pub label: Label,
    pub source: PredictionSource,
}

/// Sparse feature row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SparseVector {
    /// Number of columns in the feature space
    pub dim: usize,
    /// `(column, value)` pairs sorted by column, without duplicates
    pub entries: Vec<(usize, f64)>,
}

impl SparseVector {
    pub fn new(dim: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.sort_by_key(|(col, _)| *col);
        Self { dim, entries }
    }

    /// Dot product against a dense weight row
    pub fn dot(&self, dense: &[f64]) -> f64 {
        self.entries
            .iter()
            .filter_map(|(col, value)| dense.get(*col).map(|w| w * value))
            .sum()
    }

    /// Value stored at a column, zero when absent
    pub fn get(&self, col: usize) -> f64 {
        self.entries
            .binary_search_by_key(&col, |(c, _)| *c)
            .map(|idx| self.entries[idx].1)
            .unwrap_or(0.0)
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }
}

/// One sparse row per document
pub type FeatureMatrix = Vec<SparseVector>;

/// Input handed to a classifier's predict operation
#[derive(Debug, Clone, PartialEq)]
pub enum ModelInput {
    /// Output of a vectorizer
    Features(FeatureMatrix),
    /// Raw documents, used when no vectorizer is loaded
    Text(Vec<String>),
}

impl ModelInput {
    /// Number of documents in the batch
    pub fn len(&self) -> usize {
        match self {
            ModelInput::Features(rows) => rows.len(),
            ModelInput::Text(docs) => docs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_labels() {
        assert_eq!(RawLabel::from(1_i64).to_label().unwrap(), Label::Spam);
        assert_eq!(RawLabel::from(0_i64).to_label().unwrap(), Label::Ham);
        assert_eq!(RawLabel::from(1.0).to_label().unwrap(), Label::Spam);
        assert_eq!(RawLabel::from(1.9).to_label().unwrap(), Label::Spam);
        assert_eq!(RawLabel::from(2_i64).to_label().unwrap(), Label::Ham);
        assert_eq!(RawLabel::from(-1_i64).to_label().unwrap(), Label::Ham);
    }

    #[test]
    fn test_non_finite_labels_are_errors() {
        assert!(matches!(
            RawLabel::from(f64::NAN).to_label(),
            Err(SpamError::Prediction(_))
        ));
        assert!(RawLabel::from(f64::INFINITY).to_label().is_err());
        assert!(RawLabel::from(f64::NEG_INFINITY).to_label().is_err());
    }

    #[test]
    fn test_text_labels() {
        assert_eq!(RawLabel::from("SPAM").to_label().unwrap(), Label::Spam);
        assert_eq!(RawLabel::from("  spam \n").to_label().unwrap(), Label::Spam);
        assert_eq!(RawLabel::from("1").to_label().unwrap(), Label::Spam);
        assert_eq!(RawLabel::from("True").to_label().unwrap(), Label::Spam);
        assert_eq!(RawLabel::from("yes").to_label().unwrap(), Label::Spam);
        assert_eq!(RawLabel::from("ham").to_label().unwrap(), Label::Ham);
        assert_eq!(RawLabel::from("maybe").to_label().unwrap(), Label::Ham);
        assert_eq!(RawLabel::from("").to_label().unwrap(), Label::Ham);
        assert_eq!(RawLabel::from("\u{1f}spam\u{1c}").to_label().unwrap(), Label::Spam);
    }

    #[test]
    fn test_bool_labels() {
        assert_eq!(RawLabel::from(true).to_label().unwrap(), Label::Spam);
        assert_eq!(RawLabel::from(false).to_label().unwrap(), Label::Ham);
    }

    #[test]
    fn test_raw_label_untagged_json() {
        let labels: Vec<RawLabel> = serde_json::from_str(r#"[0, 1, "spam", true]"#).unwrap();
        assert_eq!(
            labels,
            vec![
                RawLabel::Number(0.0),
                RawLabel::Number(1.0),
                RawLabel::Text("spam".to_string()),
                RawLabel::Bool(true),
            ]
        );
    }

    #[test]
    fn test_trim_text() {
        assert_eq!(trim_text("  free prize\n "), "free prize");
        assert_eq!(trim_text("\u{1c}\u{1d}\u{1e}\u{1f}"), "");
        assert_eq!(trim_text("\u{a0}hi\u{3000}"), "hi");
        assert_eq!(trim_text("a\u{1f}b"), "a\u{1f}b");
    }

    #[test]
    fn test_label_display() {
        assert_eq!(Label::Spam.to_string(), "Spam");
        assert_eq!(Label::Ham.to_string(), "Ham");
        assert!(Label::Spam.is_spam());
    }

    #[test]
    fn test_sparse_vector_ops() {
        let row = SparseVector::new(4, vec![(3, 2.0), (0, 1.0)]);
        assert_eq!(row.entries, vec![(0, 1.0), (3, 2.0)]);
        assert_eq!(row.get(3), 2.0);
        assert_eq!(row.get(1), 0.0);
        assert_eq!(row.dot(&[1.0, 5.0, 5.0, 0.5]), 2.0);
    }
}
