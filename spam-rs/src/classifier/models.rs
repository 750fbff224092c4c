//! Serializable classifier and vectorizer artifacts
//!
//! Artifacts are JSON documents tagged by `kind`:
//!
//! ```json
//! { "kind": "tfidf", "vocabulary": { "free": 0, "prize": 1 }, "idf": [1.2, 1.9] }
//! { "kind": "linear", "coef": [1.4, 2.1], "intercept": -1.0, "classes": ["ham", "spam"] }
//! ```
//!
//! A `pipeline` model embeds its own vectorizer and therefore accepts raw
//! text, which is what the model-only resolution path feeds it.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use super::types::{FeatureMatrix, ModelInput, RawLabel, SparseVector};
use super::{SpamModel, Vectorizer};
use crate::error::{Result, SpamError};

/// Word tokens of two or more characters
const TOKEN_PATTERN: &str = r"\b\w\w+\b";

fn token_regex() -> &'static Regex {
    static TOKEN_RE: OnceLock<Regex> = OnceLock::new();
    TOKEN_RE.get_or_init(|| Regex::new(TOKEN_PATTERN).expect("token pattern is valid"))
}

fn default_true() -> bool {
    true
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_binary_classes() -> Vec<RawLabel> {
    vec![RawLabel::Number(0.0), RawLabel::Number(1.0)]
}

// ---------------------------------------------------------------------------
// Vectorizers
// ---------------------------------------------------------------------------

/// Vectorizer artifact
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VectorizerArtifact {
    /// Raw term counts
    Count(CountVectorizer),
    /// Term counts weighted by inverse document frequency
    Tfidf(TfidfVectorizer),
}

/// Bag-of-words counter over a fixed vocabulary
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CountVectorizer {
    /// Term to column index
    pub vocabulary: HashMap<String, usize>,
    #[serde(default = "default_true")]
    pub lowercase: bool,
    /// Emit 1.0 for present terms instead of counts
    #[serde(default)]
    pub binary: bool,
    /// Inclusive `(min_n, max_n)` n-gram sizes
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

/// Row normalization applied after tf-idf weighting
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    #[serde(rename = "none")]
    Unnormalized,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TfidfVectorizer {
    #[serde(flatten)]
    pub counts: CountVectorizer,
    /// One weight per vocabulary column
    pub idf: Vec<f64>,
    #[serde(default)]
    pub norm: Norm,
    /// Replace tf with `1 + ln(tf)`
    #[serde(default)]
    pub sublinear_tf: bool,
}

impl CountVectorizer {
    pub fn dim(&self) -> usize {
        self.vocabulary.len()
    }

    fn validate(&self) -> Result<()> {
        let (min_n, max_n) = self.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(SpamError::InvalidArtifact(format!(
                "invalid ngram_range ({}, {})",
                min_n, max_n
            )));
        }

        if self.vocabulary.is_empty() {
            return Err(SpamError::InvalidArtifact("empty vocabulary".to_string()));
        }

        let dim = self.dim();
        let mut seen = HashSet::with_capacity(dim);
        for (term, &col) in &self.vocabulary {
            if col >= dim {
                return Err(SpamError::InvalidArtifact(format!(
                    "term {:?} maps to column {} outside vocabulary of {}",
                    term, col, dim
                )));
            }
            if !seen.insert(col) {
                return Err(SpamError::InvalidArtifact(format!(
                    "column {} assigned to more than one term",
                    col
                )));
            }
        }

        Ok(())
    }

    /// Split a document into the terms this vectorizer looks up
    fn analyze(&self, doc: &str) -> Vec<String> {
        let doc = if self.lowercase {
            doc.to_lowercase()
        } else {
            doc.to_string()
        };

        let tokens: Vec<&str> = token_regex().find_iter(&doc).map(|m| m.as_str()).collect();
        let (min_n, max_n) = self.ngram_range;

        let mut terms = Vec::new();
        for n in min_n.max(1)..=max_n {
            if n > tokens.len() {
                break;
            }
            terms.extend(tokens.windows(n).map(|gram| gram.join(" ")));
        }
        terms
    }

    /// Term counts keyed by column
    fn count(&self, doc: &str) -> HashMap<usize, f64> {
        let mut counts: HashMap<usize, f64> = HashMap::new();
        for term in self.analyze(doc) {
            if let Some(&col) = self.vocabulary.get(&term) {
                *counts.entry(col).or_insert(0.0) += 1.0;
            }
        }

        if self.binary {
            for value in counts.values_mut() {
                *value = 1.0;
            }
        }
        counts
    }

    fn transform_one(&self, doc: &str) -> SparseVector {
        SparseVector::new(self.dim(), self.count(doc).into_iter().collect())
    }
}

impl TfidfVectorizer {
    fn validate(&self) -> Result<()> {
        self.counts.validate()?;

        if self.idf.len() != self.counts.dim() {
            return Err(SpamError::InvalidArtifact(format!(
                "idf has {} weights for a vocabulary of {}",
                self.idf.len(),
                self.counts.dim()
            )));
        }
        if self.idf.iter().any(|w| !w.is_finite()) {
            return Err(SpamError::InvalidArtifact("non-finite idf weight".to_string()));
        }

        Ok(())
    }

    fn transform_one(&self, doc: &str) -> SparseVector {
        let mut entries: Vec<(usize, f64)> = self
            .counts
            .count(doc)
            .into_iter()
            .map(|(col, tf)| {
                let tf = if self.sublinear_tf { 1.0 + tf.ln() } else { tf };
                (col, tf * self.idf[col])
            })
            .collect();

        let norm = match self.norm {
            Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::Unnormalized => 1.0,
        };
        if norm > 0.0 {
            for (_, value) in entries.iter_mut() {
                *value /= norm;
            }
        }

        SparseVector::new(self.counts.dim(), entries)
    }
}

impl VectorizerArtifact {
    /// Parse and validate a JSON artifact
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let artifact: Self = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Number of output columns
    pub fn dim(&self) -> usize {
        match self {
            VectorizerArtifact::Count(v) => v.dim(),
            VectorizerArtifact::Tfidf(v) => v.counts.dim(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            VectorizerArtifact::Count(v) => v.validate(),
            VectorizerArtifact::Tfidf(v) => v.validate(),
        }
    }
}

impl Vectorizer for VectorizerArtifact {
    fn transform(&self, docs: &[String]) -> Result<FeatureMatrix> {
        Ok(docs
            .iter()
            .map(|doc| match self {
                VectorizerArtifact::Count(v) => v.transform_one(doc),
                VectorizerArtifact::Tfidf(v) => v.transform_one(doc),
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Classifiers
// ---------------------------------------------------------------------------

/// Classifier artifact
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    /// Linear decision function over features
    Linear(LinearModel),
    /// Multinomial naive Bayes over term counts
    MultinomialNb(NaiveBayesModel),
    /// Vectorizer and classifier bundled together, accepts raw text
    Pipeline(PipelineModel),
}

/// Binary linear classifier: `classes[1]` when `w·x + b > 0`
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LinearModel {
    pub coef: Vec<f64>,
    #[serde(default)]
    pub intercept: f64,
    #[serde(default = "default_binary_classes")]
    pub classes: Vec<RawLabel>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NaiveBayesModel {
    pub class_log_prior: Vec<f64>,
    /// One row of per-feature log probabilities per class
    pub feature_log_prob: Vec<Vec<f64>>,
    #[serde(default = "default_binary_classes")]
    pub classes: Vec<RawLabel>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PipelineModel {
    pub vectorizer: VectorizerArtifact,
    pub model: Box<ModelArtifact>,
}

fn expect_features<'a>(input: &'a ModelInput, model: &str) -> Result<&'a FeatureMatrix> {
    match input {
        ModelInput::Features(rows) => Ok(rows),
        ModelInput::Text(_) => Err(SpamError::Prediction(format!(
            "{} model expects feature vectors, got raw text",
            model
        ))),
    }
}

fn check_dim(row: &SparseVector, expected: usize) -> Result<()> {
    if row.dim != expected {
        return Err(SpamError::Shape {
            expected,
            actual: row.dim,
        });
    }
    Ok(())
}

impl LinearModel {
    fn validate(&self) -> Result<()> {
        if self.coef.is_empty() {
            return Err(SpamError::InvalidArtifact("linear model has no coefficients".to_string()));
        }
        if self.classes.len() != 2 {
            return Err(SpamError::InvalidArtifact(format!(
                "linear model needs exactly 2 classes, got {}",
                self.classes.len()
            )));
        }
        if !self.intercept.is_finite() || self.coef.iter().any(|w| !w.is_finite()) {
            return Err(SpamError::InvalidArtifact("non-finite linear weight".to_string()));
        }
        Ok(())
    }

    fn predict_rows(&self, rows: &FeatureMatrix) -> Result<Vec<RawLabel>> {
        rows.iter()
            .map(|row| {
                check_dim(row, self.coef.len())?;
                let decision = row.dot(&self.coef) + self.intercept;
                let idx = usize::from(decision > 0.0);
                Ok(self.classes[idx].clone())
            })
            .collect()
    }
}

impl NaiveBayesModel {
    fn n_features(&self) -> usize {
        self.feature_log_prob.first().map(Vec::len).unwrap_or(0)
    }

    fn validate(&self) -> Result<()> {
        let n_classes = self.classes.len();
        if n_classes < 2 {
            return Err(SpamError::InvalidArtifact(format!(
                "naive Bayes model needs at least 2 classes, got {}",
                n_classes
            )));
        }
        if self.class_log_prior.len() != n_classes || self.feature_log_prob.len() != n_classes {
            return Err(SpamError::InvalidArtifact(format!(
                "naive Bayes model has {} classes but {} priors and {} probability rows",
                n_classes,
                self.class_log_prior.len(),
                self.feature_log_prob.len()
            )));
        }

        let n_features = self.n_features();
        if n_features == 0 || self.feature_log_prob.iter().any(|row| row.len() != n_features) {
            return Err(SpamError::InvalidArtifact(
                "naive Bayes probability rows are empty or ragged".to_string(),
            ));
        }
        Ok(())
    }

    fn predict_rows(&self, rows: &FeatureMatrix) -> Result<Vec<RawLabel>> {
        let n_features = self.n_features();
        rows.iter()
            .map(|row| {
                check_dim(row, n_features)?;

                let mut best = 0;
                let mut best_score = f64::NEG_INFINITY;
                for (idx, (prior, log_prob)) in self
                    .class_log_prior
                    .iter()
                    .zip(&self.feature_log_prob)
                    .enumerate()
                {
                    let score = prior + row.dot(log_prob);
                    if score > best_score {
                        best = idx;
                        best_score = score;
                    }
                }
                Ok(self.classes[best].clone())
            })
            .collect()
    }
}

impl PipelineModel {
    fn validate(&self) -> Result<()> {
        self.vectorizer.validate()?;
        self.model.validate()?;

        if matches!(*self.model, ModelArtifact::Pipeline(_)) {
            return Err(SpamError::InvalidArtifact("nested pipelines are not supported".to_string()));
        }

        if let Some(n_features) = self.model.n_features() {
            if n_features != self.vectorizer.dim() {
                return Err(SpamError::InvalidArtifact(format!(
                    "pipeline vectorizer emits {} features but model expects {}",
                    self.vectorizer.dim(),
                    n_features
                )));
            }
        }
        Ok(())
    }
}

impl ModelArtifact {
    /// Parse and validate a JSON artifact
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self> {
        let artifact: Self = serde_json::from_slice(bytes)?;
        artifact.validate()?;
        Ok(artifact)
    }

    /// Feature count the model consumes, `None` for raw-text models
    pub fn n_features(&self) -> Option<usize> {
        match self {
            ModelArtifact::Linear(m) => Some(m.coef.len()),
            ModelArtifact::MultinomialNb(m) => Some(m.n_features()),
            ModelArtifact::Pipeline(_) => None,
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::MultinomialNb(m) => m.validate(),
            ModelArtifact::Pipeline(m) => m.validate(),
        }
    }
}

impl SpamModel for ModelArtifact {
    fn predict(&self, input: &ModelInput) -> Result<Vec<RawLabel>> {
        match self {
            ModelArtifact::Linear(m) => m.predict_rows(expect_features(input, "linear")?),
            ModelArtifact::MultinomialNb(m) => {
                m.predict_rows(expect_features(input, "naive Bayes")?)
            }
            ModelArtifact::Pipeline(m) => match input {
                ModelInput::Text(docs) => {
                    let features = m.vectorizer.transform(docs)?;
                    m.model.predict(&ModelInput::Features(features))
                }
                ModelInput::Features(_) => Err(SpamError::Prediction(
                    "pipeline model expects raw text, got feature vectors".to_string(),
                )),
            },
        }
    }
}
