//! Prediction resolution
//!
//! Picks the classification path for each call:
//!
//! 1. classifier and vectorizer loaded: vectorize, then predict
//! 2. classifier only: predict on the raw text
//! 3. otherwise: keyword heuristic
//!
//! Paths 1 and 2 are a first tier that may fail. Any failure, including a
//! panic inside a classifier or vectorizer, drops to the heuristic, so
//! [`ClassifierResolver::predict`] always yields a label.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, warn};

use super::artifacts::Artifacts;
use super::heuristic::{heuristic_matches, heuristic_predict};
use super::types::{Label, ModelInput, Prediction, PredictionSource, RawLabel};
use super::{SpamModel, Vectorizer};
use crate::error::{Result, SpamError};

/// Resolves a spam/ham label from the loaded artifacts
#[derive(Clone, Default)]
pub struct ClassifierResolver {
    model: Option<Arc<dyn SpamModel>>,
    vectorizer: Option<Arc<dyn Vectorizer>>,
}

impl ClassifierResolver {
    pub fn new(
        model: Option<Arc<dyn SpamModel>>,
        vectorizer: Option<Arc<dyn Vectorizer>>,
    ) -> Self {
        Self { model, vectorizer }
    }

    /// Resolver with no artifacts, always uses the heuristic
    pub fn heuristic_only() -> Self {
        Self::default()
    }

    pub fn from_artifacts(artifacts: Artifacts) -> Self {
        Self::new(artifacts.model, artifacts.vectorizer)
    }

    pub fn has_model(&self) -> bool {
        self.model.is_some()
    }

    pub fn has_vectorizer(&self) -> bool {
        self.vectorizer.is_some()
    }

    /// Classify text, returning only the label
    pub fn predict(&self, text: &str) -> Label {
        self.classify(text).label
    }

    /// Classify text, reporting which path produced the label
    pub fn classify(&self, text: &str) -> Prediction {
        match self.try_trained(text) {
            Some(Ok(prediction)) => prediction,
            Some(Err(e)) => {
                warn!("Model prediction failed, falling back to rule-based: {}", e);
                Prediction {
                    label: heuristic_predict(text),
                    source: PredictionSource::Fallback,
                }
            }
            None => {
                debug!("No trained model, heuristic matched {:?}", heuristic_matches(text));
                Prediction {
                    label: heuristic_predict(text),
                    source: PredictionSource::Heuristic,
                }
            }
        }
    }

    /// Run the trained path, `None` when no classifier is loaded
    fn try_trained(&self, text: &str) -> Option<Result<Prediction>> {
        let model = self.model.as_ref()?;
        let docs = vec![text.to_string()];

        let outcome = match &self.vectorizer {
            Some(vectorizer) => catch_panic(|| {
                let features = vectorizer.transform(&docs)?;
                model.predict(&ModelInput::Features(features))
            })
            .map(|labels| (labels, PredictionSource::Model)),
            None => catch_panic(|| model.predict(&ModelInput::Text(docs)))
                .map(|labels| (labels, PredictionSource::ModelOnly)),
        };

        Some(outcome.and_then(|(labels, source)| {
            let raw = first_label(labels)?;
            let label = raw.to_label()?;
            debug!("Model predicted raw label {} -> {}", raw, label);
            Ok(Prediction { label, source })
        }))
    }
}

/// First element of a prediction batch
fn first_label(labels: Vec<RawLabel>) -> Result<RawLabel> {
    labels
        .into_iter()
        .next()
        .ok_or_else(|| SpamError::Prediction("classifier returned no labels".to_string()))
}

/// Turn a panic inside third-party artifact code into an error
fn catch_panic<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(SpamError::Prediction(format!("classifier panicked: {}", reason)))
    })
}
