//! Spam classification
//!
//! Resolves a label for a piece of email text using, in order of
//! preference, a trained classifier fed by a vectorizer, a trained
//! classifier on raw text, or a keyword heuristic.

pub mod artifacts;
pub mod heuristic;
pub mod models;
pub mod resolver;
pub mod types;

pub use artifacts::{ArtifactLoader, Artifacts};
pub use heuristic::{heuristic_matches, heuristic_predict};
pub use models::{ModelArtifact, VectorizerArtifact};
pub use resolver::ClassifierResolver;
pub use types::*;

use crate::error::Result;

/// Converts raw documents into the feature space a classifier expects
#[cfg_attr(test, mockall::automock)]
pub trait Vectorizer: Send + Sync {
    /// Transform a batch of documents, one feature row per document
    fn transform(&self, docs: &[String]) -> Result<FeatureMatrix>;
}

/// Trained classifier
#[cfg_attr(test, mockall::automock)]
pub trait SpamModel: Send + Sync {
    /// Predict one raw label per input document
    fn predict(&self, input: &ModelInput) -> Result<Vec<RawLabel>>;
}
