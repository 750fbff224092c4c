//! Startup loading of classifier and vectorizer artifacts
//!
//! Each slot is filled from the first candidate file that exists and parses.
//! A missing or unreadable artifact only leaves its slot empty.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, error, info};

use super::models::{ModelArtifact, VectorizerArtifact};
use super::{SpamModel, Vectorizer};
use crate::config::ArtifactsConfig;
use crate::error::{Result, SpamError};

/// Artifacts available for the lifetime of the process
#[derive(Clone, Default)]
pub struct Artifacts {
    pub model: Option<Arc<dyn SpamModel>>,
    pub vectorizer: Option<Arc<dyn Vectorizer>>,
    /// File the classifier was loaded from
    pub model_path: Option<PathBuf>,
    /// File the vectorizer was loaded from
    pub vectorizer_path: Option<PathBuf>,
}

impl fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifacts")
            .field("model_path", &self.model_path)
            .field("vectorizer_path", &self.vectorizer_path)
            .finish()
    }
}

/// Probes candidate files for artifacts
pub struct ArtifactLoader {
    base_dir: PathBuf,
    model_candidates: Vec<String>,
    vectorizer_candidates: Vec<String>,
}

impl ArtifactLoader {
    pub fn new(config: &ArtifactsConfig) -> Self {
        Self {
            base_dir: config.base_dir.clone(),
            model_candidates: config.model_candidates.clone(),
            vectorizer_candidates: config.vectorizer_candidates.clone(),
        }
    }

    /// Load both slots, never failing
    pub fn load(&self) -> Artifacts {
        let model = self.probe("model", &self.model_candidates, load_model_file);
        let vectorizer = self.probe("vectorizer", &self.vectorizer_candidates, load_vectorizer_file);

        if model.is_none() {
            info!("No model loaded from {}, using rule-based fallback", self.base_dir.display());
        }

        let (model, model_path) = split(model);
        let (vectorizer, vectorizer_path) = split(vectorizer);

        Artifacts {
            model: model.map(|m| Arc::new(m) as Arc<dyn SpamModel>),
            vectorizer: vectorizer.map(|v| Arc::new(v) as Arc<dyn Vectorizer>),
            model_path,
            vectorizer_path,
        }
    }

    /// First candidate that exists and loads, with its path
    fn probe<T>(
        &self,
        kind: &str,
        candidates: &[String],
        load: impl Fn(&Path) -> Result<T>,
    ) -> Option<(T, PathBuf)> {
        for name in candidates {
            let path = self.base_dir.join(name);
            if !path.is_file() {
                debug!("No {} at {}", kind, path.display());
                continue;
            }

            match load(&path) {
                Ok(artifact) => {
                    info!("Loaded {} from {}", kind, path.display());
                    return Some((artifact, path));
                }
                Err(e) => error!("Failed loading {} {}: {}", kind, path.display(), e),
            }
        }
        None
    }
}

fn split<T>(loaded: Option<(T, PathBuf)>) -> (Option<T>, Option<PathBuf>) {
    match loaded {
        Some((artifact, path)) => (Some(artifact), Some(path)),
        None => (None, None),
    }
}

fn read_artifact(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path).map_err(|e| SpamError::Artifact {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

fn artifact_error(path: &Path, err: SpamError) -> SpamError {
    SpamError::Artifact {
        path: path.to_path_buf(),
        reason: err.to_string(),
    }
}

/// Read and validate a classifier artifact
pub fn load_model_file(path: &Path) -> Result<ModelArtifact> {
    let bytes = read_artifact(path)?;
    ModelArtifact::from_json_slice(&bytes).map_err(|e| artifact_error(path, e))
}

/// Read and validate a vectorizer artifact
pub fn load_vectorizer_file(path: &Path) -> Result<VectorizerArtifact> {
    let bytes = read_artifact(path)?;
    VectorizerArtifact::from_json_slice(&bytes).map_err(|e| artifact_error(path, e))
}
