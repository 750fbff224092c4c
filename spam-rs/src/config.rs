//! Configuration for spam-rs
//!
//! Values come from built-in defaults, an optional TOML file and
//! `SPAM_RS__SECTION__KEY` environment variables, in that order.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use crate::error::{Result, SpamError};

/// Environment variable prefix, e.g. `SPAM_RS__SERVER__LISTEN_ADDR`
pub const ENV_PREFIX: &str = "SPAM_RS";

/// Main configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub artifacts: ArtifactsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address (e.g., "0.0.0.0:5000")
    pub listen_addr: String,
}

/// Where to look for classifier and vectorizer files
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArtifactsConfig {
    /// Directory candidate names are resolved against
    pub base_dir: PathBuf,
    /// Classifier file names, tried in order
    pub model_candidates: Vec<String>,
    /// Vectorizer file names, tried in order
    pub vectorizer_candidates: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter when RUST_LOG is unset
    pub level: String,
    /// "pretty", "compact" or "json"
    pub format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
        }
    }
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            model_candidates: vec![
                "model.joblib".to_string(),
                "model.pkl".to_string(),
                "spam_model.joblib".to_string(),
                "spam_model.pkl".to_string(),
            ],
            vectorizer_candidates: vec![
                "vectorizer.joblib".to_string(),
                "vectorizer.pkl".to_string(),
                "vect.joblib".to_string(),
                "vect.pkl".to_string(),
            ],
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Layer defaults, an optional TOML file and the environment
    ///
    /// The result is not validated, so callers can apply overrides first.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = ::config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(::config::File::new(
                &path.to_string_lossy(),
                ::config::FileFormat::Toml,
            ));
        }

        let config: Self = builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.listen_addr()?;

        match self.logging.format.as_str() {
            "pretty" | "compact" | "json" => {}
            other => {
                return Err(SpamError::Config(format!(
                    "Unknown logging format '{}', expected pretty, compact or json",
                    other
                )))
            }
        }

        Ok(())
    }

    /// Parsed listen address
    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.server.listen_addr.parse().map_err(|e| {
            SpamError::Config(format!(
                "Invalid listen address '{}': {}",
                self.server.listen_addr, e
            ))
        })
    }
}
