//! spam-rs: Spam/ham classification web front-end
//!
//! Classifies a submitted email text as `Spam` or `Ham`.
//!
//! # Features
//!
//! - **Trained artifacts**: optional classifier and vectorizer loaded once at startup
//! - **Graceful degradation**: keyword heuristic when artifacts are missing or fail
//! - **Label normalization**: numeric, boolean and textual classifier outputs
//! - **Web UI**: single form page rendered with askama
//!
//! # Example
//!
//! ```no_run
//! use spam_rs::api::WebServer;
//! use spam_rs::classifier::{ArtifactLoader, ClassifierResolver};
//! use spam_rs::config::Config;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::default();
//!     let artifacts = ArtifactLoader::new(&config.artifacts).load();
//!     let resolver = ClassifierResolver::from_artifacts(artifacts);
//!
//!     let server = WebServer::new(resolver, config.listen_addr()?);
//!     server.run().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`classifier`]: Resolver, heuristic, label types and artifact formats
//! - [`config`]: Configuration management
//! - [`error`]: Error types and handling
//! - [`api`]: HTTP routes and server

pub mod api;
pub mod classifier;
pub mod config;
pub mod error;

// Re-export commonly used types
pub use classifier::{ClassifierResolver, Label};
pub use config::Config;
pub use error::{Result, SpamError};
