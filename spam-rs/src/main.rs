//! spam-rs: Spam classifier web front-end

use clap::Parser;
use spam_rs::api::WebServer;
use spam_rs::classifier::{ArtifactLoader, ClassifierResolver};
use spam_rs::config::{Config, LoggingConfig};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "spam-rs")]
#[command(about = "Classify email text as spam or ham", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen address, overrides the configuration
    #[arg(short, long)]
    listen: Option<String>,

    /// Directory containing model and vectorizer files
    #[arg(short, long)]
    base_dir: Option<PathBuf>,
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("spam_rs={},tower_http={}", logging.level, logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    match logging.format.as_str() {
        "json" => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        "compact" => registry.with(tracing_subscriber::fmt::layer().compact()).init(),
        _ => registry.with(tracing_subscriber::fmt::layer().pretty()).init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }
    if let Some(base_dir) = cli.base_dir {
        config.artifacts.base_dir = base_dir;
    }
    config.validate()?;

    init_logging(&config.logging);

    info!("Starting spam-rs v{}", env!("CARGO_PKG_VERSION"));
    info!("  Listen address: {}", config.server.listen_addr);
    info!("  Artifact directory: {}", config.artifacts.base_dir.display());

    // Artifacts are loaded once, before serving
    let artifacts = ArtifactLoader::new(&config.artifacts).load();
    let resolver = ClassifierResolver::from_artifacts(artifacts);
    info!(
        "Classifier ready (model: {}, vectorizer: {})",
        resolver.has_model(),
        resolver.has_vectorizer()
    );

    let server = WebServer::new(resolver, config.listen_addr()?);
    server.run().await?;

    Ok(())
}
