// E2E test helpers
// Starts spam-rs in-process on an ephemeral port and talks to it over real HTTP

use spam_rs::api::WebServer;
use spam_rs::classifier::{ArtifactLoader, ClassifierResolver};
use spam_rs::config::ArtifactsConfig;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::debug;

/// A running spam-rs instance
pub struct TestServer {
    pub base_url: String,
    shutdown: Option<oneshot::Sender<()>>,
    handle: Option<JoinHandle<std::io::Result<()>>>,
}

impl TestServer {
    /// Start a server that only has the heuristic
    pub async fn start() -> Result<Self, String> {
        Self::start_with_resolver(ClassifierResolver::heuristic_only()).await
    }

    /// Start a server loading artifacts from `dir` like the binary does
    pub async fn start_with_artifacts(dir: &Path) -> Result<Self, String> {
        let config = ArtifactsConfig {
            base_dir: dir.to_path_buf(),
            ..ArtifactsConfig::default()
        };
        let artifacts = ArtifactLoader::new(&config).load();
        Self::start_with_resolver(ClassifierResolver::from_artifacts(artifacts)).await
    }

    async fn start_with_resolver(resolver: ClassifierResolver) -> Result<Self, String> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .map_err(|e| format!("Failed to bind: {}", e))?;
        let addr: SocketAddr = listener
            .local_addr()
            .map_err(|e| format!("No local address: {}", e))?;

        let (tx, rx) = oneshot::channel::<()>();
        let server = WebServer::new(resolver, addr);
        let handle = tokio::spawn(async move {
            server
                .serve(listener, async move {
                    let _ = rx.await;
                })
                .await
        });

        let test_server = Self {
            base_url: format!("http://{}", addr),
            shutdown: Some(tx),
            handle: Some(handle),
        };
        test_server.wait_until_ready(10).await?;
        Ok(test_server)
    }

    /// Wait for the page to answer
    async fn wait_until_ready(&self, timeout_secs: u64) -> Result<(), String> {
        let client = reqwest::Client::new();
        let start = std::time::Instant::now();

        loop {
            if start.elapsed().as_secs() > timeout_secs {
                return Err(format!("Timeout waiting for service: {}", self.base_url));
            }

            match client.get(&self.base_url).send().await {
                Ok(_) => return Ok(()),
                Err(e) => {
                    debug!("Server not ready yet: {}", e);
                    sleep(Duration::from_millis(50)).await;
                }
            }
        }
    }

    /// Submit the form and return the rendered page
    pub async fn submit(&self, email: &str) -> Result<String, String> {
        let response = reqwest::Client::new()
            .post(&self.base_url)
            .form(&[("email", email)])
            .send()
            .await
            .map_err(|e| format!("Request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("Unexpected status: {}", response.status()));
        }

        response
            .text()
            .await
            .map_err(|e| format!("Failed to read body: {}", e))
    }

    /// Stop the server and wait for it to exit
    pub async fn stop(mut self) -> Result<(), String> {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match self.handle.take() {
            Some(handle) => handle
                .await
                .map_err(|e| format!("Server task panicked: {}", e))?
                .map_err(|e| format!("Server error: {}", e)),
            None => Ok(()),
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Label rendered on a result page, if any
pub fn rendered_prediction(html: &str) -> Option<&'static str> {
    if html.contains("Prediction: Spam") {
        Some("Spam")
    } else if html.contains("Prediction: Ham") {
        Some("Ham")
    } else {
        None
    }
}
