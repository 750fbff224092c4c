//! Web server - HTTP front-end for the classifier

use axum::{routing::get, Router};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::api::web::{self, AppState};
use crate::classifier::ClassifierResolver;

/// Web server configuration
pub struct WebServer {
    state: Arc<AppState>,
    addr: SocketAddr,
}

impl WebServer {
    /// Create a new web server
    pub fn new(resolver: ClassifierResolver, addr: SocketAddr) -> Self {
        let state = Arc::new(AppState { resolver });
        Self { state, addr }
    }

    /// Build the router
    pub fn router(&self) -> Router {
        router(self.state.clone())
    }

    /// Bind the configured address and serve until shutdown
    pub async fn run(&self) -> std::io::Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve<F>(&self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        info!("Starting web server on http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;

        info!("Web server stopped");
        Ok(())
    }
}

/// Single page: form on GET, classification on POST
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(web::index_page).post(web::index_submit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Resolves on Ctrl-C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
