//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::{DaemonConfig, StorageConfig};
use crate::error::{DaemonError, DaemonResult};
use govflow_engine::GovernanceService;
use govflow_store::{InMemoryStore, Store};
use std::sync::Arc;
use tokio::net::TcpListener;

/// Govflow Daemon Server
pub struct Server {
    config: DaemonConfig,
    service: GovernanceService,
}

impl Server {
    /// Create a new server with the given configuration
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let store = build_store(&config.storage);
        let service = GovernanceService::new(store, config.engine.clone());

        Ok(Self { config, service })
    }

    /// Run the server
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.service.clone());
        let app = create_router(state, &self.config.server);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Govflow daemon listening on {}", addr);

        // Run server with graceful shutdown
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Govflow daemon shutting down");
        Ok(())
    }
}

fn build_store(config: &StorageConfig) -> Arc<dyn Store> {
    match config {
        StorageConfig::Memory { limits } => {
            tracing::info!(
                max_documents_per_collection = ?limits.max_documents_per_collection,
                "Using in-memory storage"
            );
            Arc::new(InMemoryStore::with_limits(limits.clone()))
        }
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
