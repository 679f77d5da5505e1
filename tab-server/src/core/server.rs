//! Server Implementation
//!
//! HTTP 服务器启动和管理

use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;

use crate::api;
use crate::core::{Config, Result, ServerError, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: Option<ServerState>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
        }
    }

    /// Serve until Ctrl-C, then drain in-flight requests and close the database
    pub async fn run(&self) -> Result<()> {
        let state = match &self.state {
            Some(s) => s.clone(),
            None => ServerState::initialize(&self.config).await?,
        };

        let addr = self.config.bind_addr();
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;
        tracing::info!("Tab server listening on {}", addr);

        let app = api::build_app(&state).with_state(state.clone());

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        let mut serve = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    let _ = shutdown_rx.await;
                })
                .await
        });

        let result = tokio::select! {
            joined = &mut serve => flatten(joined),
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down...");
                let _ = shutdown_tx.send(());

                let timeout = Duration::from_millis(self.config.shutdown_timeout_ms);
                match tokio::time::timeout(timeout, &mut serve).await {
                    Ok(joined) => flatten(joined),
                    Err(_) => {
                        tracing::warn!(timeout_ms = self.config.shutdown_timeout_ms, "Graceful shutdown timed out");
                        serve.abort();
                        Ok(())
                    }
                }
            }
        };

        state.shutdown().await;
        tracing::info!("Server stopped");
        result
    }
}

fn flatten(
    joined: std::result::Result<std::io::Result<()>, tokio::task::JoinError>,
) -> Result<()> {
    match joined {
        Ok(served) => served
            .context("HTTP server failed")
            .map_err(ServerError::Internal),
        Err(e) => Err(ServerError::Internal(
            anyhow::Error::new(e).context("HTTP server task failed"),
        )),
    }
}
