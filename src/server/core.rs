use log::{error, info, warn};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::server::{AppState, build_router};

pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
    config: ServerConfig,
}

impl Server {
    pub async fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let state = Arc::new(AppState::from_config(&config)?);
        let addr = config.listen_addr();

        let listener = match TcpListener::bind(&addr).await {
            Ok(listener) => {
                info!("Server bound to {}", addr);
                listener
            }
            Err(e) => {
                error!("Failed to bind to {}: {}", addr, e);
                return Err(ServerError::Bind { addr, source: e });
            }
        };

        if let Err(e) = state.store.ensure_root().await {
            warn!("Failed to create upload directory: {}", e);
        } else {
            info!("Upload directory: {}", state.store.root().display());
        }

        Ok(Self {
            listener,
            state,
            config,
        })
    }

    /// Serves requests until ctrl-c. Each connection runs on its own task.
    pub async fn start(self) -> Result<(), ServerError> {
        let addr = self.listener.local_addr()?;
        info!("Starting file server on http://{}", addr);

        let router = build_router(Arc::clone(&self.state), &self.config);
        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
