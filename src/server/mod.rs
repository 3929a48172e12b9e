pub mod api;
pub mod error;
pub mod ws;

use std::sync::Arc;

use anyhow::Result;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;

use crate::core::config::Config;
use crate::services::fs::dir_size::DirSizeService;

/// Shared by every request. The size cache is process-wide, not per client.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sizes: Arc<DirSizeService>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            sizes: Arc::new(DirSizeService::new()),
        }
    }
}

pub fn router(state: AppState) -> Router {
    let routes = Router::new()
        .route("/default_dir", get(api::default_dir))
        .route("/list_dir", get(api::list_dir))
        .route("/filter_dir", get(api::filter_dir))
        .route("/dir_size", get(api::dir_size))
        .route("/create_dir", get(api::create_dir))
        .route("/refresh", get(api::refresh).post(api::refresh))
        .route("/ws/link_files", get(ws::link_files));

    Router::new().nest("/api", routes).with_state(state)
}

pub async fn serve(config: Config) -> Result<()> {
    let listener = TcpListener::bind(config.bind).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        default_dir = %config.default_dir.display(),
        "listening"
    );

    axum::serve(listener, router(AppState::new(config)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
