use std::path::PathBuf;

use anyhow::Context;
use clap::Args;

use crate::app::{app, AppState};
use crate::config;

#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    #[arg(long, help = "Port to listen on (overrides QUEST_API_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Data file path (overrides QUEST_DATA_FILE)")]
    pub data: Option<PathBuf>,

    #[arg(long, help = "Seed file served by GET /batch (overrides QUEST_SEED_FILE)")]
    pub seed: Option<PathBuf>,
}

pub async fn handle(args: ServeArgs) -> anyhow::Result<()> {
    let mut config = config::config().clone();
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(data) = args.data {
        config.store.data_file = data;
    }
    if let Some(seed) = args.seed {
        config.store.seed_file = seed;
    }

    let state = AppState::from_config(&config)
        .await
        .with_context(|| format!("failed to open data file {}", config.store.data_file.display()))?;

    let bind_addr = format!("0.0.0.0:{}", config.server.port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    tracing::info!(
        "Quest API listening on http://{} (data: {})",
        bind_addr,
        config.store.data_file.display()
    );

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
