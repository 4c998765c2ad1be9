pub mod config;
pub mod model;
pub mod poll_stats;
pub mod poller;
pub mod render;
pub mod router;
pub mod routes;
pub mod state;
pub mod templates;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::poller::Poller;
use crate::router::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cfg = Config::from_env().context("invalid configuration")?;

    // 1. Poller owns the snapshot; handlers only get the read side
    let mut poller = Poller::from_config(&cfg).context("failed to build HTTP client")?;
    let app_state = Arc::new(AppState {
        snapshots: poller.subscribe(),
        stats: poller.stats(),
        poll_interval: cfg.poll_interval,
    });

    // 2. Serve HTTP
    let router = build_router(app_state);
    let listener = TcpListener::bind(&cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;
    info!("Listening on {}", cfg.bind_addr);

    poller.start();

    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(?e, "failed to install Ctrl+C handler");
        }
        info!("shutdown signal received - closing HTTP server");
    };

    let served = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal)
        .await;

    // 3. Teardown: no more polls once the host is gone
    poller.stop().await;
    served?;

    info!("container-dash terminated cleanly");
    Ok(())
}
