#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod config;
mod server;

use std::process;

use anyhow::Context;
use axum::Router;
use snapcdn_server::handler;
use snapcdn_server::service::ServiceState;
use tower_http::trace::TraceLayer;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_SERVER_STARTUP: &str = "snapcdn_cli::server::startup";
pub const TRACING_TARGET_SERVER_SHUTDOWN: &str = "snapcdn_cli::server::shutdown";
pub const TRACING_TARGET_CONFIG: &str = "snapcdn_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        tracing::info!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            "application terminated successfully"
        );
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_SERVER_SHUTDOWN,
            error = %error,
            "application terminated with error"
        );
    } else {
        eprintln!("Error: {error:#}");
    }

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.validate().context("invalid configuration")?;
    cli.log();

    let state = ServiceState::from_config(&cli.service)
        .await
        .context("failed to initialize asset storage")?;

    // Reconcile before the first request: anything still in staging is an
    // orphan from a previous crash.
    let swept = state
        .asset_store()
        .sweep_staging()
        .await
        .context("failed to sweep staging directory")?;
    if swept > 0 {
        tracing::warn!(
            target: TRACING_TARGET_SERVER_STARTUP,
            swept = swept,
            "removed orphaned staging files from a previous run"
        );
    }

    let router = create_router(state);
    server::serve(router, cli.server).await?;

    Ok(())
}

/// Creates the router with request tracing applied around all routes.
fn create_router(state: ServiceState) -> Router {
    handler::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
