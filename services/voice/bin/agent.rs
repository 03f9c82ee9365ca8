//! Main Entrypoint for the Rooftops Voice Agent Worker
//!
//! This binary is responsible for:
//! 1. Loading configuration from the environment.
//! 2. Initializing logging.
//! 3. Registering the session bootstrap entrypoint with the worker runtime.
//! 4. Running the worker CLI, which dispatches one job per room connection.

use anyhow::Context;
use rooftops_agents::{WorkerOptions, cli};
use rooftops_voice::{bootstrap, config::Config};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // --- 1. Load Configuration ---
    let config = Config::from_env().context("Failed to load configuration")?;

    // --- 2. Initialize Logging ---
    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .with_timer(tracing_subscriber::fmt::time::ChronoLocal::rfc_3339())
        .init();
    info!(
        backend = ?config.tts_backend,
        model = %config.chat_model,
        "Configuration loaded. Starting worker..."
    );

    // --- 3. Register the Entrypoint and Run ---
    let config = Arc::new(config);
    let options = WorkerOptions::new(move |ctx| bootstrap::entrypoint(ctx, config.clone()));
    cli::run_app(options).await
}
