//! Meterboard Mock Backend
//!
//! Run with: cargo run --bin meterboard-api
//!
//! Serves a simulated fight over the meter backend's API so the dashboard
//! can be developed without a game client.
//!
//! # Configuration
//!
//! Config file: first argument, or the default search locations.
//!
//! Environment variables:
//! - `METERBOARD_HOST`: Host to bind to (default: 127.0.0.1)
//! - `METERBOARD_PORT`: Port to listen on (default: 8989)
//! - `METERBOARD_SEED`: Fixed simulator seed
//! - `RUST_LOG`: Log filter (default: meterboard=info,tower_http=info)

use anyhow::Context;
use meterboard::api::{serve, AppState};
use meterboard::config::Config;
use meterboard::simulator::Simulator;
use std::path::PathBuf;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Config::load_with_env(&path)?,
        None => Config::load_default(),
    };

    meterboard::logging::init(&config.logging);

    tracing::info!("Starting meterboard mock backend v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        tick_interval_ms = config.simulator.tick_interval_ms,
        restart_delay_ms = config.simulator.restart_delay_ms,
        seed = ?config.simulator.seed,
        "Simulator configuration"
    );

    let simulator = Arc::new(Simulator::new(config.simulator.clone()));
    simulator.start().await;

    let state = AppState::new(Arc::clone(&simulator));
    serve(state, &config.server)
        .await
        .context("Mock backend failed")?;

    simulator.stop().await;
    tracing::info!("Meterboard mock backend stopped");

    Ok(())
}
