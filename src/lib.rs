//! # Meterboard
//!
//! Damage/healing meter toolkit: polls a combat statistics backend keyed by
//! player identifier, and falls back to a simulated combat feed when no
//! backend is available.
//!
//! ## Features
//!
//! - **Live source**: One-shot JSON fetches against the meter backend
//! - **Simulated feed**: Randomized players whose statistics evolve every tick
//! - **Mock backend**: Serves the simulated feed over the backend's wire contract
//! - **Terminal meter**: Summary and detailed views of any source
//!
//! ## Modules
//!
//! - [`meter`]: Combat record data model and response envelopes
//! - [`simulator`]: Simulated combat feed with start/stop lifecycle
//! - [`source`]: Live and simulated data sources behind one trait
//! - [`api`]: Mock backend server with Axum
//! - [`report`]: Text rendering of snapshots
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use meterboard::simulator::{Simulator, SimulatorConfig};
//! use meterboard::source::{select_source, MeterSource, SourceConfig};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let simulator = Arc::new(Simulator::new(SimulatorConfig::default()));
//!     simulator.start().await;
//!
//!     let config = SourceConfig { dev_mode: true, mock_enabled: true, ..Default::default() };
//!     let source = select_source(&config, Some(Arc::clone(&simulator)))?;
//!
//!     let snapshot = source.fetch_snapshot().await?;
//!     println!("Tracking {} players", snapshot.user.len());
//!
//!     simulator.stop().await;
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod logging;
pub mod meter;
pub mod report;
pub mod simulator;
pub mod source;

// Re-export top-level types for convenience
pub use meter::{
    Breakdown, ClearResponse, CombatRecord, DataResponse, HitCounts, PlayerId, Population,
};

pub use simulator::{Simulator, SimulatorConfig, SimulatorStats, TickDelta};

pub use source::{
    select_source, MeterClient, MeterSource, MockSource, SourceConfig, SourceError, SourceResult,
};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};

pub use report::{render, SortKey, View};
