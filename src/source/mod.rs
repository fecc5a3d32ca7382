//! Meter Data Sources
//!
//! A meter source answers two questions: what are the current statistics,
//! and please clear them. Two implementations exist:
//! - `MeterClient` talks to a live backend over HTTP
//! - `MockSource` reads from an in-process simulator
//!
//! [`select_source`] picks one from explicit configuration.

mod client;
mod error;
mod mock;

pub use client::{MeterClient, CLEAR_PATH, DATA_PATH};
pub use error::{SourceError, SourceResult};
pub use mock::MockSource;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::meter::{ClearResponse, DataResponse};
use crate::simulator::{Simulator, SimulatorConfig};

/// Common trait for all meter sources
#[async_trait]
pub trait MeterSource: Send + Sync {
    /// Short name for logs ("live" or "mock")
    fn name(&self) -> &str;

    /// Fetch the current statistics snapshot
    async fn fetch_snapshot(&self) -> SourceResult<DataResponse>;

    /// Clear all statistics
    async fn clear_snapshot(&self) -> SourceResult<ClearResponse>;
}

/// Data source selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Development mode; mock data is only reachable when this is set
    #[serde(default = "default_dev_mode")]
    pub dev_mode: bool,

    /// Use the simulator instead of the backend while in development mode
    #[serde(default = "default_mock_enabled")]
    pub mock_enabled: bool,

    /// Base URL of the live meter backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// How often `watch` polls the source (ms)
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Optional request timeout for the live backend (ms)
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
}

fn default_dev_mode() -> bool {
    cfg!(debug_assertions)
}

fn default_mock_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "http://localhost:8989".to_string()
}

fn default_poll_interval() -> u64 {
    1000
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            dev_mode: default_dev_mode(),
            mock_enabled: default_mock_enabled(),
            base_url: default_base_url(),
            poll_interval_ms: default_poll_interval(),
            request_timeout_ms: None,
        }
    }
}

impl SourceConfig {
    /// Whether calls should be served by the simulator
    pub fn use_mock(&self) -> bool {
        self.dev_mode && self.mock_enabled
    }
}

/// Pick the source for this configuration
///
/// The simulator is only consulted in mock mode, so live callers pass
/// `None`. In mock mode without one, a default simulator is created.
/// Callers that want a ticking feed should `start()` theirs before handing
/// it over.
pub fn select_source(
    config: &SourceConfig,
    simulator: Option<Arc<Simulator>>,
) -> SourceResult<Arc<dyn MeterSource>> {
    if config.use_mock() {
        tracing::debug!("Selected simulated meter source");
        let simulator =
            simulator.unwrap_or_else(|| Arc::new(Simulator::new(SimulatorConfig::default())));
        Ok(Arc::new(MockSource::new(simulator)))
    } else {
        tracing::debug!(base_url = %config.base_url, "Selected live meter source");
        Ok(Arc::new(MeterClient::new(config)?))
    }
}
