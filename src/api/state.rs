//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::simulator::Simulator;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Simulated combat feed served by the mock backend
    pub simulator: Arc<Simulator>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
    /// Wall-clock start time, reported by the health endpoint
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(simulator: Arc<Simulator>) -> Self {
        Self {
            simulator,
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8989
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ApiConfig {
    /// Create config with custom host and port
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_addr() {
        assert_eq!(ApiConfig::default().addr(), "127.0.0.1:8989");
        assert_eq!(ApiConfig::new("0.0.0.0", 9000).addr(), "0.0.0.0:9000");
    }
}
