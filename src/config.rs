//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::api::ApiConfig;
use crate::simulator::SimulatorConfig;
use crate::source::SourceConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,

    #[serde(default)]
    pub simulator: SimulatorConfig,

    #[serde(default)]
    pub server: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("meterboard").join("config.toml")),
            Some(PathBuf::from("./meterboard.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::debug!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        // Source overrides
        if let Some(url) = lookup("METERBOARD_BASE_URL") {
            self.source.base_url = url;
        }
        if let Some(flag) = lookup("METERBOARD_MOCK").and_then(|v| parse_flag(&v)) {
            self.source.mock_enabled = flag;
        }
        if let Some(flag) = lookup("METERBOARD_DEV_MODE").and_then(|v| parse_flag(&v)) {
            self.source.dev_mode = flag;
        }

        // Simulator overrides
        if let Some(seed) = lookup("METERBOARD_SEED").and_then(|v| v.parse().ok()) {
            self.simulator.seed = Some(seed);
        }

        // Server overrides
        if let Some(host) = lookup("METERBOARD_HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("METERBOARD_PORT").and_then(|v| v.parse().ok()) {
            self.server.port = port;
        }

        // Logging overrides
        if let Some(level) = lookup("METERBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("METERBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Meterboard Configuration
#
# Environment variables override these settings:
# - METERBOARD_BASE_URL
# - METERBOARD_MOCK
# - METERBOARD_DEV_MODE
# - METERBOARD_SEED
# - METERBOARD_HOST
# - METERBOARD_PORT
# - METERBOARD_LOG_LEVEL
# - METERBOARD_LOG_FORMAT

[source]
# Development mode; mock data is only used when this is true.
# Defaults to true in debug builds and false in release builds.
# dev_mode = true

# Serve statistics from the built-in simulator instead of the backend
mock_enabled = true

# Live meter backend
base_url = "http://localhost:8989"

# How often `meterboard watch` polls (ms)
poll_interval_ms = 1000

# Optional request timeout for the backend (ms)
# request_timeout_ms = 5000

[simulator]
# How often simulated statistics advance (ms)
tick_interval_ms = 200

# Delay before a fresh roster appears after a clear (ms)
restart_delay_ms = 1000

# Size of the simulated roster
min_players = 2
max_players = 4

# Window for cumulative DPS/HPS (seconds)
cumulative_window_secs = 60.0

# Delay mock responses as if they crossed the network
simulate_latency = true

# Fixed seed for reproducible runs
# seed = 42

[server]
# Mock backend host
host = "127.0.0.1"

# Mock backend port
port = 8989

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
