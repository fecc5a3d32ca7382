//! Data Transfer Objects
//!
//! Request and response types for the mock backend endpoints beyond the
//! meter envelopes in [`crate::meter`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::meter::PlayerId;
use crate::simulator::SimulatorStats;

// ============================================
// PLAYER DTOs
// ============================================

/// Add player request
#[derive(Debug, Default, Deserialize)]
pub struct AddPlayerRequest {
    /// Identifier to add; a random pool identifier when omitted
    #[serde(default)]
    pub uid: Option<String>,
}

/// Add player response
#[derive(Debug, Serialize, Deserialize)]
pub struct AddPlayerResponse {
    pub code: i32,
    pub uid: PlayerId,
    /// False when the player was already tracked
    pub created: bool,
}

/// Tracked players
#[derive(Debug, Serialize, Deserialize)]
pub struct PlayerListResponse {
    pub code: i32,
    pub players: Vec<PlayerId>,
}

// ============================================
// HEALTH DTOs
// ============================================

/// Full health status
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Overall status: healthy, degraded
    pub status: String,
    /// Simulator state
    pub simulator: SimulatorStats,
    /// Server uptime in seconds
    pub uptime_seconds: u64,
    /// When the server started
    pub started_at: DateTime<Utc>,
    /// Application version
    pub version: String,
}
