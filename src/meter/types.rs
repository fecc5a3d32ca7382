//! Core data types for combat meter statistics
//!
//! This module defines the records exchanged between the meter backend and
//! its clients:
//! - `CombatRecord`: Per-player damage, healing and hit statistics
//! - `Breakdown`: Damage or healing split into outcome buckets
//! - `HitCounts`: Hit counts split into outcome buckets
//! - `DataResponse` and `ClearResponse`: The JSON envelopes on the wire

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Status code carried by every successful envelope
pub const CODE_OK: i32 = 0;

/// Acknowledgement message returned after statistics are cleared
pub const CLEAR_MESSAGE: &str = "Statistics have been cleared!";

/// Player identifier (opaque, usually a numeric UID string)
pub type PlayerId = String;

/// Mapping from player identifier to that player's statistics
///
/// Ordered by identifier, so iteration (and any RNG draws made while
/// iterating) is the same on every run.
pub type Population = BTreeMap<PlayerId, CombatRecord>;

/// Damage or healing amounts split by outcome
///
/// `total` is the sum of the four outcome buckets. `hp_lessen` is tracked
/// separately and is not part of the total.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Breakdown {
    pub normal: u64,
    pub critical: u64,
    pub lucky: u64,
    pub crit_lucky: u64,
    /// Damage absorbed or lessened before landing
    #[serde(rename = "hpLessen")]
    pub hp_lessen: u64,
    pub total: u64,
}

impl Breakdown {
    /// Create a breakdown with a consistent total
    pub fn new(normal: u64, critical: u64, lucky: u64, crit_lucky: u64, hp_lessen: u64) -> Self {
        let mut breakdown = Self {
            normal,
            critical,
            lucky,
            crit_lucky,
            hp_lessen,
            total: 0,
        };
        breakdown.recompute_total();
        breakdown
    }

    /// Sum of the outcome buckets
    pub fn bucket_sum(&self) -> u64 {
        self.normal + self.critical + self.lucky + self.crit_lucky
    }

    /// Reset `total` to the sum of the outcome buckets
    pub fn recompute_total(&mut self) {
        self.total = self.bucket_sum();
    }

    /// Check that `total` matches the buckets
    pub fn is_consistent(&self) -> bool {
        self.total == self.bucket_sum()
    }

    /// Fraction of the total that came from critical or crit-lucky hits
    pub fn crit_ratio(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.critical + self.crit_lucky) as f64 / self.total as f64
    }
}

/// Hit counts split by outcome
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HitCounts {
    pub normal: u64,
    pub critical: u64,
    pub lucky: u64,
    pub total: u64,
}

impl HitCounts {
    /// Create hit counts with a consistent total
    pub fn new(normal: u64, critical: u64, lucky: u64) -> Self {
        Self {
            normal,
            critical,
            lucky,
            total: normal + critical + lucky,
        }
    }

    pub fn bucket_sum(&self) -> u64 {
        self.normal + self.critical + self.lucky
    }

    pub fn recompute_total(&mut self) {
        self.total = self.bucket_sum();
    }

    pub fn is_consistent(&self) -> bool {
        self.total == self.bucket_sum()
    }
}

/// Combat statistics for one player
///
/// Real-time rates are instantaneous; `total_dps`/`total_hps` cover the
/// whole encounter. Fields missing on the wire decode as zero or empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CombatRecord {
    pub realtime_dps: f64,
    pub realtime_dps_max: f64,
    pub total_dps: f64,
    pub total_damage: Breakdown,
    pub total_count: HitCounts,
    pub realtime_hps: f64,
    pub realtime_hps_max: f64,
    pub total_hps: f64,
    pub total_healing: Breakdown,
    pub taken_damage: u64,
    pub profession: String,
}

impl CombatRecord {
    /// Check the aggregate and running-maximum invariants
    pub fn is_consistent(&self) -> bool {
        self.total_damage.is_consistent()
            && self.total_healing.is_consistent()
            && self.total_count.is_consistent()
            && self.realtime_dps_max >= self.realtime_dps
            && self.realtime_hps_max >= self.realtime_hps
    }

    /// Raise the running maxima to the current real-time rates if exceeded
    pub fn raise_maxima(&mut self) {
        if self.realtime_dps > self.realtime_dps_max {
            self.realtime_dps_max = self.realtime_dps;
        }
        if self.realtime_hps > self.realtime_hps_max {
            self.realtime_hps_max = self.realtime_hps;
        }
    }

    /// Recompute the cumulative rates over a fixed window
    pub fn recompute_cumulative_rates(&mut self, window_secs: f64) {
        if window_secs <= 0.0 {
            return;
        }
        self.total_dps = self.total_damage.total as f64 / window_secs;
        self.total_hps = self.total_healing.total as f64 / window_secs;
    }
}

/// Response envelope for `GET /api/data`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataResponse {
    pub code: i32,
    #[serde(default)]
    pub user: Population,
}

impl DataResponse {
    /// Wrap a population in a successful envelope
    pub fn ok(user: Population) -> Self {
        Self {
            code: CODE_OK,
            user,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user.is_empty()
    }
}

/// Response envelope for `GET /api/clear`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClearResponse {
    pub code: i32,
    pub msg: String,
}

impl ClearResponse {
    pub fn ok(msg: impl Into<String>) -> Self {
        Self {
            code: CODE_OK,
            msg: msg.into(),
        }
    }
}
