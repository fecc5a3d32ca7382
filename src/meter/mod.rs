//! Meter Data Model
//!
//! Combat statistics keyed by player identifier, and the JSON envelopes
//! the meter backend returns.

mod types;

pub use types::{
    Breakdown, ClearResponse, CombatRecord, DataResponse, HitCounts, PlayerId, Population,
    CLEAR_MESSAGE, CODE_OK,
};
