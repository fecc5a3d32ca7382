//! Simulated Combat Feed
//!
//! Emulates a live meter backend for local development and UI testing.
//!
//! ## Architecture
//!
//! - **Roster**: Fixed player pool and profession catalog
//! - **Generator**: Builds fresh records and advances them one tick at a time
//! - **Simulator**: Owns the population, the ticker and the delayed restart
//!
//! ## Lifecycle
//!
//! 1. `Simulator::new` picks 2-4 players and generates their records
//! 2. `start()` advances every record every 200 ms until `stop()`
//! 3. `clear_and_restart()` empties the population and brings a fresh
//!    roster back one second later

mod engine;
mod generator;
mod roster;

pub use engine::{Simulator, SimulatorConfig, SimulatorStats};
pub use generator::{apply_tick, generate_record, TickDelta};
pub use roster::{pick_distinct_players, random_player_id, PLAYER_POOL, PROFESSIONS};
