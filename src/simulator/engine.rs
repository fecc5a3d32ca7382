//! Simulator Engine
//!
//! Owns the simulated population and the background tasks that evolve it.
//! The population and its RNG sit behind a single lock, so every snapshot
//! sees a fully ticked set of records.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::generator::{apply_tick, generate_record, TickDelta};
use super::roster::{pick_distinct_players, random_player_id};
use crate::meter::{ClearResponse, CombatRecord, DataResponse, PlayerId, Population, CLEAR_MESSAGE};

/// Simulator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulatorConfig {
    /// How often every record is advanced (ms)
    #[serde(default = "default_tick_interval")]
    pub tick_interval_ms: u64,

    /// Delay between a clear and the fresh population (ms)
    #[serde(default = "default_restart_delay")]
    pub restart_delay_ms: u64,

    #[serde(default = "default_min_players")]
    pub min_players: usize,

    #[serde(default = "default_max_players")]
    pub max_players: usize,

    /// Window that cumulative DPS/HPS are computed over after each tick
    #[serde(default = "default_cumulative_window")]
    pub cumulative_window_secs: f64,

    /// Delay mock responses as if they crossed the network
    #[serde(default = "default_simulate_latency")]
    pub simulate_latency: bool,

    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_tick_interval() -> u64 {
    200
}

fn default_restart_delay() -> u64 {
    1000
}

fn default_min_players() -> usize {
    2
}

fn default_max_players() -> usize {
    4
}

fn default_cumulative_window() -> f64 {
    60.0
}

fn default_simulate_latency() -> bool {
    true
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval(),
            restart_delay_ms: default_restart_delay(),
            min_players: default_min_players(),
            max_players: default_max_players(),
            cumulative_window_secs: default_cumulative_window(),
            simulate_latency: default_simulate_latency(),
            seed: None,
        }
    }
}

impl SimulatorConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn restart_delay(&self) -> Duration {
        Duration::from_millis(self.restart_delay_ms)
    }

    /// Player count bounds, ordered and non-empty
    fn player_bounds(&self) -> (usize, usize) {
        let lo = self.min_players.min(self.max_players);
        let hi = self.min_players.max(self.max_players);
        (lo, hi)
    }
}

/// Point-in-time view of the simulator for health reporting
#[derive(Debug, Clone, Serialize)]
pub struct SimulatorStats {
    pub players: usize,
    pub ticks: u64,
    pub running: bool,
    pub restart_pending: bool,
}

/// Population plus the RNG that evolves it
struct SimState {
    population: Population,
    rng: StdRng,
}

impl SimState {
    fn initialize(&mut self, config: &SimulatorConfig) {
        self.population.clear();

        let (lo, hi) = config.player_bounds();
        let count = self.rng.random_range(lo..=hi);

        for id in pick_distinct_players(&mut self.rng, count) {
            let record = generate_record(&mut self.rng);
            self.population.insert(id.to_string(), record);
        }
    }

    fn tick(&mut self, window_secs: f64) -> BTreeMap<PlayerId, TickDelta> {
        let rng = &mut self.rng;
        self.population
            .iter_mut()
            .map(|(id, record)| (id.clone(), apply_tick(record, &mut *rng, window_secs)))
            .collect()
    }
}

/// Simulated combat feed
///
/// Construct once, share as `Arc<Simulator>`, and call [`Simulator::start`]
/// to begin ticking. Dropping the simulator cancels its background tasks.
pub struct Simulator {
    state: Arc<RwLock<SimState>>,
    config: SimulatorConfig,
    ticks: Arc<AtomicU64>,
    ticker: Mutex<Option<JoinHandle<()>>>,
    pending_restart: Mutex<Option<JoinHandle<()>>>,
}

impl Simulator {
    /// Create a simulator with an initialized population
    ///
    /// Uses `config.seed` when set, otherwise OS entropy.
    pub fn new(config: SimulatorConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    /// Create a simulator driven by the given RNG
    pub fn with_rng(config: SimulatorConfig, rng: StdRng) -> Self {
        let mut state = SimState {
            population: Population::new(),
            rng,
        };
        state.initialize(&config);

        tracing::debug!(players = state.population.len(), "Simulated population initialized");

        Self {
            state: Arc::new(RwLock::new(state)),
            config,
            ticks: Arc::new(AtomicU64::new(0)),
            ticker: Mutex::new(None),
            pending_restart: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SimulatorConfig {
        &self.config
    }

    /// Start the background ticker
    ///
    /// Returns false if it was already running.
    pub async fn start(&self) -> bool {
        let mut ticker = self.ticker.lock().await;
        if ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            tracing::debug!("Simulator already running");
            return false;
        }

        let state = Arc::clone(&self.state);
        let ticks = Arc::clone(&self.ticks);
        let interval = self.config.tick_interval();
        let window = self.config.cumulative_window_secs;

        tracing::info!(interval_ms = interval.as_millis() as u64, "Starting simulated combat feed");

        *ticker = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;
                let deltas = state.write().await.tick(window);
                let n = ticks.fetch_add(1, Ordering::Relaxed) + 1;
                tracing::trace!(tick = n, players = deltas.len(), "Simulator tick");
            }
        }));

        true
    }

    /// Stop ticking and cancel any pending restart
    pub async fn stop(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
            tracing::info!("Simulated combat feed stopped");
        }
        if let Some(handle) = self.pending_restart.lock().await.take() {
            handle.abort();
        }
    }

    pub async fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Replace the population with a fresh random roster
    pub async fn initialize(&self) {
        let mut state = self.state.write().await;
        state.initialize(&self.config);
        tracing::debug!(players = state.population.len(), "Simulated population initialized");
    }

    /// Advance every record by one tick
    ///
    /// The background ticker calls the same step; this entry point lets
    /// callers drive the simulator by hand.
    pub async fn tick(&self) -> BTreeMap<PlayerId, TickDelta> {
        let deltas = self
            .state
            .write()
            .await
            .tick(self.config.cumulative_window_secs);
        self.ticks.fetch_add(1, Ordering::Relaxed);
        deltas
    }

    /// Copy of the current population in a response envelope
    pub async fn snapshot(&self) -> DataResponse {
        DataResponse::ok(self.state.read().await.population.clone())
    }

    /// Clear all statistics and schedule a fresh roster
    ///
    /// The population is empty as soon as this returns and is re-initialized
    /// once `restart_delay` has elapsed. A later clear replaces the pending
    /// restart instead of adding a second one.
    pub async fn clear_and_restart(&self) -> ClearResponse {
        let mut pending = self.pending_restart.lock().await;
        if let Some(previous) = pending.take() {
            previous.abort();
        }

        self.state.write().await.population.clear();

        let state = Arc::clone(&self.state);
        let config = self.config.clone();
        let delay = config.restart_delay();

        *pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut state = state.write().await;
            state.initialize(&config);
            tracing::info!(players = state.population.len(), "Simulated population restarted");
        }));

        tracing::info!(delay_ms = delay.as_millis() as u64, "Simulated statistics cleared");
        ClearResponse::ok(CLEAR_MESSAGE)
    }

    /// Re-initialize immediately, dropping any pending restart
    pub async fn reset(&self) {
        if let Some(handle) = self.pending_restart.lock().await.take() {
            handle.abort();
        }
        self.initialize().await;
    }

    /// Add a player if absent
    ///
    /// Picks a random pool identifier when `id` is `None`. Returns the
    /// identifier and whether a new record was created.
    pub async fn add_player(&self, id: Option<&str>) -> (PlayerId, bool) {
        let mut state = self.state.write().await;
        let id = match id {
            Some(id) => id.to_string(),
            None => random_player_id(&mut state.rng).to_string(),
        };

        if state.population.contains_key(&id) {
            return (id, false);
        }

        let record = generate_record(&mut state.rng);
        state.population.insert(id.clone(), record);
        tracing::debug!(player = %id, "Simulated player added");
        (id, true)
    }

    /// Remove a player; absent identifiers are ignored
    pub async fn remove_player(&self, id: &str) -> bool {
        let removed = self.state.write().await.population.remove(id).is_some();
        if removed {
            tracing::debug!(player = %id, "Simulated player removed");
        }
        removed
    }

    pub async fn list_players(&self) -> Vec<PlayerId> {
        self.state.read().await.population.keys().cloned().collect()
    }

    pub async fn player(&self, id: &str) -> Option<CombatRecord> {
        self.state.read().await.population.get(id).cloned()
    }

    pub async fn stats(&self) -> SimulatorStats {
        let restart_pending = self
            .pending_restart
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished());

        SimulatorStats {
            players: self.state.read().await.population.len(),
            ticks: self.ticks.load(Ordering::Relaxed),
            running: self.is_running().await,
            restart_pending,
        }
    }
}

impl Drop for Simulator {
    fn drop(&mut self) {
        if let Some(handle) = self.ticker.get_mut().take() {
            handle.abort();
        }
        if let Some(handle) = self.pending_restart.get_mut().take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meter::{Breakdown, HitCounts};
    use crate::simulator::roster::PLAYER_POOL;

    fn seeded(seed: u64) -> Simulator {
        Simulator::with_rng(SimulatorConfig::default(), StdRng::seed_from_u64(seed))
    }

    #[tokio::test]
    async fn test_initial_population_size() {
        for seed in 0..50 {
            let sim = seeded(seed);
            let players = sim.list_players().await;
            assert!((2..=4).contains(&players.len()), "got {}", players.len());
            assert!(players.iter().all(|id| PLAYER_POOL.contains(&id.as_str())));
        }
    }

    #[tokio::test]
    async fn test_ticks_preserve_invariants() {
        let sim = seeded(1);
        let mut maxima: BTreeMap<PlayerId, (f64, f64)> = sim
            .snapshot()
            .await
            .user
            .into_iter()
            .map(|(id, r)| (id, (r.realtime_dps_max, r.realtime_hps_max)))
            .collect();

        for _ in 0..200 {
            sim.tick().await;
            for (id, record) in sim.snapshot().await.user {
                assert!(record.is_consistent());
                let (dps_max, hps_max) = maxima[&id];
                assert!(record.realtime_dps_max >= dps_max);
                assert!(record.realtime_hps_max >= hps_max);
                maxima.insert(id, (record.realtime_dps_max, record.realtime_hps_max));
            }
        }
    }

    #[tokio::test]
    async fn test_single_tick_count_increase() {
        let sim = seeded(8);
        {
            let mut state = sim.state.write().await;
            state.population.clear();
            for id in ["A", "B"] {
                let mut record = generate_record(&mut state.rng);
                record.total_count = HitCounts::new(50, 30, 20);
                state.population.insert(id.to_string(), record);
            }
        }

        let deltas = sim.tick().await;
        assert_eq!(deltas.len(), 2);

        for id in ["A", "B"] {
            let record = sim.player(id).await.unwrap();
            let delta = deltas[id];
            assert_eq!(record.total_count.total, 100 + delta.count_increase());
            assert!(delta.count_increase() <= 6);
            assert!(record.total_count.is_consistent());
        }
    }

    #[tokio::test]
    async fn test_snapshot_is_a_copy() {
        let sim = seeded(2);
        let mut first = sim.snapshot().await;
        let baseline = first.clone();

        for record in first.user.values_mut() {
            record.total_damage = Breakdown::default();
            record.taken_damage = 0;
        }
        first.user.insert("intruder".to_string(), CombatRecord::default());

        assert_eq!(sim.snapshot().await, baseline);
    }

    #[tokio::test]
    async fn test_add_player_is_idempotent() {
        let sim = seeded(3);
        let (id, created) = sim.add_player(Some("custom-uid")).await;
        assert_eq!(id, "custom-uid");
        assert!(created);
        let before = sim.player("custom-uid").await.unwrap();

        let (_, created) = sim.add_player(Some("custom-uid")).await;
        assert!(!created);
        assert_eq!(sim.player("custom-uid").await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_add_random_player_uses_pool() {
        let sim = seeded(4);
        let (id, _) = sim.add_player(None).await;
        assert!(PLAYER_POOL.contains(&id.as_str()));
        assert!(sim.list_players().await.contains(&id));
    }

    #[tokio::test]
    async fn test_remove_absent_player_is_noop() {
        let sim = seeded(5);
        let before = sim.snapshot().await;
        assert!(!sim.remove_player("nobody").await);
        assert_eq!(sim.snapshot().await, before);
    }

    #[tokio::test]
    async fn test_remove_present_player() {
        let sim = seeded(5);
        let id = sim.list_players().await.remove(0);
        assert!(sim.remove_player(&id).await);
        assert!(sim.player(&id).await.is_none());
    }

    #[tokio::test]
    async fn test_reset_reinitializes_immediately() {
        let sim = seeded(6);
        sim.add_player(Some("extra")).await;
        sim.reset().await;
        let players = sim.list_players().await;
        assert!((2..=4).contains(&players.len()));
        assert!(!players.contains(&"extra".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_then_restart_after_delay() {
        let sim = seeded(9);

        let ack = sim.clear_and_restart().await;
        assert_eq!(ack.code, 0);
        assert_eq!(ack.msg, CLEAR_MESSAGE);
        assert!(sim.list_players().await.is_empty());
        assert!(sim.snapshot().await.is_empty());

        tokio::time::sleep(Duration::from_millis(999)).await;
        assert!(sim.list_players().await.is_empty());

        tokio::time::sleep(Duration::from_millis(2)).await;
        let players = sim.list_players().await;
        assert!((2..=4).contains(&players.len()));
        assert!(!sim.stats().await.restart_pending);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_clear_supersedes_pending_restart() {
        let sim = seeded(10);

        sim.clear_and_restart().await;
        tokio::time::sleep(Duration::from_millis(600)).await;
        sim.clear_and_restart().await;

        // the first restart would have fired at 1000ms
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(sim.list_players().await.is_empty());

        tokio::time::sleep(Duration::from_millis(501)).await;
        assert!(!sim.list_players().await.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_background_ticker_runs_until_stopped() {
        let sim = seeded(11);
        assert!(sim.start().await);
        assert!(!sim.start().await);
        assert!(sim.is_running().await);

        tokio::time::sleep(Duration::from_millis(1010)).await;
        assert_eq!(sim.stats().await.ticks, 5);

        sim.stop().await;
        assert!(!sim.is_running().await);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(sim.stats().await.ticks, 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_keeps_running_through_clear() {
        let sim = seeded(12);
        sim.start().await;
        sim.clear_and_restart().await;

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(sim.snapshot().await.is_empty());

        tokio::time::sleep(Duration::from_millis(1000)).await;
        let snapshot = sim.snapshot().await;
        assert!(!snapshot.is_empty());
        assert!(snapshot.user.values().all(CombatRecord::is_consistent));
        assert!(sim.stats().await.ticks >= 7);
    }

    #[tokio::test]
    async fn test_seeded_simulators_agree() {
        let config = SimulatorConfig {
            seed: Some(1234),
            ..Default::default()
        };

        for _ in 0..20 {
            let a = Simulator::new(config.clone());
            let b = Simulator::new(config.clone());
            assert_eq!(a.snapshot().await, b.snapshot().await);

            for _ in 0..10 {
                assert_eq!(a.tick().await, b.tick().await);
            }
            a.add_player(None).await;
            b.add_player(None).await;
            a.tick().await;
            b.tick().await;
            assert_eq!(a.snapshot().await, b.snapshot().await);
        }
    }

    #[test]
    fn test_player_bounds_are_ordered() {
        let config = SimulatorConfig {
            min_players: 5,
            max_players: 3,
            ..Default::default()
        };
        assert_eq!(config.player_bounds(), (3, 5));
    }
}
