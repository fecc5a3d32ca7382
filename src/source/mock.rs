//! Simulated meter source
//!
//! Serves snapshots from an in-process [`Simulator`] instead of a backend.

use async_trait::async_trait;
use rand::Rng;
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use super::error::SourceResult;
use super::MeterSource;
use crate::meter::{ClearResponse, DataResponse};
use crate::simulator::Simulator;

/// Simulated round-trip for a data fetch (ms)
const FETCH_LATENCY_MS: RangeInclusive<u64> = 10..=50;

/// Simulated round-trip for a clear (ms)
const CLEAR_LATENCY_MS: RangeInclusive<u64> = 20..=100;

/// Meter source backed by the simulator
pub struct MockSource {
    simulator: Arc<Simulator>,
    simulate_latency: bool,
}

impl MockSource {
    pub fn new(simulator: Arc<Simulator>) -> Self {
        let simulate_latency = simulator.config().simulate_latency;
        Self {
            simulator,
            simulate_latency,
        }
    }

    /// Builder method: toggle simulated network latency
    pub fn latency(mut self, enabled: bool) -> Self {
        self.simulate_latency = enabled;
        self
    }

    pub fn simulator(&self) -> &Arc<Simulator> {
        &self.simulator
    }

    async fn network_delay(&self, range: RangeInclusive<u64>) {
        if !self.simulate_latency {
            return;
        }
        let ms = rand::rng().random_range(range);
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }
}

#[async_trait]
impl MeterSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_snapshot(&self) -> SourceResult<DataResponse> {
        tracing::debug!("Using mock data for development");
        self.network_delay(FETCH_LATENCY_MS).await;
        Ok(self.simulator.snapshot().await)
    }

    async fn clear_snapshot(&self) -> SourceResult<ClearResponse> {
        tracing::info!("Clearing mock data");
        self.network_delay(CLEAR_LATENCY_MS).await;
        Ok(self.simulator.clear_and_restart().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meter::CLEAR_MESSAGE;
    use crate::simulator::SimulatorConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tokio::time::Instant;

    fn source(latency: bool) -> MockSource {
        let simulator = Simulator::with_rng(SimulatorConfig::default(), StdRng::seed_from_u64(21));
        MockSource::new(Arc::new(simulator)).latency(latency)
    }

    #[tokio::test]
    async fn test_fetch_returns_simulator_snapshot() {
        let source = source(false);
        let expected = source.simulator().snapshot().await;
        let data = source.fetch_snapshot().await.unwrap();
        assert_eq!(data, expected);
        assert!((2..=4).contains(&data.user.len()));
    }

    #[tokio::test]
    async fn test_mutating_fetched_snapshot_does_not_leak() {
        let source = source(false);
        let mut data = source.fetch_snapshot().await.unwrap();
        data.user.clear();
        assert!(!source.fetch_snapshot().await.unwrap().user.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_latency_within_range() {
        let source = source(true);
        let started = Instant::now();
        source.fetch_snapshot().await.unwrap();
        let elapsed = started.elapsed();
        assert!(elapsed >= Duration::from_millis(10));
        assert!(elapsed <= Duration::from_millis(51));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_empties_then_restarts() {
        let source = source(true);
        let ack = source.clear_snapshot().await.unwrap();
        assert_eq!(ack.msg, CLEAR_MESSAGE);

        let data = source.simulator().snapshot().await;
        assert!(data.user.is_empty());

        tokio::time::sleep(Duration::from_millis(1001)).await;
        assert!(!source.simulator().snapshot().await.user.is_empty());
    }
}
