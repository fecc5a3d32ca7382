//! Combat record generation and per-tick evolution
//!
//! Ranges here are tuned to resemble a mid-size fight. Integer ranges are
//! inclusive, float ranges are half-open.

use rand::Rng;

use super::roster::random_profession;
use crate::meter::{Breakdown, CombatRecord, HitCounts};

/// Amounts added to one record during a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickDelta {
    /// normal, critical, lucky
    pub damage: [u64; 3],
    pub counts: [u64; 3],
    pub healing: [u64; 3],
    pub taken_damage: u64,
    pub dps_factor: f64,
    pub hps_factor: f64,
}

impl TickDelta {
    pub fn count_increase(&self) -> u64 {
        self.counts.iter().sum()
    }

    pub fn damage_increase(&self) -> u64 {
        self.damage.iter().sum()
    }

    pub fn healing_increase(&self) -> u64 {
        self.healing.iter().sum()
    }
}

/// Generate a fresh record as if the player had been fighting for a while
pub fn generate_record<R: Rng>(rng: &mut R) -> CombatRecord {
    let total_damage = Breakdown::new(
        rng.random_range(50_000..=200_000),
        rng.random_range(80_000..=400_000),
        rng.random_range(30_000..=150_000),
        rng.random_range(100_000..=500_000),
        rng.random_range(0..=50_000),
    );

    let total_count = HitCounts::new(
        rng.random_range(50..=200),
        rng.random_range(20..=80),
        rng.random_range(10..=50),
    );

    let realtime_dps: f64 = rng.random_range(1000.0..15000.0);
    let realtime_dps_max = realtime_dps * rng.random_range(1.2..2.5f64);

    // Cumulative rates at generation come from a synthetic fight length,
    // later ticks switch to the fixed window.
    let fight_duration = rng.random_range(30..=300u32) as f64;
    let total_dps = total_damage.total as f64 / fight_duration;

    let total_healing = Breakdown::new(
        rng.random_range(20_000..=100_000),
        rng.random_range(30_000..=150_000),
        rng.random_range(10_000..=50_000),
        rng.random_range(40_000..=200_000),
        0,
    );

    let realtime_hps: f64 = rng.random_range(500.0..8000.0);
    let realtime_hps_max = realtime_hps * rng.random_range(1.2..2.5f64);
    let total_hps = total_healing.total as f64 / fight_duration;

    CombatRecord {
        realtime_dps,
        realtime_dps_max,
        total_dps,
        total_damage,
        total_count,
        realtime_hps,
        realtime_hps_max,
        total_hps,
        total_healing,
        taken_damage: rng.random_range(0..=10_000),
        profession: random_profession(rng).to_string(),
    }
}

/// Draw `U[0, U[lo, hi]]`: a jittered increment whose ceiling also varies
fn jitter<R: Rng>(rng: &mut R, lo: u64, hi: u64) -> u64 {
    let ceiling = rng.random_range(lo..=hi);
    rng.random_range(0..=ceiling)
}

/// Advance one record by a single tick
///
/// Totals are recomputed from the buckets and running maxima are raised,
/// so the record stays consistent after every call.
pub fn apply_tick<R: Rng>(record: &mut CombatRecord, rng: &mut R, window_secs: f64) -> TickDelta {
    let mut delta = TickDelta::default();

    delta.damage = [
        jitter(rng, 1000, 5000),
        jitter(rng, 500, 3000),
        jitter(rng, 200, 1500),
    ];
    record.total_damage.normal += delta.damage[0];
    record.total_damage.critical += delta.damage[1];
    record.total_damage.lucky += delta.damage[2];
    record.total_damage.recompute_total();

    delta.counts = [
        rng.random_range(0..=3),
        rng.random_range(0..=2),
        rng.random_range(0..=1),
    ];
    record.total_count.normal += delta.counts[0];
    record.total_count.critical += delta.counts[1];
    record.total_count.lucky += delta.counts[2];
    record.total_count.recompute_total();

    delta.dps_factor = rng.random_range(0.8..1.2f64);
    record.realtime_dps = (record.realtime_dps * delta.dps_factor).max(0.0);

    delta.healing = [
        jitter(rng, 500, 2000),
        jitter(rng, 300, 1500),
        jitter(rng, 100, 800),
    ];
    record.total_healing.normal += delta.healing[0];
    record.total_healing.critical += delta.healing[1];
    record.total_healing.lucky += delta.healing[2];
    record.total_healing.recompute_total();

    delta.hps_factor = rng.random_range(0.7..1.3f64);
    record.realtime_hps = (record.realtime_hps * delta.hps_factor).max(0.0);

    record.raise_maxima();
    record.recompute_cumulative_rates(window_secs);

    delta.taken_damage = rng.random_range(0..=500);
    record.taken_damage += delta.taken_damage;

    delta
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulator::roster::PROFESSIONS;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_records_within_ranges() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..500 {
            let record = generate_record(&mut rng);
            assert!(record.is_consistent());

            let d = &record.total_damage;
            assert!((50_000..=200_000).contains(&d.normal));
            assert!((80_000..=400_000).contains(&d.critical));
            assert!((30_000..=150_000).contains(&d.lucky));
            assert!((100_000..=500_000).contains(&d.crit_lucky));
            assert!(d.hp_lessen <= 50_000);

            let c = &record.total_count;
            assert!((50..=200).contains(&c.normal));
            assert!((20..=80).contains(&c.critical));
            assert!((10..=50).contains(&c.lucky));

            let h = &record.total_healing;
            assert!((20_000..=100_000).contains(&h.normal));
            assert!((30_000..=150_000).contains(&h.critical));
            assert!((10_000..=50_000).contains(&h.lucky));
            assert!((40_000..=200_000).contains(&h.crit_lucky));
            assert_eq!(h.hp_lessen, 0);

            assert!(record.realtime_dps >= 1000.0 && record.realtime_dps < 15000.0);
            assert!(record.realtime_dps_max >= record.realtime_dps * 1.2);
            assert!(record.realtime_hps >= 500.0 && record.realtime_hps < 8000.0);
            assert!(record.taken_damage <= 10_000);

            // fight duration is between 30 and 300 seconds
            let total = d.total as f64;
            assert!(record.total_dps <= total / 30.0 + 1e-9);
            assert!(record.total_dps >= total / 300.0 - 1e-9);

            assert!(PROFESSIONS.contains(&record.profession.as_str()));
        }
    }

    #[test]
    fn test_tick_keeps_invariants() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut record = generate_record(&mut rng);

        let mut last_dps_max = record.realtime_dps_max;
        let mut last_hps_max = record.realtime_hps_max;

        for _ in 0..1000 {
            apply_tick(&mut record, &mut rng, 60.0);
            assert!(record.is_consistent());
            assert!(record.realtime_dps_max >= last_dps_max);
            assert!(record.realtime_hps_max >= last_hps_max);
            assert!(record.realtime_dps >= 0.0);
            assert!(record.realtime_hps >= 0.0);
            last_dps_max = record.realtime_dps_max;
            last_hps_max = record.realtime_hps_max;
        }
    }

    #[test]
    fn test_tick_increments_within_bounds() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut record = generate_record(&mut rng);

        for _ in 0..500 {
            let before = record.clone();
            let delta = apply_tick(&mut record, &mut rng, 60.0);

            assert!(delta.damage[0] <= 5000);
            assert!(delta.damage[1] <= 3000);
            assert!(delta.damage[2] <= 1500);
            assert!(delta.counts[0] <= 3 && delta.counts[1] <= 2 && delta.counts[2] <= 1);
            assert!(delta.healing[0] <= 2000);
            assert!(delta.healing[1] <= 1500);
            assert!(delta.healing[2] <= 800);
            assert!(delta.taken_damage <= 500);
            assert!((0.8..1.2).contains(&delta.dps_factor));
            assert!((0.7..1.3).contains(&delta.hps_factor));

            assert_eq!(
                record.total_count.total,
                before.total_count.total + delta.count_increase()
            );
            assert_eq!(
                record.total_damage.total,
                before.total_damage.total + delta.damage_increase()
            );
            assert_eq!(
                record.total_healing.total,
                before.total_healing.total + delta.healing_increase()
            );
            assert_eq!(record.total_damage.crit_lucky, before.total_damage.crit_lucky);
            assert_eq!(record.total_damage.hp_lessen, before.total_damage.hp_lessen);
            assert_eq!(
                record.taken_damage,
                before.taken_damage + delta.taken_damage
            );
        }
    }

    #[test]
    fn test_tick_recomputes_cumulative_rate_over_window() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut record = generate_record(&mut rng);
        apply_tick(&mut record, &mut rng, 60.0);

        assert!((record.total_dps - record.total_damage.total as f64 / 60.0).abs() < 1e-9);
        assert!((record.total_hps - record.total_healing.total as f64 / 60.0).abs() < 1e-9);
    }

    #[test]
    fn test_tick_from_zero_rate_stays_zero() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut record = CombatRecord::default();
        apply_tick(&mut record, &mut rng, 60.0);
        assert_eq!(record.realtime_dps, 0.0);
        assert_eq!(record.realtime_hps, 0.0);
        assert!(record.is_consistent());
    }
}
