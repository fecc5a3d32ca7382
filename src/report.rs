//! Terminal meter rendering
//!
//! Text renderings of a snapshot for the two dashboard views: a summary
//! ranking and a detailed per-player breakdown.

use clap::ValueEnum;
use std::fmt::Write;

use crate::meter::{CombatRecord, DataResponse};

/// Which dashboard view to render
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum View {
    /// Ranking with damage share
    #[default]
    Summary,
    /// Full per-player breakdown
    Meter,
}

/// Ranking order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortKey {
    #[default]
    Damage,
    Dps,
    Healing,
    Taken,
}

impl SortKey {
    fn value(&self, record: &CombatRecord) -> f64 {
        match self {
            SortKey::Damage => record.total_damage.total as f64,
            SortKey::Dps => record.realtime_dps,
            SortKey::Healing => record.total_healing.total as f64,
            SortKey::Taken => record.taken_damage as f64,
        }
    }
}

/// Players ordered by `sort`, highest first; ties break on identifier
pub fn ranked(snapshot: &DataResponse, sort: SortKey) -> Vec<(&str, &CombatRecord)> {
    let mut rows: Vec<(&str, &CombatRecord)> = snapshot
        .user
        .iter()
        .map(|(id, record)| (id.as_str(), record))
        .collect();

    rows.sort_by(|(id_a, a), (id_b, b)| {
        sort.value(b)
            .total_cmp(&sort.value(a))
            .then_with(|| id_a.cmp(id_b))
    });
    rows
}

/// Team-wide totals across all players
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TeamTotals {
    pub damage: u64,
    pub healing: u64,
    pub taken: u64,
    pub realtime_dps: f64,
    pub realtime_hps: f64,
}

pub fn team_totals(snapshot: &DataResponse) -> TeamTotals {
    snapshot
        .user
        .values()
        .fold(TeamTotals::default(), |mut acc, record| {
            acc.damage += record.total_damage.total;
            acc.healing += record.total_healing.total;
            acc.taken += record.taken_damage;
            acc.realtime_dps += record.realtime_dps;
            acc.realtime_hps += record.realtime_hps;
            acc
        })
}

/// Render a snapshot in the given view
pub fn render(snapshot: &DataResponse, view: View, sort: SortKey) -> String {
    if snapshot.user.is_empty() {
        return "No combat data yet.\n".to_string();
    }

    match view {
        View::Summary => render_summary(snapshot, sort),
        View::Meter => render_meter(snapshot, sort),
    }
}

fn render_summary(snapshot: &DataResponse, sort: SortKey) -> String {
    let team = team_totals(snapshot);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "Players: {}  Damage: {}  DPS: {}  Healing: {}",
        snapshot.user.len(),
        format_number(team.damage as f64),
        format_number(team.realtime_dps),
        format_number(team.healing as f64),
    );
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{:<4} {:<20} {:<6} {:>10} {:>7} {:>10} {:>10}",
        "#", "UID", "Class", "Damage", "Share", "DPS", "Healing"
    );
    let _ = writeln!(out, "{}", "-".repeat(73));

    for (rank, (id, record)) in ranked(snapshot, sort).into_iter().enumerate() {
        let share = if team.damage > 0 {
            record.total_damage.total as f64 / team.damage as f64 * 100.0
        } else {
            0.0
        };

        let _ = writeln!(
            out,
            "{:<4} {:<20} {:<6} {:>10} {:>6.1}% {:>10} {:>10}",
            rank + 1,
            id,
            record.profession,
            format_number(record.total_damage.total as f64),
            share,
            format_number(record.realtime_dps),
            format_number(record.total_healing.total as f64),
        );
    }

    out
}

fn render_meter(snapshot: &DataResponse, sort: SortKey) -> String {
    let mut out = String::new();

    for (rank, (id, r)) in ranked(snapshot, sort).into_iter().enumerate() {
        let d = &r.total_damage;
        let h = &r.total_healing;
        let c = &r.total_count;

        let _ = writeln!(out, "#{} {} [{}]", rank + 1, id, r.profession);
        let _ = writeln!(
            out,
            "  DPS      now {:>9}  max {:>9}  avg {:>9}",
            format_number(r.realtime_dps),
            format_number(r.realtime_dps_max),
            format_number(r.total_dps),
        );
        let _ = writeln!(
            out,
            "  Damage   {:>9}  normal {}  crit {}  lucky {}  crit+lucky {}  absorbed {}  crit {:.1}%",
            format_number(d.total as f64),
            format_number(d.normal as f64),
            format_number(d.critical as f64),
            format_number(d.lucky as f64),
            format_number(d.crit_lucky as f64),
            format_number(d.hp_lessen as f64),
            d.crit_ratio() * 100.0,
        );
        let _ = writeln!(
            out,
            "  Hits     {:>9}  normal {}  crit {}  lucky {}",
            c.total, c.normal, c.critical, c.lucky
        );
        let _ = writeln!(
            out,
            "  HPS      now {:>9}  max {:>9}  avg {:>9}",
            format_number(r.realtime_hps),
            format_number(r.realtime_hps_max),
            format_number(r.total_hps),
        );
        let _ = writeln!(
            out,
            "  Healing  {:>9}  normal {}  crit {}  lucky {}  crit+lucky {}",
            format_number(h.total as f64),
            format_number(h.normal as f64),
            format_number(h.critical as f64),
            format_number(h.lucky as f64),
            format_number(h.crit_lucky as f64),
        );
        let _ = writeln!(out, "  Taken    {:>9}", format_number(r.taken_damage as f64));
        let _ = writeln!(out);
    }

    out
}

/// Abbreviate a number for display: 950, 12.3k, 4.56m
pub fn format_number(value: f64) -> String {
    let abs = value.abs();
    if abs >= 1_000_000.0 {
        format!("{:.2}m", value / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}k", value / 1_000.0)
    } else {
        format!("{:.0}", value)
    }
}
