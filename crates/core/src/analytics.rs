//! Dashboard aggregation.
//!
//! [`summarize`] turns a snapshot of every row (active and inactive) into
//! the chart series shown on the dashboard. It is recomputed per request;
//! nothing here is cached.

use serde::Serialize;

use crate::types::DbId;

// ---------------------------------------------------------------------------
// Input snapshot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TeamSample {
    pub id: DbId,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct DriverSample {
    pub team_id: Option<DbId>,
    pub nationality: String,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct CircuitSample {
    pub id: DbId,
    pub name: String,
    pub length_km: Option<f64>,
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct LapSample {
    pub circuit_id: DbId,
    pub lap_time_secs: f64,
    pub active: bool,
}

/// Every row of the four entity tables, each list in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub teams: Vec<TeamSample>,
    pub drivers: Vec<DriverSample>,
    pub circuits: Vec<CircuitSample>,
    pub laps: Vec<LapSample>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Parallel label / value arrays, the shape chart widgets consume.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries<T> {
    pub labels: Vec<String>,
    pub data: Vec<T>,
}

impl<T> Default for ChartSeries<T> {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            data: Vec::new(),
        }
    }
}

impl<T> ChartSeries<T> {
    fn push(&mut self, label: impl Into<String>, value: T) {
        self.labels.push(label.into());
        self.data.push(value);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TeamStatusCounts {
    pub active: i64,
    pub inactive: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LengthDistribution {
    /// Lengths of active circuits that have one, in insertion order.
    pub lengths: Vec<f64>,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub drivers_per_team: ChartSeries<i64>,
    pub average_lap_by_circuit: ChartSeries<f64>,
    pub nationalities: ChartSeries<i64>,
    pub team_status: TeamStatusCounts,
    pub circuit_lengths: LengthDistribution,
    pub current_year: i32,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

pub fn summarize(snapshot: &Snapshot, current_year: i32) -> DashboardSummary {
    DashboardSummary {
        drivers_per_team: drivers_per_team(snapshot),
        average_lap_by_circuit: average_lap_by_circuit(snapshot),
        nationalities: nationality_histogram(snapshot),
        team_status: team_status(snapshot),
        circuit_lengths: circuit_lengths(snapshot),
        current_year,
    }
}

/// Active drivers per active team.
pub fn drivers_per_team(snapshot: &Snapshot) -> ChartSeries<i64> {
    let mut series = ChartSeries::default();
    for team in snapshot.teams.iter().filter(|t| t.active) {
        let count = snapshot
            .drivers
            .iter()
            .filter(|d| d.active && d.team_id == Some(team.id))
            .count();
        series.push(team.name.clone(), count as i64);
    }
    series
}

/// Mean active lap time per active circuit, rounded to two decimals.
///
/// A circuit without lap times reports 0.
pub fn average_lap_by_circuit(snapshot: &Snapshot) -> ChartSeries<f64> {
    let mut series = ChartSeries::default();
    for circuit in snapshot.circuits.iter().filter(|c| c.active) {
        let (sum, count) = snapshot
            .laps
            .iter()
            .filter(|l| l.active && l.circuit_id == circuit.id)
            .fold((0.0_f64, 0_u32), |(sum, n), l| (sum + l.lap_time_secs, n + 1));
        let average = if count == 0 {
            0.0
        } else {
            round2(sum / f64::from(count))
        };
        series.push(circuit.name.clone(), average);
    }
    series
}

/// Active drivers per nationality, in order of first appearance.
pub fn nationality_histogram(snapshot: &Snapshot) -> ChartSeries<i64> {
    let mut series: ChartSeries<i64> = ChartSeries::default();
    for driver in snapshot.drivers.iter().filter(|d| d.active) {
        match series.labels.iter().position(|n| *n == driver.nationality) {
            Some(idx) => series.data[idx] += 1,
            None => series.push(driver.nationality.clone(), 1),
        }
    }
    series
}

pub fn team_status(snapshot: &Snapshot) -> TeamStatusCounts {
    let active = snapshot.teams.iter().filter(|t| t.active).count() as i64;
    TeamStatusCounts {
        active,
        inactive: snapshot.teams.len() as i64 - active,
    }
}

pub fn circuit_lengths(snapshot: &Snapshot) -> LengthDistribution {
    let lengths: Vec<f64> = snapshot
        .circuits
        .iter()
        .filter(|c| c.active)
        .filter_map(|c| c.length_km)
        .collect();

    if lengths.is_empty() {
        return LengthDistribution {
            lengths,
            min: 0.0,
            max: 0.0,
            mean: 0.0,
        };
    }

    let min = lengths.iter().copied().fold(f64::INFINITY, f64::min);
    let max = lengths.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = round2(lengths.iter().sum::<f64>() / lengths.len() as f64);
    LengthDistribution {
        lengths,
        min,
        max,
        mean,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
