//! JSON view models returned by the handlers.
//!
//! Rows carry their images as raw bytes, which are never serialized. Each
//! view flattens the row and adds the image as base64 text (`null` when the
//! row has none).

use paddock_core::image;
use paddock_db::models::circuit::Circuit;
use paddock_db::models::driver::{Driver, TeamSummary};
use paddock_db::models::lap_time::LapTimeDetail;
use paddock_db::models::team::Team;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct TeamView {
    #[serde(flatten)]
    pub team: Team,
    pub logo: Option<String>,
}

impl From<Team> for TeamView {
    fn from(team: Team) -> Self {
        let logo = image::encode(team.logo.as_deref());
        Self { team, logo }
    }
}

#[derive(Debug, Serialize)]
pub struct DriverView {
    #[serde(flatten)]
    pub driver: Driver,
    pub image: Option<String>,
}

impl From<Driver> for DriverView {
    fn from(driver: Driver) -> Self {
        let image = image::encode(driver.image.as_deref());
        Self { driver, image }
    }
}

#[derive(Debug, Serialize)]
pub struct CircuitView {
    #[serde(flatten)]
    pub circuit: Circuit,
    pub image: Option<String>,
}

impl From<Circuit> for CircuitView {
    fn from(circuit: Circuit) -> Self {
        let image = image::encode(circuit.image.as_deref());
        Self { circuit, image }
    }
}

/// A team with its active drivers.
#[derive(Debug, Serialize)]
pub struct TeamDetail {
    #[serde(flatten)]
    pub team: TeamView,
    pub drivers: Vec<DriverView>,
}

/// A driver with its team and the circuits it is associated with.
#[derive(Debug, Serialize)]
pub struct DriverDetail {
    #[serde(flatten)]
    pub driver: DriverView,
    pub team: Option<TeamSummary>,
    pub circuits: Vec<CircuitView>,
    pub lap_times: Vec<LapTimeDetail>,
}

/// A circuit with its associated drivers and fastest laps.
#[derive(Debug, Serialize)]
pub struct CircuitDetail {
    #[serde(flatten)]
    pub circuit: CircuitView,
    pub drivers: Vec<DriverView>,
    pub lap_times: Vec<LapTimeDetail>,
}

/// Convert a list of rows into their views.
pub fn views<R, V: From<R>>(rows: Vec<R>) -> Vec<V> {
    rows.into_iter().map(V::from).collect()
}
