//! Entity lifecycle invariants.
//!
//! Every write to a team, driver, circuit or lap time (create, update and
//! restore) first gathers a small set of facts from the database and then
//! runs the matching `check_*` function here. The checks always run in the
//! same order: references must exist and be active, then uniqueness rules,
//! then capacity rules. The first violation wins.

use chrono::NaiveDate;

use crate::types::DbId;

/// A team may field at most this many active drivers.
pub const MAX_ACTIVE_DRIVERS_PER_TEAM: i64 = 2;

/// A violated uniqueness, capacity or reference invariant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Conflict {
    #[error("An active team named '{0}' already exists")]
    DuplicateTeamName(String),

    #[error("An active circuit named '{0}' already exists")]
    DuplicateCircuitName(String),

    #[error("Car number {0} is already used by an active driver")]
    DuplicateCarNumber(i32),

    #[error("Team {team_id} already has the maximum of 2 active drivers")]
    TeamFull { team_id: DbId },

    #[error("Driver '{name}' already belongs to another active team")]
    DriverOnOtherTeam { name: String },

    #[error("A lap time for driver {driver_id} at circuit {circuit_id} on {lap_date} already exists")]
    DuplicateLapTime {
        driver_id: DbId,
        circuit_id: DbId,
        lap_date: NaiveDate,
    },

    #[error("{entity} {id} does not exist or is inactive")]
    InactiveReference { entity: &'static str, id: DbId },
}

impl Conflict {
    /// Stable machine-readable name of the violated invariant.
    pub fn invariant(&self) -> &'static str {
        match self {
            Conflict::DuplicateTeamName(_) => "duplicate_team_name",
            Conflict::DuplicateCircuitName(_) => "duplicate_circuit_name",
            Conflict::DuplicateCarNumber(_) => "duplicate_car_number",
            Conflict::TeamFull { .. } => "team_full",
            Conflict::DriverOnOtherTeam { .. } => "driver_on_other_team",
            Conflict::DuplicateLapTime { .. } => "duplicate_lap_time",
            Conflict::InactiveReference { .. } => "inactive_reference",
        }
    }
}

// ---------------------------------------------------------------------------
// Teams and circuits
// ---------------------------------------------------------------------------

/// `name_taken` is whether another active team already uses `name`.
pub fn check_team(name: &str, name_taken: bool) -> Result<(), Conflict> {
    if name_taken {
        return Err(Conflict::DuplicateTeamName(name.to_string()));
    }
    Ok(())
}

/// `name_taken` is whether another active circuit already uses `name`.
pub fn check_circuit(name: &str, name_taken: bool) -> Result<(), Conflict> {
    if name_taken {
        return Err(Conflict::DuplicateCircuitName(name.to_string()));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

/// The team a driver is being attached to, as seen in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamSlot {
    /// The driver has no team.
    Unattached,
    /// The requested team does not exist or is inactive.
    Missing(DbId),
    /// The requested team is active and currently fields `active_drivers`
    /// active drivers, not counting the driver being written.
    Active { id: DbId, active_drivers: i64 },
}

impl TeamSlot {
    pub fn team_id(&self) -> Option<DbId> {
        match *self {
            TeamSlot::Unattached => None,
            TeamSlot::Missing(id) | TeamSlot::Active { id, .. } => Some(id),
        }
    }
}

/// Facts gathered before writing a driver row.
#[derive(Debug, Clone)]
pub struct DriverFacts {
    pub team: TeamSlot,
    /// Team ids of the other active drivers sharing the same name.
    pub name_holders: Vec<Option<DbId>>,
    /// Whether another active driver already uses the car number.
    pub car_number_taken: bool,
}

pub fn check_driver(name: &str, car_number: i32, facts: &DriverFacts) -> Result<(), Conflict> {
    if let TeamSlot::Missing(id) = facts.team {
        return Err(Conflict::InactiveReference { entity: "Team", id });
    }

    let team_id = facts.team.team_id();
    if facts.name_holders.iter().any(|holder| *holder != team_id) {
        return Err(Conflict::DriverOnOtherTeam {
            name: name.to_string(),
        });
    }
    if facts.car_number_taken {
        return Err(Conflict::DuplicateCarNumber(car_number));
    }

    if let TeamSlot::Active { id, active_drivers } = facts.team {
        if active_drivers >= MAX_ACTIVE_DRIVERS_PER_TEAM {
            return Err(Conflict::TeamFull { team_id: id });
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Lap times
// ---------------------------------------------------------------------------

/// Facts gathered before writing a lap time row.
#[derive(Debug, Clone, Copy)]
pub struct LapTimeFacts {
    pub driver_active: bool,
    pub circuit_active: bool,
    /// Whether another active lap time shares driver, circuit and date.
    /// Only meaningful when a date is supplied.
    pub duplicate_on_date: bool,
}

pub fn check_lap_time(
    driver_id: DbId,
    circuit_id: DbId,
    lap_date: Option<NaiveDate>,
    facts: &LapTimeFacts,
) -> Result<(), Conflict> {
    if !facts.driver_active {
        return Err(Conflict::InactiveReference {
            entity: "Driver",
            id: driver_id,
        });
    }
    if !facts.circuit_active {
        return Err(Conflict::InactiveReference {
            entity: "Circuit",
            id: circuit_id,
        });
    }
    match lap_date {
        Some(lap_date) if facts.duplicate_on_date => Err(Conflict::DuplicateLapTime {
            driver_id,
            circuit_id,
            lap_date,
        }),
        _ => Ok(()),
    }
}
