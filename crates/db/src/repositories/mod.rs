//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&mut PgConnection` as the first argument.

pub mod circuit_repo;
pub mod dashboard_repo;
pub mod driver_repo;
pub mod lap_time_repo;
pub mod team_repo;

pub use circuit_repo::CircuitRepo;
pub use dashboard_repo::DashboardRepo;
pub use driver_repo::DriverRepo;
pub use lap_time_repo::LapTimeRepo;
pub use team_repo::TeamRepo;
