//! Integration tests for entity CRUD and the queries backing business rules.
//!
//! Exercises the repository layer against a real database:
//! - Driver roster and capacity counts per team
//! - Name and car-number lookups that exclude the row being edited
//! - Driver/circuit association
//! - Lap-time detail joins and same-day duplicate detection
//! - Search escaping and the dashboard snapshot

use chrono::NaiveDate;
use paddock_db::models::circuit::CreateCircuit;
use paddock_db::models::driver::{CreateDriver, UpdateDriver};
use paddock_db::models::lap_time::{CreateLapTime, UpdateLapTime};
use paddock_db::models::team::CreateTeam;
use paddock_db::repositories::{CircuitRepo, DashboardRepo, DriverRepo, LapTimeRepo, TeamRepo};
use sqlx::{PgConnection, PgPool};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn seed_team(conn: &mut PgConnection, name: &str) -> i64 {
    let input = CreateTeam {
        name: name.to_string(),
        country: "United Kingdom".to_string(),
        logo_url: None,
        logo: None,
    };
    TeamRepo::create(conn, &input).await.unwrap().id
}

async fn seed_driver(conn: &mut PgConnection, name: &str, number: i32, team_id: Option<i64>) -> i64 {
    let input = CreateDriver {
        name: name.to_string(),
        nationality: "British".to_string(),
        car_number: number,
        team_id,
        birth_date: None,
        biography: None,
        twitter: None,
        image_url: None,
        image: None,
    };
    DriverRepo::create(conn, &input).await.unwrap().id
}

async fn seed_circuit(conn: &mut PgConnection, name: &str, length_km: Option<f64>) -> i64 {
    let input = CreateCircuit {
        name: name.to_string(),
        country: "Belgium".to_string(),
        length_km,
        description: None,
        image_url: None,
        image: None,
    };
    CircuitRepo::create(conn, &input).await.unwrap().id
}

fn lap(driver_id: i64, circuit_id: i64, secs: f64, date: Option<NaiveDate>) -> CreateLapTime {
    CreateLapTime {
        driver_id,
        circuit_id,
        lap_time_secs: secs,
        position: Some(1),
        lap_date: date,
    }
}

fn day(d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(2024, 7, d)
}

// ---------------------------------------------------------------------------
// Drivers
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_count_active_in_team_ignores_inactive_and_excluded(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let team = seed_team(&mut conn, "McLaren").await;
    let norris = seed_driver(&mut conn, "Lando Norris", 4, Some(team)).await;
    let piastri = seed_driver(&mut conn, "Oscar Piastri", 81, Some(team)).await;

    assert_eq!(DriverRepo::count_active_in_team(&mut conn, team, None).await.unwrap(), 2);
    assert_eq!(
        DriverRepo::count_active_in_team(&mut conn, team, Some(norris)).await.unwrap(),
        1
    );

    DriverRepo::soft_delete(&mut conn, piastri).await.unwrap();
    assert_eq!(DriverRepo::count_active_in_team(&mut conn, team, None).await.unwrap(), 1);

    let roster = DriverRepo::list_active_by_team(&mut conn, team).await.unwrap();
    assert_eq!(roster.len(), 1);
    assert_eq!(roster[0].id, norris);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_name_holders_report_their_teams(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let ferrari = seed_team(&mut conn, "Ferrari").await;
    let id = seed_driver(&mut conn, "Carlos Sainz", 55, Some(ferrari)).await;

    let holders = DriverRepo::name_holders(&mut conn, "Carlos Sainz", None).await.unwrap();
    assert_eq!(holders, vec![Some(ferrari)]);

    let holders = DriverRepo::name_holders(&mut conn, "Carlos Sainz", Some(id)).await.unwrap();
    assert!(holders.is_empty(), "the edited driver does not count");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_car_number_taken_only_by_active_drivers(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let id = seed_driver(&mut conn, "Max Verstappen", 1, None).await;

    assert!(DriverRepo::car_number_taken(&mut conn, 1, None).await.unwrap());
    assert!(!DriverRepo::car_number_taken(&mut conn, 1, Some(id)).await.unwrap());

    DriverRepo::soft_delete(&mut conn, id).await.unwrap();
    assert!(!DriverRepo::car_number_taken(&mut conn, 1, None).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_driver_moves_team(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let williams = seed_team(&mut conn, "Williams").await;
    let ferrari = seed_team(&mut conn, "Ferrari").await;
    let id = seed_driver(&mut conn, "Carlos Sainz", 55, Some(ferrari)).await;

    let input = UpdateDriver {
        team_id: Some(williams),
        ..Default::default()
    };
    let updated = DriverRepo::update(&mut conn, id, &input).await.unwrap().unwrap();
    assert_eq!(updated.team_id, Some(williams));
    assert_eq!(updated.car_number, 55, "unset fields are kept");

    let team = DriverRepo::team_of(&mut conn, id).await.unwrap().unwrap();
    assert_eq!(team.name, "Williams");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_team_of_skips_inactive_team(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let haas = seed_team(&mut conn, "Haas").await;
    let id = seed_driver(&mut conn, "Esteban Ocon", 31, Some(haas)).await;

    TeamRepo::soft_delete(&mut conn, haas).await.unwrap();
    assert!(DriverRepo::team_of(&mut conn, id).await.unwrap().is_none());

    TeamRepo::restore(&mut conn, haas).await.unwrap();
    let team = DriverRepo::team_of(&mut conn, id).await.unwrap().unwrap();
    assert_eq!(team.id, haas);
}

// ---------------------------------------------------------------------------
// Associations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_assign_circuit_is_idempotent(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let driver = seed_driver(&mut conn, "Charles Leclerc", 16, None).await;
    let monaco = seed_circuit(&mut conn, "Monaco", Some(3.337)).await;

    DriverRepo::assign_circuit(&mut conn, driver, monaco).await.unwrap();
    DriverRepo::assign_circuit(&mut conn, driver, monaco).await.unwrap();

    let circuits = DriverRepo::list_circuits(&mut conn, driver).await.unwrap();
    assert_eq!(circuits.len(), 1);
    let drivers = DriverRepo::list_active_by_circuit(&mut conn, monaco).await.unwrap();
    assert_eq!(drivers.len(), 1);

    assert!(DriverRepo::unassign_circuit(&mut conn, driver, monaco).await.unwrap());
    assert!(!DriverRepo::unassign_circuit(&mut conn, driver, monaco).await.unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_inactive_circuits_hidden_from_driver(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let driver = seed_driver(&mut conn, "Charles Leclerc", 16, None).await;
    let monza = seed_circuit(&mut conn, "Monza", Some(5.793)).await;
    DriverRepo::assign_circuit(&mut conn, driver, monza).await.unwrap();
    CircuitRepo::soft_delete(&mut conn, monza).await.unwrap();

    assert!(DriverRepo::list_circuits(&mut conn, driver).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Lap times
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_lap_detail_carries_names(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let driver = seed_driver(&mut conn, "Lewis Hamilton", 44, None).await;
    let spa = seed_circuit(&mut conn, "Spa", Some(7.004)).await;
    let created = LapTimeRepo::create(&mut conn, &lap(driver, spa, 106.3, day(28)))
        .await
        .unwrap();

    let detail = LapTimeRepo::find_detail(&mut conn, created.id).await.unwrap().unwrap();
    assert_eq!(detail.driver_name, "Lewis Hamilton");
    assert_eq!(detail.circuit_name, "Spa");
    assert_eq!(detail.lap.lap_time_secs, 106.3);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_lap_list_is_fastest_first(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let driver = seed_driver(&mut conn, "Lewis Hamilton", 44, None).await;
    let spa = seed_circuit(&mut conn, "Spa", Some(7.004)).await;
    LapTimeRepo::create(&mut conn, &lap(driver, spa, 108.0, day(1))).await.unwrap();
    LapTimeRepo::create(&mut conn, &lap(driver, spa, 106.0, day(2))).await.unwrap();

    let laps = LapTimeRepo::list(&mut conn, true).await.unwrap();
    let times: Vec<f64> = laps.iter().map(|l| l.lap.lap_time_secs).collect();
    assert_eq!(times, vec![106.0, 108.0]);

    let by_circuit = LapTimeRepo::list_active_by_circuit(&mut conn, spa).await.unwrap();
    assert_eq!(by_circuit.len(), 2);
    let by_driver = LapTimeRepo::list_active_by_driver(&mut conn, driver).await.unwrap();
    assert_eq!(by_driver[0].lap.lap_date, day(2), "most recent first");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_exists_per_day_only(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let driver = seed_driver(&mut conn, "George Russell", 63, None).await;
    let spa = seed_circuit(&mut conn, "Spa", Some(7.004)).await;
    let first = LapTimeRepo::create(&mut conn, &lap(driver, spa, 106.0, day(28)))
        .await
        .unwrap();

    assert!(LapTimeRepo::duplicate_exists(&mut conn, driver, spa, day(28), None).await.unwrap());
    assert!(!LapTimeRepo::duplicate_exists(&mut conn, driver, spa, day(29), None).await.unwrap());
    assert!(!LapTimeRepo::duplicate_exists(&mut conn, driver, spa, None, None).await.unwrap());
    assert!(
        !LapTimeRepo::duplicate_exists(&mut conn, driver, spa, day(28), Some(first.id))
            .await
            .unwrap()
    );

    LapTimeRepo::create(&mut conn, &lap(driver, spa, 107.0, None)).await.unwrap();
    LapTimeRepo::create(&mut conn, &lap(driver, spa, 107.5, None)).await.unwrap();
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_lap_keeps_unset_fields(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let driver = seed_driver(&mut conn, "George Russell", 63, None).await;
    let spa = seed_circuit(&mut conn, "Spa", Some(7.004)).await;
    let created = LapTimeRepo::create(&mut conn, &lap(driver, spa, 106.0, day(28)))
        .await
        .unwrap();

    let input = UpdateLapTime {
        lap_time_secs: Some(105.5),
        ..Default::default()
    };
    let updated = LapTimeRepo::update(&mut conn, created.id, &input)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.lap_time_secs, 105.5);
    assert_eq!(updated.lap_date, day(28));
    assert_eq!(updated.position, Some(1));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_reference_activity_checks(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let driver = seed_driver(&mut conn, "George Russell", 63, None).await;
    let spa = seed_circuit(&mut conn, "Spa", Some(7.004)).await;

    assert!(LapTimeRepo::driver_active(&mut conn, driver).await.unwrap());
    assert!(LapTimeRepo::circuit_active(&mut conn, spa).await.unwrap());
    assert!(!LapTimeRepo::driver_active(&mut conn, 9_999).await.unwrap());

    CircuitRepo::soft_delete(&mut conn, spa).await.unwrap();
    assert!(!LapTimeRepo::circuit_active(&mut conn, spa).await.unwrap());
}

// ---------------------------------------------------------------------------
// Search and dashboard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_search_is_case_insensitive_substring(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    seed_team(&mut conn, "Red Bull Racing").await;
    seed_team(&mut conn, "Racing Bulls").await;
    seed_team(&mut conn, "Alpine").await;

    let found = TeamRepo::search(&mut conn, "bull").await.unwrap();
    assert_eq!(found.len(), 2);

    let found = TeamRepo::search(&mut conn, "%").await.unwrap();
    assert!(found.is_empty(), "wildcards are matched literally");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_find_team_by_exact_name(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    seed_team(&mut conn, "Aston Martin").await;

    assert!(TeamRepo::find_by_name(&mut conn, "Aston Martin").await.unwrap().is_some());
    assert!(TeamRepo::find_by_name(&mut conn, "aston martin").await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_dashboard_snapshot_includes_inactive_rows(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let team = seed_team(&mut conn, "Sauber").await;
    TeamRepo::soft_delete(&mut conn, team).await.unwrap();
    let driver = seed_driver(&mut conn, "Nico Hulkenberg", 27, Some(team)).await;
    let spa = seed_circuit(&mut conn, "Spa", None).await;
    LapTimeRepo::create(&mut conn, &lap(driver, spa, 110.0, None)).await.unwrap();

    let snapshot = DashboardRepo::snapshot(&mut conn).await.unwrap();
    assert_eq!(snapshot.teams.len(), 1);
    assert!(!snapshot.teams[0].active);
    assert_eq!(snapshot.drivers[0].team_id, Some(team));
    assert_eq!(snapshot.circuits[0].length_km, None);
    assert_eq!(snapshot.laps[0].lap_time_secs, 110.0);
}
