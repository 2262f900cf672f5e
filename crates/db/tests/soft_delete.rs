//! Integration tests for soft-delete and restore behaviour.
//!
//! Exercises the repository layer against a real database to verify that:
//! - Soft-deleted rows are hidden from `find_by_id` and active listings
//! - Soft-deleted rows appear in the inactive listing
//! - Restoring makes a row visible again
//! - Deleting twice is harmless and an unknown id yields `None`
//! - Partial unique indexes only constrain active rows

use assert_matches::assert_matches;
use paddock_db::models::circuit::CreateCircuit;
use paddock_db::models::team::CreateTeam;
use paddock_db::repositories::{CircuitRepo, TeamRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_team(name: &str) -> CreateTeam {
    CreateTeam {
        name: name.to_string(),
        country: "Italy".to_string(),
        logo_url: None,
        logo: None,
    }
}

fn new_circuit(name: &str) -> CreateCircuit {
    CreateCircuit {
        name: name.to_string(),
        country: "Italy".to_string(),
        length_km: Some(5.793),
        description: None,
        image_url: None,
        image: None,
    }
}

// ---------------------------------------------------------------------------
// Visibility
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_hides_from_find_by_id(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let team = TeamRepo::create(&mut conn, &new_team("Ferrari")).await.unwrap();

    let deleted = TeamRepo::soft_delete(&mut conn, team.id).await.unwrap();
    assert!(!deleted.unwrap().active);

    let found = TeamRepo::find_by_id(&mut conn, team.id).await.unwrap();
    assert!(found.is_none(), "inactive team must not be found");

    let any = TeamRepo::find_by_id_any(&mut conn, team.id).await.unwrap();
    assert!(any.is_some(), "inactive team still exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_moves_between_listings(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let team = TeamRepo::create(&mut conn, &new_team("McLaren")).await.unwrap();

    let active = TeamRepo::list(&mut conn, true).await.unwrap();
    assert!(active.iter().any(|t| t.id == team.id));

    TeamRepo::soft_delete(&mut conn, team.id).await.unwrap();

    let active = TeamRepo::list(&mut conn, true).await.unwrap();
    let inactive = TeamRepo::list(&mut conn, false).await.unwrap();
    assert!(!active.iter().any(|t| t.id == team.id));
    assert!(inactive.iter().any(|t| t.id == team.id));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_restore_makes_visible_again(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let input = CreateCircuit {
        description: Some("Temple of Speed".to_string()),
        image_url: Some("https://example.com/monza.png".to_string()),
        image: Some(vec![0x89, b'P', b'N', b'G']),
        ..new_circuit("Monza")
    };
    let circuit = CircuitRepo::create(&mut conn, &input).await.unwrap();

    CircuitRepo::soft_delete(&mut conn, circuit.id).await.unwrap();
    let restored = CircuitRepo::restore(&mut conn, circuit.id).await.unwrap();
    assert!(restored.unwrap().active);

    let found = CircuitRepo::find_by_id(&mut conn, circuit.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.name, circuit.name);
    assert_eq!(found.country, circuit.country);
    assert_eq!(found.length_km, circuit.length_km);
    assert_eq!(found.description, circuit.description);
    assert_eq!(found.image_url, circuit.image_url);
    assert_eq!(found.image, circuit.image);
    assert_eq!(found.created_at, circuit.created_at);
    assert_eq!(found.image.as_deref(), Some(&[0x89, b'P', b'N', b'G'][..]));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_restore_keeps_team_fields(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let input = CreateTeam {
        logo_url: Some("https://example.com/ferrari.svg".to_string()),
        logo: Some(b"GIF89a".to_vec()),
        ..new_team("Ferrari")
    };
    let team = TeamRepo::create(&mut conn, &input).await.unwrap();

    TeamRepo::soft_delete(&mut conn, team.id).await.unwrap();
    let restored = TeamRepo::restore(&mut conn, team.id).await.unwrap().unwrap();

    assert!(restored.active);
    assert_eq!(restored.name, team.name);
    assert_eq!(restored.country, team.country);
    assert_eq!(restored.logo_url, team.logo_url);
    assert_eq!(restored.logo, team.logo);
    assert_eq!(restored.created_at, team.created_at);
}

// ---------------------------------------------------------------------------
// Idempotency
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_soft_delete_twice_is_harmless(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let team = TeamRepo::create(&mut conn, &new_team("Williams")).await.unwrap();

    TeamRepo::soft_delete(&mut conn, team.id).await.unwrap();
    let again = TeamRepo::soft_delete(&mut conn, team.id).await.unwrap();
    assert!(again.is_some(), "second delete still reports the row");
    assert!(!again.unwrap().active);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_id_yields_none(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    assert!(TeamRepo::soft_delete(&mut conn, 9_999).await.unwrap().is_none());
    assert!(TeamRepo::restore(&mut conn, 9_999).await.unwrap().is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_update_skips_inactive_rows(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let team = TeamRepo::create(&mut conn, &new_team("Haas")).await.unwrap();
    TeamRepo::soft_delete(&mut conn, team.id).await.unwrap();

    let input = paddock_db::models::team::UpdateTeam {
        country: Some("USA".to_string()),
        ..Default::default()
    };
    let updated = TeamRepo::update(&mut conn, team.id, &input).await.unwrap();
    assert!(updated.is_none());
}

// ---------------------------------------------------------------------------
// Partial unique indexes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "./migrations")]
async fn test_inactive_name_can_be_reused(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let old = TeamRepo::create(&mut conn, &new_team("Ferrari")).await.unwrap();
    TeamRepo::soft_delete(&mut conn, old.id).await.unwrap();

    let reused = TeamRepo::create(&mut conn, &new_team("Ferrari")).await;
    assert!(reused.is_ok(), "name of an inactive team is free again");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_restore_into_taken_name_violates_index(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    let old = TeamRepo::create(&mut conn, &new_team("Ferrari")).await.unwrap();
    TeamRepo::soft_delete(&mut conn, old.id).await.unwrap();
    TeamRepo::create(&mut conn, &new_team("Ferrari")).await.unwrap();

    let result = TeamRepo::restore(&mut conn, old.id).await;
    assert_matches!(
        result,
        Err(sqlx::Error::Database(ref e))
            if e.constraint() == Some("uq_teams_active_name")
    );
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_active_circuit_name_rejected(pool: PgPool) {
    let mut conn = pool.acquire().await.unwrap();
    CircuitRepo::create(&mut conn, &new_circuit("Imola")).await.unwrap();

    let result = CircuitRepo::create(&mut conn, &new_circuit("Imola")).await;
    assert_matches!(
        result,
        Err(sqlx::Error::Database(ref e))
            if e.constraint() == Some("uq_circuits_active_name")
    );
}
