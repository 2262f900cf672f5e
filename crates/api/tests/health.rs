mod common;

use axum::http::header::LOCATION;
use axum::http::StatusCode;
use common::{body_json, build_test_app, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn health_reports_database_status(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert_eq!(json["db_healthy"], true);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn landing_redirects_to_team_list(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(&app, "/").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/teams/");

    let response = get(&app, "/teams/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_is_not_found(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(&app, "/nonexistent").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
