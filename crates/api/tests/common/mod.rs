//! Shared helpers for HTTP-level integration tests.
//!
//! Requests are sent straight into the router with `tower::ServiceExt`, so
//! no socket is opened. Create and edit endpoints take multipart bodies,
//! which [`multipart_body`] assembles by hand.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, Request};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use paddock_api::config::ServerConfig;
use paddock_api::router::build_app_router;
use paddock_api::state::AppState;

const BOUNDARY: &str = "paddock-test-boundary";

/// Smallest payload that sniffs as a PNG image.
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        max_upload_bytes: 1024 * 1024,
        db_max_connections: 5,
    }
}

/// Build the full application router, middleware included, over `pool`.
pub fn build_test_app(pool: PgPool) -> Router {
    build_app_router(AppState {
        pool,
        config: Arc::new(test_config()),
    })
}

pub async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

/// POST a multipart form made of text fields only.
pub async fn post_form(app: &Router, uri: &str, fields: &[(&str, &str)]) -> Response {
    send_multipart(app, uri, multipart_body(fields, None)).await
}

/// POST a multipart form with one file part.
pub async fn post_form_with_file(
    app: &Router,
    uri: &str,
    fields: &[(&str, &str)],
    file: (&str, &[u8]),
) -> Response {
    send_multipart(app, uri, multipart_body(fields, Some(file))).await
}

async fn send_multipart(app: &Router, uri: &str, body: Vec<u8>) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

pub fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((name, bytes)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; \
                 filename=\"{name}.png\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Seeding through the API
// ---------------------------------------------------------------------------

/// Create a team and return its id.
pub async fn create_team(app: &Router, name: &str) -> i64 {
    let response = post_form(app, "/escuderias/", &[("nombre", name), ("pais", "Italy")]).await;
    assert_eq!(response.status(), 201, "creating team {name}");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a driver (optionally attached to a team) and return its id.
pub async fn create_driver(app: &Router, name: &str, number: i32, team_id: Option<i64>) -> i64 {
    let number = number.to_string();
    let team = team_id.map(|t| t.to_string()).unwrap_or_default();
    let response = post_form(
        app,
        "/pilotos/",
        &[
            ("nombre", name),
            ("nacionalidad", "British"),
            ("numero", &number),
            ("escuderia_id", &team),
        ],
    )
    .await;
    assert_eq!(response.status(), 201, "creating driver {name}");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}

/// Create a circuit and return its id.
pub async fn create_circuit(app: &Router, name: &str, length_km: &str) -> i64 {
    let response = post_form(
        app,
        "/circuitos/",
        &[("nombre", name), ("pais", "Belgium"), ("longitud_km", length_km)],
    )
    .await;
    assert_eq!(response.status(), 201, "creating circuit {name}");
    body_json(response).await["data"]["id"].as_i64().unwrap()
}
