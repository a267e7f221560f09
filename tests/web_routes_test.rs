//! Integration tests for web routes.
//!
//! Tests marked `requires database` need a disposable PostgreSQL database:
//! `DATABASE_URL=postgres://... cargo test -- --ignored`
//! CI runs them in the `database` job of `.github/workflows/ci.yml`.

use std::path::Path;
use std::time::{Duration, Instant};

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serial_test::serial;
use tower::ServiceExt;
use twitter_board::db::{list_posts, Bootstrap, Database};
use twitter_board::web::{create_app, AppState};

/// Nothing listens on port 1, so every acquire is refused.
const UNREACHABLE_DSN: &str = "postgres://board:pw@127.0.0.1:1/board";

fn create_test_app(db: Option<Database>) -> Router {
    create_app(AppState::new(db, Bootstrap::new()), Path::new("public"))
}

/// Uses the default `DB_ACQUIRE_TIMEOUT_SECS`, so a slow answer means the
/// handler waited on the pool's retry loop.
fn unreachable_db() -> Database {
    Database::connect_lazy(UNREACHABLE_DSN, None, Duration::from_secs(30))
        .expect("Failed to build lazy pool")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

#[tokio::test]
async fn test_index_without_dsn_shows_missing_config() {
    let app = create_test_app(None);

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("PG_DSN"));
    assert!(body.contains("Configuration missing"));
    assert!(!body.contains(r#"action="/new""#));
}

#[tokio::test]
async fn test_index_with_unreachable_database_shows_missing_config() {
    let app = create_test_app(Some(unreachable_db()));

    let started = Instant::now();
    let response = tokio::time::timeout(Duration::from_secs(10), app.oneshot(get("/")))
        .await
        .expect("request should not hang")
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_string(response).await;
    assert!(body.contains("Configuration missing"));
}

#[tokio::test]
async fn test_create_without_dsn_is_server_error() {
    let app = create_test_app(None);

    let response = app.oneshot(post_form("/new", "content=hello")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Internal Server Error");
}

#[tokio::test]
async fn test_create_with_unreachable_database_is_server_error() {
    let app = create_test_app(Some(unreachable_db()));

    let started = Instant::now();
    let response = tokio::time::timeout(
        Duration::from_secs(10),
        app.oneshot(post_form("/new", "content=hello")),
    )
    .await
    .expect("request should not hang")
    .unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_healthz_with_unreachable_database_answers_quickly() {
    let app = create_test_app(Some(unreachable_db()));

    let started = Instant::now();
    let response = tokio::time::timeout(Duration::from_secs(10), app.oneshot(get("/healthz")))
        .await
        .expect("request should not hang")
        .unwrap();
    assert!(started.elapsed() < Duration::from_secs(5));
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_healthz_without_dsn_is_unavailable() {
    let app = create_test_app(None);

    let response = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = create_test_app(None);

    let response = app.oneshot(get("/edit/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_static_stylesheet_is_served() {
    let app = create_test_app(None);

    let response = app.oneshot(get("/static/css/style.css")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

// ========== Database-backed ==========

async fn setup_db() -> Database {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
    let db = Database::connect_lazy(&url, Some(5), Duration::from_secs(5))
        .expect("Failed to build pool");
    sqlx::query("DROP TABLE IF EXISTS twitters")
        .execute(db.pool())
        .await
        .expect("Failed to reset table");
    db
}

#[tokio::test]
#[serial]
#[ignore = "requires database"]
async fn test_post_then_list_shows_single_entry() {
    let db = setup_db().await;
    let app = create_test_app(Some(db.clone()));

    let response = app
        .clone()
        .oneshot(post_form("/new", "content=hello"))
        .await
        .unwrap();
    // The table does not exist yet and POST does not bootstrap.
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    // First GET creates the table.
    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_string(response).await.contains("No twitters yet"));

    let response = app
        .clone()
        .oneshot(post_form("/new", "content=hello"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/");

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_string(response).await;
    assert_eq!(body.matches(r#"class="twitter""#).count(), 1);
    assert!(body.contains(">hello<"));

    let posts = list_posts(db.pool()).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "hello");
    assert!(posts[0].created_at.is_some());
}

#[tokio::test]
#[serial]
#[ignore = "requires database"]
async fn test_empty_content_is_accepted() {
    let db = setup_db().await;
    Bootstrap::new().run(db.pool()).await.unwrap();
    let app = create_test_app(Some(db.clone()));

    let response = app.oneshot(post_form("/new", "content=")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let posts = list_posts(db.pool()).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "");
}

#[tokio::test]
#[serial]
#[ignore = "requires database"]
async fn test_missing_content_field_is_treated_as_empty() {
    let db = setup_db().await;
    Bootstrap::new().run(db.pool()).await.unwrap();
    let app = create_test_app(Some(db.clone()));

    let response = app.oneshot(post_form("/new", "")).await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);

    let posts = list_posts(db.pool()).await.unwrap();
    assert_eq!(posts.len(), 1);
    assert_eq!(posts[0].content, "");
}

#[tokio::test]
#[serial]
#[ignore = "requires database"]
async fn test_index_lists_newest_first() {
    let db = setup_db().await;
    Bootstrap::new().run(db.pool()).await.unwrap();
    sqlx::query(
        r"
        INSERT INTO twitters (content, created_at) VALUES
            ('oldest', TIMESTAMP '2024-01-01 08:00:00'),
            ('newest', TIMESTAMP '2024-01-03 08:00:00'),
            ('middle', TIMESTAMP '2024-01-02 08:00:00')
        ",
    )
    .execute(db.pool())
    .await
    .unwrap();

    let app = create_test_app(Some(db));
    let response = app.oneshot(get("/")).await.unwrap();
    let body = body_string(response).await;

    let newest = body.find(">newest<").unwrap();
    let middle = body.find(">middle<").unwrap();
    let oldest = body.find(">oldest<").unwrap();
    assert!(newest < middle && middle < oldest);
}

#[tokio::test]
#[serial]
#[ignore = "requires database"]
async fn test_listing_failure_is_server_error() {
    let db = setup_db().await;
    let app = create_test_app(Some(db.clone()));

    let response = app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The latch is already set, so the table stays gone for the next request.
    sqlx::query("DROP TABLE twitters")
        .execute(db.pool())
        .await
        .unwrap();

    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_string(response).await, "Internal Server Error");
}

#[tokio::test]
#[serial]
#[ignore = "requires database"]
async fn test_healthz_bootstraps_and_reports_ready() {
    let db = setup_db().await;
    let app = create_test_app(Some(db));

    let response = app.oneshot(get("/healthz")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}
