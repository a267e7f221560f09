use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Form;
use axum::Router;
use chrono::NaiveDateTime;
use serde::Deserialize;

use super::pages;
use super::AppState;
use crate::db::{create_post, is_database_reachable, list_posts, Database};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/new", post(create))
        .route("/healthz", get(health))
}

fn internal_error() -> Response {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
}

fn missing_config() -> Response {
    pages::render_missing_config_page().into_response()
}

/// The configured database, if it answers a single connection attempt.
async fn reachable_db(state: &AppState) -> Option<&Database> {
    let db = state.db.as_ref();
    if is_database_reachable(db).await {
        db
    } else {
        None
    }
}

/// Wall-clock time in the same frame as `CURRENT_TIMESTAMP` written into a
/// `TIMESTAMP` column by a server running in the host's local zone.
fn display_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

// ========== HTML Routes ==========

async fn index(State(state): State<AppState>) -> Response {
    let Some(db) = reachable_db(&state).await else {
        tracing::error!(
            "PostgreSQL connection failed, please check your connection string in the environment variable PG_DSN"
        );
        return missing_config();
    };

    // Usually a no-op: startup has already run it.
    if let Err(e) = state.bootstrap.run(db.pool()).await {
        tracing::error!("Error creating twitters table: {e:#}");
    }

    let posts = match list_posts(db.pool()).await {
        Ok(p) => p,
        Err(e) => {
            tracing::error!("Error fetching twitters: {e:#}");
            return internal_error();
        }
    };

    pages::render_index_page(&posts, display_now()).into_response()
}

#[derive(Debug, Deserialize)]
struct NewTwitterForm {
    #[serde(default)]
    content: String,
}

async fn create(State(state): State<AppState>, Form(form): Form<NewTwitterForm>) -> Response {
    let Some(db) = reachable_db(&state).await else {
        tracing::error!("Error adding twitter: PostgreSQL is not reachable");
        return internal_error();
    };

    if let Err(e) = create_post(db.pool(), &form.content).await {
        tracing::error!("Error adding twitter: {e:#}");
        return internal_error();
    }

    tracing::debug!(length = form.content.len(), "Twitter added");

    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

// ========== Probes ==========

/// Readiness: the database answers and the schema is in place.
async fn health(State(state): State<AppState>) -> Response {
    let Some(db) = reachable_db(&state).await else {
        return (StatusCode::SERVICE_UNAVAILABLE, "database unreachable").into_response();
    };

    if let Err(e) = state.bootstrap.run(db.pool()).await {
        tracing::warn!("Schema bootstrap still failing: {e:#}");
        return (StatusCode::SERVICE_UNAVAILABLE, "schema not ready").into_response();
    }

    (StatusCode::OK, "OK").into_response()
}
