pub mod pages;
mod routes;

use std::future::Future;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db::{Bootstrap, Database};

/// Shared application state.
///
/// `db` is `None` when no connection string is configured; handlers report
/// that condition instead of failing.
#[derive(Clone)]
pub struct AppState {
    pub db: Option<Database>,
    pub bootstrap: Bootstrap,
}

impl AppState {
    #[must_use]
    pub fn new(db: Option<Database>, bootstrap: Bootstrap) -> Self {
        Self { db, bootstrap }
    }
}

/// Start the web server and run until `shutdown` resolves.
///
/// In-flight requests are allowed to finish before this returns.
///
/// # Errors
///
/// Returns an error if the address is invalid or the server fails.
pub async fn serve<F>(config: &Config, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .context("Invalid web server address")?;

    let static_dir = find_static_dir(config.static_dir.as_deref());
    let app = create_app(state, &static_dir);

    info!(addr = %addr, "Server is running");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server error")?;

    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState, static_dir: &Path) -> Router {
    info!(static_dir = ?static_dir, "Serving static files");

    Router::new()
        .merge(routes::router())
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Find the static files directory.
///
/// An explicit `STATIC_DIR` wins. Otherwise the first existing of
/// `./public` and `./static` is used, falling back to `./public`.
fn find_static_dir(configured: Option<&Path>) -> PathBuf {
    if let Some(path) = configured {
        return path.to_path_buf();
    }

    let candidates = [PathBuf::from("./public"), PathBuf::from("./static")];

    for path in &candidates {
        if path.is_dir() {
            return path.clone();
        }
    }

    PathBuf::from("./public")
}
