//! Schema bootstrap for the board's single table.
//!
//! There is no migration history here: the table is created if it does not
//! exist and left alone otherwise.

use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use super::Database;

/// Name of the table holding posts.
pub const TWITTERS_TABLE_NAME: &str = "twitters";

/// Creation statement for the posts table.
pub const TWITTERS_TABLE: &str = r"
    CREATE TABLE twitters (
        id SERIAL PRIMARY KEY,
        content TEXT NOT NULL,
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
";

/// Whether a table named `name` exists in the `public` schema.
pub async fn table_exists(pool: &PgPool, name: &str) -> Result<bool> {
    let (exists,): (bool,) = sqlx::query_as(
        r"
        SELECT EXISTS (
            SELECT FROM information_schema.tables
            WHERE table_schema = 'public'
            AND table_name = $1
        )
        ",
    )
    .bind(name)
    .fetch_one(pool)
    .await
    .with_context(|| format!("Failed to check whether table {name} exists"))?;

    Ok(exists)
}

/// Run `create_sql` unless a table named `name` already exists.
///
/// Returns `true` when this call created the table.
pub async fn ensure_table(pool: &PgPool, name: &str, create_sql: &str) -> Result<bool> {
    if table_exists(pool, name).await? {
        debug!(table = name, "Table already exists");
        return Ok(false);
    }

    sqlx::query(create_sql)
        .execute(pool)
        .await
        .with_context(|| format!("Failed to create table {name}"))?;

    info!(table = name, "Table has been created");
    Ok(true)
}

/// Single-execution latch around the schema bootstrap.
///
/// Concurrent callers share one in-flight attempt. Once it succeeds every
/// later call returns immediately; a failed attempt leaves the latch unset so
/// the next caller tries again.
#[derive(Debug, Clone, Default)]
pub struct Bootstrap {
    done: Arc<OnceCell<()>>,
}

impl Bootstrap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure the posts table exists, at most once per process.
    ///
    /// # Errors
    ///
    /// Returns an error if the existence check or the creation fails.
    pub async fn run(&self, pool: &PgPool) -> Result<()> {
        self.done
            .get_or_try_init(|| async {
                ensure_table(pool, TWITTERS_TABLE_NAME, TWITTERS_TABLE).await?;
                Ok::<(), anyhow::Error>(())
            })
            .await?;
        Ok(())
    }

    /// Run the bootstrap only after a single connection attempt succeeds.
    ///
    /// Used at startup, where a dead server must not hold the listener back
    /// for the pool's whole acquire timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the server is unreachable or the bootstrap fails.
    pub async fn run_if_reachable(&self, db: &Database) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }
        db.ping().await?;
        self.run(db.pool()).await
    }

    /// Whether the bootstrap has completed successfully.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.done.initialized()
    }
}
