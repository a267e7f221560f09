mod health;
mod models;
mod queries;
pub mod schema;

pub use health::is_database_reachable;
pub use models::*;
pub use queries::*;
pub use schema::Bootstrap;

use std::time::Duration;

use anyhow::{Context, Result};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{ConnectOptions, Connection};
use tracing::{debug, info};

use crate::config::Config;

/// Longest a health check waits for one connection attempt.
pub const PING_TIMEOUT: Duration = Duration::from_secs(5);

/// Pooled PostgreSQL gateway shared by every request handler.
///
/// Cloning is cheap; clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pool: PgPool,
    /// Upper bound for a single health-check connection attempt.
    ping_timeout: Duration,
}

impl Database {
    /// Build a lazily-connecting pool from a connection string.
    ///
    /// No connection is opened here. An unreachable server surfaces on the
    /// first acquire rather than at startup.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed.
    pub fn connect_lazy(
        dsn: &str,
        max_connections: Option<u32>,
        acquire_timeout: Duration,
    ) -> Result<Self> {
        let mut options = PgPoolOptions::new().acquire_timeout(acquire_timeout);
        if let Some(max) = max_connections {
            options = options.max_connections(max);
        }

        let pool = options
            .connect_lazy(dsn)
            .context("Invalid PostgreSQL connection string")?;

        info!(dsn = %mask_dsn(dsn), "PostgreSQL pool configured");

        Ok(Self {
            pool,
            ping_timeout: acquire_timeout.min(PING_TIMEOUT),
        })
    }

    /// Build the gateway described by `config`, or `None` when `PG_DSN` is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection string cannot be parsed.
    pub fn from_config(config: &Config) -> Result<Option<Self>> {
        config
            .pg_dsn
            .as_deref()
            .map(|dsn| Self::connect_lazy(dsn, config.db_max_connections, config.db_acquire_timeout))
            .transpose()
    }

    /// Check that the server accepts a connection.
    ///
    /// An idle pooled connection is borrowed and handed straight back when
    /// one exists. Otherwise exactly one new connection is opened and closed,
    /// bounded by the ping timeout. The pool's acquire path is not used here
    /// since it retries refused connections until `acquire_timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection attempt fails or times out.
    pub async fn ping(&self) -> Result<()> {
        if let Some(conn) = self.pool.try_acquire() {
            drop(conn);
            debug!("Connected to PostgreSQL (pooled)");
            return Ok(());
        }

        let options = self.pool.connect_options();
        let conn = tokio::time::timeout(self.ping_timeout, options.connect())
            .await
            .context("Timed out connecting to PostgreSQL")?
            .context("Failed to connect to PostgreSQL")?;
        conn.close()
            .await
            .context("Failed to close PostgreSQL connection")?;

        debug!("Connected to PostgreSQL");
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("PostgreSQL pool closed");
    }

    /// Get a reference to the connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Hide the password part of a connection string for logging.
#[must_use]
pub fn mask_dsn(dsn: &str) -> String {
    if let Some(at_pos) = dsn.rfind('@') {
        if let Some(colon_pos) = dsn[..at_pos].rfind(':') {
            // Only a password separator if it comes after the scheme's "//".
            if dsn[..colon_pos].contains("//") {
                return format!("{}***{}", &dsn[..=colon_pos], &dsn[at_pos..]);
            }
        }
    }
    dsn.to_string()
}
