use tracing::error;

use super::Database;

/// Whether the board can talk to its database right now.
///
/// `None` means no connection string was configured; that case is reported
/// without attempting a connection. Otherwise a single connection is
/// borrowed and returned, with no retry.
pub async fn is_database_reachable(db: Option<&Database>) -> bool {
    let Some(db) = db else {
        error!("Please set the environment variable PG_DSN with the PostgreSQL connection string");
        return false;
    };

    match db.ping().await {
        Ok(()) => true,
        Err(e) => {
            error!("Error connecting to PostgreSQL: {e:#}");
            false
        }
    }
}
