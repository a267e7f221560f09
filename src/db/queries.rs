use anyhow::{Context, Result};
use sqlx::PgPool;

use super::models::Post;

// ========== Posts ==========

/// All posts, newest first.
pub async fn list_posts(pool: &PgPool) -> Result<Vec<Post>> {
    sqlx::query_as("SELECT id, content, created_at FROM twitters ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
        .context("Failed to fetch twitters")
}

/// Insert a new post stamped with the database's current time.
///
/// Content is stored as given; empty strings are accepted.
pub async fn create_post(pool: &PgPool, content: &str) -> Result<()> {
    sqlx::query("INSERT INTO twitters (content, created_at) VALUES ($1, CURRENT_TIMESTAMP)")
        .bind(content)
        .execute(pool)
        .await
        .context("Failed to insert twitter")?;

    Ok(())
}

