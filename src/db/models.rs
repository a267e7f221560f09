use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A single entry on the board, as stored in the `twitters` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: i32,
    pub content: String,
    /// Nullable at the schema level; every row written by this service has one.
    pub created_at: Option<NaiveDateTime>,
}

impl Post {
    /// Timestamp to show for this post.
    ///
    /// Rows lacking a `created_at` fall back to `now`. The fallback is only
    /// used for rendering and is never written back.
    #[must_use]
    pub fn display_time(&self, now: NaiveDateTime) -> NaiveDateTime {
        self.created_at.unwrap_or(now)
    }
}
