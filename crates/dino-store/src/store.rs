//! SQLite-backed post store.

use std::str::FromStr;

use chrono::Utc;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};

use crate::error::StoreError;
use crate::post::{Enclosure, Post, format_timestamp, parse_timestamp};

/// Number of most recent posts included in one materialization pass.
pub const DEFAULT_WINDOW: u32 = 10;

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS posts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    text TEXT NOT NULL,
    enclosure_url TEXT,
    enclosure_media_type TEXT,
    timestamp TEXT NOT NULL
)";

const SELECT_COLUMNS: &str = "SELECT id, text, enclosure_url, enclosure_media_type, timestamp FROM posts";

/// Append-only post log.
///
/// The pool is capped at one connection: the store is not meant to be
/// mutated by concurrent callers, and a single connection keeps
/// `sqlite::memory:` databases alive for the store's lifetime.
#[derive(Debug)]
pub struct PostStore {
    pool: SqlitePool,
    owned: bool,
}

impl PostStore {
    /// Open a new connection pool for `url` and ensure the schema exists.
    ///
    /// Accepts `sqlite://path`, `sqlite:path`, a bare file path, or
    /// `sqlite::memory:`. Missing database files are created. The pool is
    /// owned by the store and closed by [`PostStore::close`].
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        tracing::debug!(url, "Opened post store");

        let store = Self { pool, owned: true };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Wrap a caller-owned pool and ensure the schema exists.
    ///
    /// [`PostStore::close`] leaves this pool open.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, StoreError> {
        let store = Self { pool, owned: false };
        store.ensure_schema().await?;
        Ok(store)
    }

    /// Underlying connection pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Whether [`PostStore::close`] will close the pool.
    #[must_use]
    pub fn owns_pool(&self) -> bool {
        self.owned
    }

    /// Create the `posts` table if it does not exist.
    pub async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Append a post and return its id.
    ///
    /// `enclosure_url` and `enclosure_media_type` must be given together.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidInput`] if only one enclosure field is
    /// set (nothing is written), or [`StoreError::Database`] if the insert fails.
    pub async fn append(
        &self,
        text: &str,
        enclosure_url: Option<&str>,
        enclosure_media_type: Option<&str>,
    ) -> Result<i64, StoreError> {
        let enclosure = match (enclosure_url, enclosure_media_type) {
            (Some(url), Some(media_type)) => Some(Enclosure::new(url, media_type)),
            (None, None) => None,
            (Some(_), None) => {
                return Err(StoreError::InvalidInput(
                    "enclosure URL given without a media type".to_owned(),
                ));
            }
            (None, Some(_)) => {
                return Err(StoreError::InvalidInput(
                    "enclosure media type given without a URL".to_owned(),
                ));
            }
        };
        self.append_post(text, enclosure.as_ref()).await
    }

    /// Append a post with an optional, already paired enclosure.
    pub async fn append_post(
        &self,
        text: &str,
        enclosure: Option<&Enclosure>,
    ) -> Result<i64, StoreError> {
        let timestamp = format_timestamp(Utc::now());
        let result = sqlx::query(
            "INSERT INTO posts (text, enclosure_url, enclosure_media_type, timestamp) \
             VALUES (?, ?, ?, ?)",
        )
        .bind(text)
        .bind(enclosure.map(|e| e.url.as_str()))
        .bind(enclosure.map(|e| e.media_type.as_str()))
        .bind(timestamp.as_str())
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(id, timestamp = %timestamp, "Appended post");
        Ok(id)
    }

    /// Return up to `limit` posts, newest first.
    ///
    /// Ordered by timestamp descending; posts sharing a timestamp are ordered
    /// by id descending so the result always matches insertion order.
    pub async fn recent(&self, limit: u32) -> Result<Vec<Post>, StoreError> {
        let rows = sqlx::query(&format!(
            "{SELECT_COLUMNS} ORDER BY timestamp DESC, id DESC LIMIT ?"
        ))
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(post_from_row).collect()
    }

    /// Look up a single post by id.
    pub async fn get(&self, id: i64) -> Result<Option<Post>, StoreError> {
        let row = sqlx::query(&format!("{SELECT_COLUMNS} WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(post_from_row).transpose()
    }

    /// Total number of stored posts.
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Release the store, closing the pool only if the store opened it.
    pub async fn close(self) {
        if self.owned {
            self.pool.close().await;
            tracing::debug!("Closed post store");
        }
    }
}

fn post_from_row(row: &SqliteRow) -> Result<Post, StoreError> {
    let id: i64 = row.try_get("id")?;
    let text: String = row.try_get("text")?;
    let url: Option<String> = row.try_get("enclosure_url")?;
    let media_type: Option<String> = row.try_get("enclosure_media_type")?;
    let raw_timestamp: String = row.try_get("timestamp")?;

    let created_at = parse_timestamp(&raw_timestamp).ok_or(StoreError::CorruptTimestamp {
        id,
        value: raw_timestamp,
    })?;

    let enclosure = match (url, media_type) {
        (Some(url), Some(media_type)) => Some(Enclosure { url, media_type }),
        _ => None,
    };

    Ok(Post {
        id,
        text,
        created_at,
        enclosure,
    })
}
