//! Post store error type.

/// Error returned by [`PostStore`](crate::PostStore) operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Caller broke an input contract (e.g. half of an enclosure pair).
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The database could not be reached or the statement failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored timestamp is neither RFC 3339 nor a naive ISO-8601 value.
    #[error("Post {id} has an unreadable timestamp: {value}")]
    CorruptTimestamp {
        /// Row id of the offending post.
        id: i64,
        /// Raw column value.
        value: String,
    },
}
