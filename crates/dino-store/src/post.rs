//! Post and enclosure records.

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};

/// Media attached to a post, surfaced as an RSS `<enclosure>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    /// Absolute URL the media is published under.
    pub url: String,
    /// MIME type (e.g. "image/png").
    pub media_type: String,
}

impl Enclosure {
    #[must_use]
    pub fn new(url: impl Into<String>, media_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            media_type: media_type.into(),
        }
    }
}

/// A stored post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Store-assigned id, strictly increasing and never reused.
    pub id: i64,
    /// Post body. Doubles as the item title in the feed.
    pub text: String,
    /// UTC time the post was appended.
    pub created_at: DateTime<Utc>,
    /// Optional attached media.
    pub enclosure: Option<Enclosure>,
}

impl Post {
    /// Creation time in the same format the store persists.
    #[must_use]
    pub fn timestamp(&self) -> String {
        format_timestamp(self.created_at)
    }
}

/// Format a UTC time the way the `posts.timestamp` column stores it.
///
/// Fixed microsecond precision with a `Z` suffix keeps lexical order equal to
/// chronological order, which `ORDER BY timestamp` relies on.
#[must_use]
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored timestamp.
///
/// Accepts RFC 3339 and, for databases written by older tools, naive
/// ISO-8601 values which are taken to be UTC.
pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Some(time.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
