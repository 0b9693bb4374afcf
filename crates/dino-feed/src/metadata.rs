//! Feed-level configuration shared by the renderer and the assembler.

use crate::template::DEFAULT_TEMPLATE;

/// Default file name of the RSS document.
pub const DEFAULT_FEED_FILENAME: &str = "rss.xml";

/// File name of a post's rendered page.
#[must_use]
pub fn page_name(id: i64) -> String {
    format!("{id}.html")
}

/// Immutable feed configuration, captured once per pipeline.
///
/// `base_url` is joined to artifact names by plain concatenation, so it
/// should end with `/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedMetadata {
    /// Channel title.
    pub title: String,
    /// Canonical site link.
    pub link: String,
    /// Channel description.
    pub description: String,
    /// Public URL prefix for every published artifact.
    pub base_url: String,
    /// File name of the RSS document.
    pub feed_filename: String,
    /// Page template source.
    pub template: String,
}

impl FeedMetadata {
    /// Create metadata with the default feed file name and template.
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        link: impl Into<String>,
        description: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            link: link.into(),
            description: description.into(),
            base_url: base_url.into(),
            feed_filename: DEFAULT_FEED_FILENAME.to_owned(),
            template: DEFAULT_TEMPLATE.to_owned(),
        }
    }

    #[must_use]
    pub fn with_feed_filename(mut self, feed_filename: impl Into<String>) -> Self {
        self.feed_filename = feed_filename.into();
        self
    }

    #[must_use]
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    /// Public URL of an artifact published under `name`.
    #[must_use]
    pub fn url_for(&self, name: &str) -> String {
        format!("{}{name}", self.base_url)
    }

    /// Public URL of a post's page. Also used as the item guid.
    #[must_use]
    pub fn post_url(&self, id: i64) -> String {
        self.url_for(&page_name(id))
    }

    /// Public URL of the RSS document.
    #[must_use]
    pub fn feed_url(&self) -> String {
        self.url_for(&self.feed_filename)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metadata() -> FeedMetadata {
        FeedMetadata::new(
            "Dino Test",
            "http://example.com",
            "My dino test",
            "http://example.com/items/",
        )
    }

    #[test]
    fn test_defaults() {
        let meta = metadata();
        assert_eq!(meta.feed_filename, "rss.xml");
        assert_eq!(meta.template, DEFAULT_TEMPLATE);
    }

    #[test]
    fn test_post_url() {
        assert_eq!(metadata().post_url(7), "http://example.com/items/7.html");
    }

    #[test]
    fn test_feed_url_uses_configured_filename() {
        let meta = metadata().with_feed_filename("feed.xml");
        assert_eq!(meta.feed_url(), "http://example.com/items/feed.xml");
    }

    #[test]
    fn test_with_template_overrides_default() {
        let meta = metadata().with_template("<p>{{ post_title }}</p>");
        assert_eq!(meta.template, "<p>{{ post_title }}</p>");
    }
}
