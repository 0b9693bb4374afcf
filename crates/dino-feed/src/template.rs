//! Post page rendering.
//!
//! Pages are rendered with `minijinja` in strict mode: a template that
//! references a variable outside [`PageContext`] fails instead of rendering
//! an empty string. Output is HTML-escaped and trailing newlines are kept, so
//! a template without placeholders is reproduced byte for byte.

use dino_store::Post;
use minijinja::{Environment, UndefinedBehavior, Value};
use serde::Serialize;

use crate::metadata::FeedMetadata;

/// Name the page template is registered under. The `.html` suffix turns on
/// HTML auto-escaping.
const PAGE_TEMPLATE: &str = "post.html";

/// Enclosure types the default template embeds as an `<img>`.
///
/// Exposed to templates as the `image_media_types` global.
pub const IMAGE_MEDIA_TYPES: [&str; 3] = ["image/png", "image/gif", "image/jpeg"];

/// Built-in page template.
pub const DEFAULT_TEMPLATE: &str = r#"<!doctype html>
<html>
	<head>
		<meta charset="utf-8">
		<title>{{ feed_title }}: {{ post_title }}</title>
		<link rel="stylesheet" href="dino-style.css">
		<link rel="alternate" type="application/rss+xml" href="{{ feed_url }}" title="{{ feed_title }}">
	</head>
	<body>
		<header>
			<h1 class="post_title">{{ post_title }}</h1>
		</header>
		<div class="post_description">{{ post_description }}</div>
		<div class="enclosure">
		{% if enclosure_url %}
			{% if enclosure_media_type in image_media_types %}
				<img src="{{ enclosure_url }}">
			{% else %}
				<a href="{{ enclosure_url }}">View media</a>
			{% endif %}
		{% endif %}
		</div>
		<footer>
			<div class="feed_link"><a href="{{ feed_link }}">{{ feed_title }}</a></div>
			<div class="feed_url"><a href="{{ feed_url }}" rel="alternate" type="application/rss+xml">{{ feed_title }}</a></div>
			<div class="post_timestamp">{{ post_timestamp }}</div>
		</footer>
	</body>
	<!-- dino default html template -->
</html>
"#;

/// Error raised while compiling or rendering a page template.
#[derive(Debug, thiserror::Error)]
#[error("Template error: {0}")]
pub struct RenderError(#[from] minijinja::Error);

/// Variables available to a page template.
///
/// URLs are passed as safe values, escaped for attribute use but with `/`
/// left intact.
#[derive(Debug, Serialize)]
pub struct PageContext<'a> {
    pub feed_title: &'a str,
    pub feed_link: Value,
    pub feed_description: &'a str,
    /// Public URL of the RSS document.
    pub feed_url: Value,
    pub post_id: i64,
    pub post_title: &'a str,
    pub post_description: &'a str,
    pub post_timestamp: String,
    /// Always present; `none` when the post has no enclosure.
    pub enclosure_url: Option<Value>,
    /// Always present; `none` when the post has no enclosure.
    pub enclosure_media_type: Option<&'a str>,
}

impl<'a> PageContext<'a> {
    /// Build the context for one post.
    #[must_use]
    pub fn new(metadata: &'a FeedMetadata, post: &'a Post) -> Self {
        Self {
            feed_title: &metadata.title,
            feed_link: url_value(&metadata.link),
            feed_description: &metadata.description,
            feed_url: url_value(&metadata.feed_url()),
            post_id: post.id,
            post_title: &post.text,
            post_description: &post.text,
            post_timestamp: post.timestamp(),
            enclosure_url: post.enclosure.as_ref().map(|e| url_value(&e.url)),
            enclosure_media_type: post.enclosure.as_ref().map(|e| e.media_type.as_str()),
        }
    }
}

/// Pass a URL to templates as a safe value.
///
/// minijinja's auto-escaping also rewrites `/` as `&#x2f;`; URLs only need
/// the attribute-breaking characters escaped.
fn url_value(url: &str) -> Value {
    Value::from_safe_string(escape(url))
}

/// Escape HTML special characters.
fn escape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#x27;"),
            _ => result.push(c),
        }
    }
    result
}

/// Compiled page template.
pub struct Renderer {
    env: Environment<'static>,
}

impl Renderer {
    /// Compile `source`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the template has a syntax error.
    pub fn new(source: impl Into<String>) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.add_global("image_media_types", Value::from_serialize(IMAGE_MEDIA_TYPES));
        env.add_template_owned(PAGE_TEMPLATE, source.into())?;
        Ok(Self { env })
    }

    /// Render one page.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the template references an undefined
    /// variable or fails at runtime.
    pub fn render(&self, context: &PageContext<'_>) -> Result<String, RenderError> {
        let template = self.env.get_template(PAGE_TEMPLATE)?;
        Ok(template.render(context)?)
    }

    /// Render the page for `post`.
    pub fn render_post(&self, metadata: &FeedMetadata, post: &Post) -> Result<String, RenderError> {
        self.render(&PageContext::new(metadata, post))
    }
}
