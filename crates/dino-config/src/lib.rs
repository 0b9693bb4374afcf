//! Configuration for the dino feed pipeline.
//!
//! Parses `dino.toml` with serde. Without an explicit path the file is
//! searched for in the current directory and its parents.
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` expands to the value of VAR, errors if unset
//! - `${VAR:-default}` expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `store.url`
//! - `feed.link`
//! - `feed.base_url`
//! - every string in `[publish.s3]`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "dino.toml";

const DEFAULT_STORE_URL: &str = "sqlite://dino.db";
const DEFAULT_FEED_FILENAME: &str = "rss.xml";
const DEFAULT_WINDOW: u32 = 10;
const DEFAULT_REGION: &str = "us-east-1";

/// CLI settings that override configuration file values.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the store URL.
    pub store_url: Option<String>,
    /// Override the output directory.
    pub output_dir: Option<PathBuf>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub feed: FeedConfig,
    pub output: OutputConfig,
    pub publish: PublishConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Post store configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// SQLite URL. Relative file paths are resolved against the config file.
    pub url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_STORE_URL.to_owned(),
        }
    }
}

/// Channel metadata and rendering settings.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub title: String,
    pub link: String,
    pub description: String,
    /// Public URL prefix of every published file. Must end with `/`.
    pub base_url: String,
    /// File name of the RSS document.
    pub filename: String,
    /// Number of recent posts rendered per pass.
    pub window: u32,
    /// Page template file. The built-in template is used when unset.
    pub template: Option<PathBuf>,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            link: String::new(),
            description: String::new(),
            base_url: String::new(),
            filename: DEFAULT_FEED_FILENAME.to_owned(),
            window: DEFAULT_WINDOW,
            template: None,
        }
    }
}

/// Where materialized files are written.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Staging directory. A temporary directory is used when unset.
    pub dir: Option<PathBuf>,
}

/// Publication backend selection.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    pub backend: BackendKind,
    pub s3: Option<S3Settings>,
}

/// Available publication backends.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    S3,
}

/// `[publish.s3]` section.
#[derive(Debug, Deserialize)]
pub struct S3Settings {
    pub bucket: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// S3-compatible endpoint URL (MinIO, LocalStack).
    pub endpoint: Option<String>,
    /// Key prefix within the bucket.
    pub root_path: Option<String>,
    pub access_key: Option<String>,
    pub secret_key: Option<String>,
}

impl S3Settings {
    /// Static credentials, if both halves are configured.
    #[must_use]
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => Some((access, secret)),
            _ => None,
        }
    }

    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any field is empty or has invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.bucket, "publish.s3.bucket")?;
        require_non_empty(&self.region, "publish.s3.region")?;
        if let Some(endpoint) = &self.endpoint {
            require_http_url(endpoint, "publish.s3.endpoint")?;
        }
        match (&self.access_key, &self.secret_key) {
            (Some(access), Some(secret)) => {
                require_non_empty(access, "publish.s3.access_key")?;
                require_non_empty(secret, "publish.s3.secret_key")?;
            }
            (None, None) => {}
            _ => {
                return Err(ConfigError::Validation(
                    "publish.s3.access_key and publish.s3.secret_key must be set together"
                        .to_owned(),
                ));
            }
        }
        Ok(())
    }
}

fn default_region() -> String {
    DEFAULT_REGION.to_owned()
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`publish.s3.secret_key`").
        field: String,
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise searches
    /// for `dino.toml` in the current directory and its parents.
    ///
    /// CLI settings are applied after path resolution and take precedence
    /// over file values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` if no file exists, and parse,
    /// expansion or validation errors otherwise.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let path = match config_path {
            Some(path) if !path.exists() => return Err(ConfigError::NotFound(path.to_path_buf())),
            Some(path) => path.to_path_buf(),
            None => Self::discover_config()
                .ok_or_else(|| ConfigError::NotFound(PathBuf::from(CONFIG_FILENAME)))?,
        };

        let mut config = Self::load_from_file(&path)?;
        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
        }

        Ok(config)
    }

    /// Get the validated `[publish.s3]` section.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if the section is missing or invalid.
    pub fn require_s3(&self) -> Result<&S3Settings, ConfigError> {
        let s3 = self.publish.s3.as_ref().ok_or_else(|| {
            ConfigError::Validation("[publish.s3] section required when backend = \"s3\"".into())
        })?;
        s3.validate()?;
        Ok(s3)
    }

    /// Read the configured page template, if any.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the template file cannot be read.
    pub fn read_template(&self) -> Result<Option<String>, ConfigError> {
        self.feed
            .template
            .as_deref()
            .map(std::fs::read_to_string)
            .transpose()
            .map_err(ConfigError::from)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_feed()?;
        if self.publish.backend == BackendKind::S3 {
            self.require_s3()?;
        }
        Ok(())
    }

    fn validate_feed(&self) -> Result<(), ConfigError> {
        let feed = &self.feed;
        require_non_empty(&self.store.url, "store.url")?;
        require_non_empty(&feed.title, "feed.title")?;
        require_non_empty(&feed.link, "feed.link")?;
        require_http_url(&feed.link, "feed.link")?;
        require_non_empty(&feed.base_url, "feed.base_url")?;
        require_http_url(&feed.base_url, "feed.base_url")?;
        if !feed.base_url.ends_with('/') {
            return Err(ConfigError::Validation(
                "feed.base_url must end with '/'".to_owned(),
            ));
        }
        require_non_empty(&feed.filename, "feed.filename")?;
        if feed.filename.contains('/') {
            return Err(ConfigError::Validation(
                "feed.filename must be a plain file name".to_owned(),
            ));
        }
        if feed.window == 0 {
            return Err(ConfigError::Validation(
                "feed.window must be greater than 0".to_owned(),
            ));
        }
        Ok(())
    }

    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(url) = &settings.store_url {
            self.store.url.clone_from(url);
        }
        if let Some(dir) = &settings.output_dir {
            self.output.dir = Some(dir.clone());
        }
    }

    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::parse(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Parse, expand, resolve and validate `content` as if it lived in `config_dir`.
    fn parse(content: &str, config_dir: &Path) -> Result<Self, ConfigError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(config_dir);
        config.validate()?;
        Ok(config)
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.store.url = expand::expand_env(&self.store.url, "store.url")?;
        self.feed.link = expand::expand_env(&self.feed.link, "feed.link")?;
        self.feed.base_url = expand::expand_env(&self.feed.base_url, "feed.base_url")?;

        if let Some(ref mut s3) = self.publish.s3 {
            s3.bucket = expand::expand_env(&s3.bucket, "publish.s3.bucket")?;
            s3.region = expand::expand_env(&s3.region, "publish.s3.region")?;
            expand::expand_opt(&mut s3.endpoint, "publish.s3.endpoint")?;
            expand::expand_opt(&mut s3.root_path, "publish.s3.root_path")?;
            expand::expand_opt(&mut s3.access_key, "publish.s3.access_key")?;
            expand::expand_opt(&mut s3.secret_key, "publish.s3.secret_key")?;
        }

        Ok(())
    }

    fn resolve_paths(&mut self, config_dir: &Path) {
        self.store.url = resolve_store_url(&self.store.url, config_dir);
        if let Some(template) = &self.feed.template {
            self.feed.template = Some(config_dir.join(template));
        }
        if let Some(dir) = &self.output.dir {
            self.output.dir = Some(config_dir.join(dir));
        }
    }
}

/// Anchor a relative SQLite file path at `config_dir`.
///
/// In-memory URLs and URLs with query parameters are returned unchanged.
fn resolve_store_url(url: &str, config_dir: &Path) -> String {
    if url.contains(":memory:") || url.contains('?') {
        return url.to_owned();
    }
    let path = url
        .strip_prefix("sqlite://")
        .or_else(|| url.strip_prefix("sqlite:"))
        .unwrap_or(url);
    if Path::new(path).is_absolute() {
        return url.to_owned();
    }
    format!("sqlite://{}", config_dir.join(path).display())
}
