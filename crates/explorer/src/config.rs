//! Runtime configuration and credentials.

use crate::coordinator::{CoordinatorConfig, PartialResponsePolicy};
use crate::upload::UploadPolicy;
use derive_getters::Getters;
use explorer_core::GenerationParameters;
use explorer_error::{ConfigError, ExplorerError, ExplorerResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variables checked for the API key, in order.
pub const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

/// Default model identifier.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Default API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Settings for the explorer front-ends.
///
/// Every field has a default, so an empty TOML file is a valid
/// configuration.
///
/// # Examples
///
/// ```
/// use explorer::ExplorerConfig;
///
/// let config: ExplorerConfig = toml::from_str(r#"
///     model = "gemini-2.5-pro"
///     poll_interval_ms = 100
///
///     [parameters]
///     temperature = 0.2
/// "#).unwrap();
///
/// assert_eq!(config.model(), "gemini-2.5-pro");
/// assert_eq!(*config.parameters().top_k(), 40);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, derive_builder::Builder)]
#[builder(default, setter(into))]
#[serde(default)]
pub struct ExplorerConfig {
    /// Model identifier
    model: String,
    /// API endpoint, without trailing slash
    base_url: String,
    /// Channel poll bound and pending animation rate
    poll_interval_ms: u64,
    /// Delay between file state checks
    upload_poll_interval_ms: u64,
    /// Give up on a processing file after this long
    upload_timeout_secs: u64,
    /// Bound on a single non-streaming generation call
    request_timeout_secs: u64,
    /// Fail a streamed answer after this long without new data
    stream_idle_timeout_secs: u64,
    /// What happens to partial text when streaming fails
    partial_response: PartialResponsePolicy,
    /// Screen Space questions for space keywords
    enforce_topic_relevance: bool,
    /// Default sampling controls
    parameters: GenerationParameters,
    /// Topic used when none is given
    default_topic: String,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            poll_interval_ms: 250,
            upload_poll_interval_ms: 200,
            upload_timeout_secs: 120,
            request_timeout_secs: 300,
            stream_idle_timeout_secs: 60,
            partial_response: PartialResponsePolicy::default(),
            enforce_topic_relevance: false,
            parameters: GenerationParameters::default(),
            default_topic: "General".to_string(),
        }
    }
}

impl ExplorerConfig {
    /// Returns a builder seeded with the defaults.
    pub fn builder() -> ExplorerConfigBuilder {
        ExplorerConfigBuilder::default()
    }

    /// Replace the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Load configuration from a TOML file.
    #[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> ExplorerResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ExplorerError::from(ConfigError::new(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            )))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ExplorerError::from(ConfigError::new(format!("Failed to parse config: {}", e)))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, else from the user config directory if a
    /// file exists there, else use the defaults.
    pub fn load(path: Option<&Path>) -> ExplorerResult<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => Self::from_file(path),
            _ => {
                tracing::debug!("No config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// `<config dir>/explorer/config.toml`, when the platform has one.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("explorer").join("config.toml"))
    }

    /// Check every value is usable.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for an empty model, a zero interval or
    /// timeout, or out-of-range default parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::new("model must not be empty"));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::new("base_url must not be empty"));
        }
        if self.poll_interval_ms == 0 || self.upload_poll_interval_ms == 0 {
            return Err(ConfigError::new("poll intervals must be greater than zero"));
        }
        if self.upload_timeout_secs == 0
            || self.request_timeout_secs == 0
            || self.stream_idle_timeout_secs == 0
        {
            return Err(ConfigError::new("timeouts must be greater than zero"));
        }
        self.parameters
            .validate()
            .map_err(|e| ConfigError::new(format!("Invalid default parameters: {}", e.kind())))
    }

    /// Timeout for a single non-streaming generation call.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Longest silence tolerated from a streaming answer.
    pub fn stream_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.stream_idle_timeout_secs)
    }

    /// Coordinator settings derived from this configuration.
    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig::builder()
            .poll_interval(Duration::from_millis(self.poll_interval_ms))
            .upload(UploadPolicy::new(
                Duration::from_millis(self.upload_poll_interval_ms),
                Duration::from_secs(self.upload_timeout_secs),
            ))
            .partial_response(self.partial_response)
            .stream_idle_timeout(self.stream_idle_timeout())
            .build()
            .unwrap_or_default()
    }
}

/// The API key, read from the environment.
#[derive(Clone)]
pub struct Credentials {
    api_key: String,
    source: &'static str,
}

impl Credentials {
    /// Read the key from `GOOGLE_API_KEY`, falling back to `GEMINI_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when neither variable holds a non-blank
    /// value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolve the key through `lookup` instead of the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        API_KEY_VARS
            .iter()
            .find_map(|&name| {
                lookup(name)
                    .map(|value| value.trim().to_string())
                    .filter(|value| !value.is_empty())
                    .map(|api_key| Self {
                        api_key,
                        source: name,
                    })
            })
            .ok_or_else(|| {
                ConfigError::new(format!(
                    "API key not found. Set {} (or {}) in the environment or a .env file",
                    API_KEY_VARS[0], API_KEY_VARS[1]
                ))
            })
    }

    /// The key itself.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Name of the variable the key came from.
    pub fn source(&self) -> &'static str {
        self.source
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("source", &self.source)
            .finish()
    }
}
