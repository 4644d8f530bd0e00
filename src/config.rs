//! Configuration types for background removal operations

use crate::error::{BgRemovalError, Result};
use serde::{Deserialize, Serialize};

/// Primary environment variable holding the API credential
pub const API_KEY_ENV: &str = "API_KEY";

/// Fallback environment variable holding the API credential
pub const GEMINI_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Environment variable overriding the model name
pub const MODEL_ENV: &str = "GEMINI_MODEL";

/// Environment variable overriding the API endpoint
pub const ENDPOINT_ENV: &str = "GEMINI_ENDPOINT";

/// Default image-capable Gemini model
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Default Gemini API base URL
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Instruction sent alongside every image
pub const DEFAULT_INSTRUCTION: &str = "Remove the background from this image. Make the background transparent. Provide only the resulting image with the transparent background, no text.";

/// Configuration for the background-removal adapter
///
/// The credential is optional on purpose: its absence is reported by the
/// adapter as a configuration error when a removal is attempted.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct RemovalConfig {
    /// API credential, never serialized
    #[serde(skip)]
    pub api_key: Option<String>,

    /// Model name, e.g. `gemini-2.5-flash-image-preview`
    pub model: String,

    /// API base URL without trailing slash
    pub endpoint: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Natural-language instruction sent with the image
    pub instruction: String,
}

impl std::fmt::Debug for RemovalConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemovalConfig")
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .field("instruction", &self.instruction)
            .finish()
    }
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            instruction: DEFAULT_INSTRUCTION.to_string(),
        }
    }
}

impl RemovalConfig {
    /// Create a new configuration builder
    #[must_use]
    pub fn builder() -> RemovalConfigBuilder {
        RemovalConfigBuilder::new()
    }

    /// Build a configuration from the process environment
    ///
    /// Reads `API_KEY` (falling back to `GEMINI_API_KEY`), `GEMINI_MODEL` and
    /// `GEMINI_ENDPOINT`. A missing credential is not an error here.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a configuration from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let mut builder = RemovalConfigBuilder::new();
        if let Some(key) = non_blank(API_KEY_ENV).or_else(|| non_blank(GEMINI_API_KEY_ENV)) {
            builder = builder.api_key(key);
        }
        if let Some(model) = non_blank(MODEL_ENV) {
            builder = builder.model(model);
        }
        if let Some(endpoint) = non_blank(ENDPOINT_ENV) {
            builder = builder.endpoint(endpoint);
        }
        builder.build()
    }

    /// Credential, if one is configured and not blank
    #[must_use]
    pub fn credential(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.model.trim().is_empty() {
            return Err(BgRemovalError::invalid_config("model name cannot be empty"));
        }
        if !(self.endpoint.starts_with("https://") || self.endpoint.starts_with("http://")) {
            return Err(BgRemovalError::invalid_config(format!(
                "endpoint must be an http(s) URL, got '{}'",
                self.endpoint
            )));
        }
        if self.timeout_secs == 0 {
            return Err(BgRemovalError::invalid_config(
                "timeout must be at least 1 second",
            ));
        }
        if self.instruction.trim().is_empty() {
            return Err(BgRemovalError::invalid_config("instruction cannot be empty"));
        }
        Ok(())
    }

    /// Full `generateContent` URL for the configured model
    #[must_use]
    pub fn generate_content_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

/// Builder for `RemovalConfig`
#[derive(Debug, Default)]
pub struct RemovalConfigBuilder {
    config: RemovalConfig,
}

impl RemovalConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn api_key<S: Into<String>>(mut self, key: S) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn model<S: Into<String>>(mut self, model: S) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the API base URL; a trailing slash is dropped
    #[must_use]
    pub fn endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.config.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn instruction<S: Into<String>>(mut self, instruction: S) -> Self {
        self.config.instruction = instruction.into();
        self
    }

    /// Build and validate the configuration
    pub fn build(self) -> Result<RemovalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
