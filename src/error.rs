//! Error types for background removal operations

use thiserror::Error;

/// Result type alias for background removal operations
pub type Result<T> = std::result::Result<T, BgRemovalError>;

/// Coarse classification of a [`BgRemovalError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Credential missing or configuration rejected; fix the environment and retry
    Configuration,
    /// The model answered with text instead of an image
    ModelRejection,
    /// The model answered with neither image nor text
    EmptyResponse,
    /// Network, HTTP status or response decoding failure
    Transport,
    /// Local failures (file I/O, malformed data URLs, task failures)
    Local,
}

/// Comprehensive error types for background removal operations
#[derive(Error, Debug)]
pub enum BgRemovalError {
    /// No API credential was configured
    #[error("{0}")]
    MissingCredential(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The model returned explanatory text instead of an image
    #[error("API returned a text response instead of an image: \"{0}\"")]
    ModelRejection(String),

    /// The model returned neither an image nor any text
    #[error("No image was returned from the API. The model may have been unable to process this image.")]
    EmptyResponse,

    /// HTTP transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The API response body could not be decoded
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Malformed data URL
    #[error("Invalid data URL: {0}")]
    InvalidDataUrl(String),

    /// Input/output errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error for unexpected conditions
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for BgRemovalError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl BgRemovalError {
    /// Error raised when no credential is available, before any network I/O
    pub fn missing_credential(variable: &str) -> Self {
        Self::MissingCredential(format!(
            "{} environment variable is not set. Please configure it to use this service.",
            variable
        ))
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new model rejection error carrying the model's literal text
    pub fn model_rejection<S: Into<String>>(text: S) -> Self {
        Self::ModelRejection(text.into())
    }

    /// Create a new response parsing error
    pub fn parse<S: Into<String>>(msg: S) -> Self {
        Self::Parse(msg.into())
    }

    /// Create a new invalid data URL error
    pub fn invalid_data_url<S: Into<String>>(msg: S) -> Self {
        Self::InvalidDataUrl(msg.into())
    }

    /// Create a new internal error
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        Self::Internal(msg.into())
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Classify this error into the user-facing taxonomy
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredential(_) | Self::InvalidConfig(_) => ErrorKind::Configuration,
            Self::ModelRejection(_) => ErrorKind::ModelRejection,
            Self::EmptyResponse => ErrorKind::EmptyResponse,
            Self::Http(_) | Self::Api { .. } | Self::Parse(_) => ErrorKind::Transport,
            Self::InvalidDataUrl(_) | Self::Io(_) | Self::Internal(_) => ErrorKind::Local,
        }
    }
}
