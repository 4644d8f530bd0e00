#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]

//! # Gemini Background Removal Library
//!
//! Removes the background of an image by asking a Gemini image model to
//! return a transparent-background PNG.
//!
//! The crate is split into a pure session state machine, a background-removal
//! adapter over the Gemini `generateContent` API, a controller that runs
//! removals on tokio tasks, and a pure view model derived from the session.
//!
//! ## Features
//!
//! - **Session state machine**: `Idle`, `Selected`, `Processing`, `Succeeded`, `Failed`
//! - **Stale result protection**: outcomes arriving after a reset are dropped
//! - **Distinct errors**: missing credential, model text refusal, empty response, transport
//! - **Pure rendering**: [`view::render`] maps a session to a serializable [`ViewModel`]
//! - **CLI Integration**: optional command-line interface (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gemini_bgremove::{
//!     GeminiBackgroundRemover, ImageIOService, RemovalConfig, SessionController, SessionState,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! // Reads API_KEY (or GEMINI_API_KEY), GEMINI_MODEL and GEMINI_ENDPOINT
//! let config = RemovalConfig::from_env()?;
//! let controller = SessionController::new(GeminiBackgroundRemover::new(config)?);
//!
//! controller.select_image(ImageIOService::load_source_image("input.jpg")?);
//! if let Some(task) = controller.request_removal() {
//!     task.settled().await?;
//! }
//!
//! if let SessionState::Succeeded { result_handle, .. } = controller.snapshot().state() {
//!     ImageIOService::save_download(result_handle, ".")?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): command-line interface, tracing subscriber and progress spinner
//! - `tracing-json`: JSON log output for the CLI
//! - `tracing-files`: log file output for the CLI
//!
//! ### Library-Only Usage
//!
//! ```toml
//! [dependencies]
//! gemini-bgremove = { version = "0.1", default-features = false }
//! ```

pub mod adapter;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod services;
pub mod session;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod view;

use tokio::io::AsyncRead;

// Public API exports
pub use adapter::{
    interpret_response, GeminiBackgroundRemover, GenerativeTransport, HttpTransport,
    RemoveBackground,
};
pub use config::{RemovalConfig, RemovalConfigBuilder};
pub use controller::{RemovalTask, SessionController};
pub use error::{BgRemovalError, ErrorKind, Result};
pub use services::{DataUrl, ImageIOService, DOWNLOAD_FILE_NAME};
pub use session::{
    RemovalOutcome, RemovalRequest, RequestTicket, Session, SessionState, SessionStatus,
    SourceImage, Transition,
};
pub use view::{render, Action, ImagePanel, Screen, ViewModel};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, spans, TracingConfig, TracingFormat, TracingOutput};

/// Remove the background of an image held in memory
///
/// One-shot helper for callers that do not need a session.
///
/// # Examples
///
/// ```rust,no_run
/// use gemini_bgremove::{remove_background_from_bytes, RemovalConfig};
///
/// # async fn example(upload_bytes: Vec<u8>) -> anyhow::Result<()> {
/// let config = RemovalConfig::from_env()?;
/// let result = remove_background_from_bytes(&upload_bytes, "image/jpeg", &config).await?;
/// let png_bytes = result.decode()?;
/// # Ok(())
/// # }
/// ```
pub async fn remove_background_from_bytes(
    image_bytes: &[u8],
    mime_type: &str,
    config: &RemovalConfig,
) -> Result<DataUrl> {
    let remover = GeminiBackgroundRemover::new(config.clone())?;
    remover.remove_background(image_bytes, mime_type).await
}

/// Remove the background of an image read from an async stream
///
/// The MIME type is sniffed from the content.
pub async fn remove_background_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    config: &RemovalConfig,
) -> Result<DataUrl> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer).await?;

    let mime_type = image::guess_format(&buffer)
        .map(|format| format.to_mime_type())
        .unwrap_or(services::FALLBACK_MIME_TYPE);

    remove_background_from_bytes(&buffer, mime_type, config).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bytes_api_reports_missing_credential() {
        let config = RemovalConfig::default();
        let err = remove_background_from_bytes(b"img", "image/png", &config)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_reader_api_reports_missing_credential() {
        let reader = std::io::Cursor::new(vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
        let err = remove_background_from_reader(reader, &RemovalConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, BgRemovalError::MissingCredential(_)));
    }
}
