//! Background-removal adapter
//!
//! Translates local image bytes into one Gemini `generateContent` call and the
//! response back into a PNG data URL or a descriptive error.

pub mod test_utils;
pub mod transport;
pub mod wire;

use crate::{
    config::{RemovalConfig, API_KEY_ENV},
    error::{BgRemovalError, Result},
    services::encoding::{encode_base64, DataUrl, RESULT_MIME_TYPE},
};
use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};

pub use transport::{GenerativeTransport, HttpTransport};
pub use wire::{
    Candidate, Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Modality, Part,
};

/// Anything that can turn an image into a background-free PNG data URL
#[async_trait]
pub trait RemoveBackground: Send + Sync {
    /// Remove the background of `image`, declared as `mime_type`
    ///
    /// # Errors
    /// - Missing credential (before any network I/O)
    /// - Model answered with text or with nothing
    /// - Transport failures
    async fn remove_background(&self, image: &[u8], mime_type: &str) -> Result<DataUrl>;
}

/// Gemini-backed [`RemoveBackground`] implementation
pub struct GeminiBackgroundRemover<T: GenerativeTransport = HttpTransport> {
    config: RemovalConfig,
    transport: T,
}

impl<T: GenerativeTransport> std::fmt::Debug for GeminiBackgroundRemover<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiBackgroundRemover")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl GeminiBackgroundRemover<HttpTransport> {
    /// Create a remover that talks to the configured HTTP endpoint
    ///
    /// # Errors
    /// - Invalid configuration
    /// - Failed to create HTTP client
    pub fn new(config: RemovalConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;
        Ok(Self { config, transport })
    }
}

impl<T: GenerativeTransport> GeminiBackgroundRemover<T> {
    /// Create a remover over a custom transport
    pub fn with_transport(config: RemovalConfig, transport: T) -> Self {
        Self { config, transport }
    }

    #[must_use]
    pub fn config(&self) -> &RemovalConfig {
        &self.config
    }

    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Build the single request sent for `image`
    #[must_use]
    pub fn build_request(&self, image: &[u8], mime_type: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: None,
                parts: vec![
                    Part::inline_data(mime_type, encode_base64(image)),
                    Part::text(self.config.instruction.as_str()),
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_modalities: vec![Modality::Image, Modality::Text],
            }),
        }
    }
}

/// Turn a model response into the result data URL or a descriptive error
///
/// The first inline-data part wins and is always labeled `image/png`,
/// whatever MIME type the part declares.
pub fn interpret_response(response: &GenerateContentResponse) -> Result<DataUrl> {
    if let Some(inline) = response.first_inline_data() {
        if !inline.mime_type.is_empty() && inline.mime_type != RESULT_MIME_TYPE {
            warn!(
                declared = %inline.mime_type,
                "Model returned a non-PNG image part; labeling it as PNG"
            );
        }
        return Ok(DataUrl::png(inline.data.as_str()));
    }

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        warn!(block_reason = %reason, "Prompt was blocked by the model");
    }

    match response.text() {
        Some(text) => Err(BgRemovalError::model_rejection(text)),
        None => Err(BgRemovalError::EmptyResponse),
    }
}

#[async_trait]
impl<T: GenerativeTransport> RemoveBackground for GeminiBackgroundRemover<T> {
    #[instrument(skip_all, fields(mime_type = %mime_type, bytes = image.len()))]
    async fn remove_background(&self, image: &[u8], mime_type: &str) -> Result<DataUrl> {
        let api_key = self
            .config
            .credential()
            .ok_or_else(|| BgRemovalError::missing_credential(API_KEY_ENV))?;

        let request = self.build_request(image, mime_type);
        debug!("Requesting background removal");

        let response = self.transport.generate_content(api_key, &request).await?;

        if let Some(usage) = &response.usage_metadata {
            debug!(
                prompt_tokens = ?usage.prompt_token_count,
                candidate_tokens = ?usage.candidates_token_count,
                total_tokens = ?usage.total_token_count,
                "Gemini usage"
            );
        }

        let result = interpret_response(&response);
        match &result {
            Ok(url) => info!(payload_len = url.payload().len(), "Background removed"),
            Err(e) => warn!(error = %e, "Background removal failed"),
        }
        result
    }
}
