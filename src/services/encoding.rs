//! Data URL encoding service
//!
//! Images travel through the session as `data:<mime>;base64,<payload>` strings,
//! which are directly usable as an image source and as a download target.

use crate::error::{BgRemovalError, Result};
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Serialize};

/// MIME type used to label every removal result
pub const RESULT_MIME_TYPE: &str = "image/png";

/// Encode raw bytes as standard padded base64
#[must_use]
pub fn encode_base64(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Decode standard padded base64
pub fn decode_base64(payload: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(payload.trim())
        .map_err(|e| BgRemovalError::invalid_data_url(format!("payload is not valid base64: {}", e)))
}

/// A base64 data URL
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DataUrl {
    mime_type: String,
    payload: String,
}

impl DataUrl {
    /// Build a data URL by base64-encoding `bytes`
    #[must_use]
    pub fn from_bytes(mime_type: &str, bytes: &[u8]) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            payload: encode_base64(bytes),
        }
    }

    /// Wrap an already-encoded base64 payload verbatim
    #[must_use]
    pub fn from_base64<S: Into<String>>(mime_type: &str, payload: S) -> Self {
        Self {
            mime_type: mime_type.to_string(),
            payload: payload.into(),
        }
    }

    /// Wrap a model-returned payload as a PNG data URL
    #[must_use]
    pub fn png<S: Into<String>>(payload: S) -> Self {
        Self::from_base64(RESULT_MIME_TYPE, payload)
    }

    /// Parse a `data:<mime>;base64,<payload>` string
    pub fn parse(url: &str) -> Result<Self> {
        let rest = url
            .strip_prefix("data:")
            .ok_or_else(|| BgRemovalError::invalid_data_url("missing 'data:' scheme"))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| BgRemovalError::invalid_data_url("missing ',' separator"))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| BgRemovalError::invalid_data_url("only base64 data URLs are supported"))?;

        Ok(Self {
            mime_type: mime_type.to_string(),
            payload: payload.to_string(),
        })
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The base64 payload, exactly as stored
    #[must_use]
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Decode the payload back to raw bytes
    pub fn decode(&self) -> Result<Vec<u8>> {
        decode_base64(&self.payload)
    }

    /// Render as a URL string
    #[must_use]
    pub fn as_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.payload)
    }
}

impl std::fmt::Display for DataUrl {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "data:{};base64,{}", self.mime_type, self.payload)
    }
}

impl TryFrom<String> for DataUrl {
    type Error = BgRemovalError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<DataUrl> for String {
    fn from(url: DataUrl) -> Self {
        url.as_url()
    }
}
