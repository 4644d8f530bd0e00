//! Transport seam between the adapter and the Gemini HTTP API

use crate::{
    adapter::wire::{GenerateContentRequest, GenerateContentResponse},
    config::RemovalConfig,
    error::{BgRemovalError, Result},
};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, error};

/// Header carrying the API credential
pub const API_KEY_HEADER: &str = "x-goog-api-key";

/// Sends one `generateContent` call and returns the decoded response
#[async_trait]
pub trait GenerativeTransport: Send + Sync {
    /// Issue exactly one request; no retries, no streaming
    ///
    /// # Errors
    /// - Network failures
    /// - Non-success HTTP status
    /// - Undecodable response body
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse>;
}

/// reqwest-backed transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    /// Create a transport for the configured endpoint and model
    ///
    /// # Errors
    /// - Failed to create HTTP client
    pub fn new(config: &RemovalConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            url: config.generate_content_url(),
        })
    }

    /// Target URL of every request
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl GenerativeTransport for HttpTransport {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        debug!(url = %self.url, "Sending generateContent request");

        let response = self
            .client
            .post(&self.url)
            .header(API_KEY_HEADER, api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(status = %status, body_len = body.len(), "generateContent response received");

        if !status.is_success() {
            error!(status = %status, "Gemini API returned an error");
            return Err(BgRemovalError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(error = %e, "Failed to decode generateContent response");
            BgRemovalError::parse(e.to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_url() {
        let config = RemovalConfig::builder()
            .endpoint("http://127.0.0.1:1/v1beta")
            .model("m")
            .build()
            .unwrap();
        let transport = HttpTransport::new(&config).unwrap();
        assert_eq!(
            transport.url(),
            "http://127.0.0.1:1/v1beta/models/m:generateContent"
        );
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_transport_error() {
        let config = RemovalConfig::builder()
            .endpoint("http://127.0.0.1:1")
            .timeout_secs(2)
            .build()
            .unwrap();
        let transport = HttpTransport::new(&config).unwrap();
        let request = GenerateContentRequest {
            contents: vec![],
            generation_config: None,
        };

        let err = transport
            .generate_content("key", &request)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), crate::error::ErrorKind::Transport);
    }
}
