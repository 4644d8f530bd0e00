//! Test doubles for the adapter seams
//!
//! `MockTransport` stands in for the Gemini HTTP API and records every call;
//! `MockRemover` stands in for the whole adapter and can be held open until a
//! test releases it, which is how late-arriving outcomes are simulated.

use crate::{
    adapter::{
        transport::GenerativeTransport,
        wire::{GenerateContentRequest, GenerateContentResponse},
        RemoveBackground,
    },
    error::{BgRemovalError, Result},
    services::encoding::DataUrl,
};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// Scripted reply of a [`MockTransport`]
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Decoded response body
    Response(GenerateContentResponse),
    /// Non-success HTTP status
    Status { status: u16, message: String },
}

#[derive(Debug, Default)]
struct TransportState {
    replies: VecDeque<MockReply>,
    calls: Vec<(String, GenerateContentRequest)>,
}

/// Recording transport with scripted replies
///
/// Clones share state, so a test can keep one clone for inspection.
/// Without scripted replies it answers with an empty response.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<TransportState>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response
    #[must_use]
    pub fn with_response(self, response: GenerateContentResponse) -> Self {
        self.state
            .lock()
            .replies
            .push_back(MockReply::Response(response));
        self
    }

    /// Queue an HTTP error
    #[must_use]
    pub fn with_status(self, status: u16, message: &str) -> Self {
        self.state.lock().replies.push_back(MockReply::Status {
            status,
            message: message.to_string(),
        });
        self
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.state.lock().calls.len()
    }

    #[must_use]
    pub fn last_api_key(&self) -> Option<String> {
        self.state.lock().calls.last().map(|(key, _)| key.clone())
    }

    #[must_use]
    pub fn last_request(&self) -> Option<GenerateContentRequest> {
        self.state
            .lock()
            .calls
            .last()
            .map(|(_, request)| request.clone())
    }
}

#[async_trait]
impl GenerativeTransport for MockTransport {
    async fn generate_content(
        &self,
        api_key: &str,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let reply = {
            let mut state = self.state.lock();
            state.calls.push((api_key.to_string(), request.clone()));
            state.replies.pop_front()
        };

        match reply {
            Some(MockReply::Response(response)) => Ok(response),
            Some(MockReply::Status { status, message }) => {
                Err(BgRemovalError::Api { status, message })
            },
            None => Ok(GenerateContentResponse::default()),
        }
    }
}

/// Adapter double with a controllable completion gate
#[derive(Debug, Clone)]
pub struct MockRemover {
    outcome: std::result::Result<DataUrl, String>,
    gate: Option<Arc<Semaphore>>,
    calls: Arc<AtomicUsize>,
}

impl MockRemover {
    /// Remover that immediately succeeds with `result`
    #[must_use]
    pub fn succeeding(result: DataUrl) -> Self {
        Self {
            outcome: Ok(result),
            gate: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Remover that immediately fails as if the model answered with `text`
    #[must_use]
    pub fn rejecting(text: &str) -> Self {
        Self {
            outcome: Err(text.to_string()),
            gate: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Hold every call until [`MockRemover::release`] is called
    #[must_use]
    pub fn gated(mut self) -> Self {
        self.gate = Some(Arc::new(Semaphore::new(0)));
        self
    }

    /// Let one pending (or future) call complete
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.add_permits(1);
        }
    }

    #[must_use]
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoveBackground for MockRemover {
    async fn remove_background(&self, _image: &[u8], _mime_type: &str) -> Result<DataUrl> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(gate) = &self.gate {
            gate.acquire()
                .await
                .map_err(|e| BgRemovalError::internal(e.to_string()))?
                .forget();
        }

        match &self.outcome {
            Ok(url) => Ok(url.clone()),
            Err(text) => Err(BgRemovalError::model_rejection(text.as_str())),
        }
    }
}
