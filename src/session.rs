//! Session state machine
//!
//! One session covers one interaction: an image is selected, its background
//! removal is requested, and the outcome is shown until the user resets or
//! selects another image.
//!
//! Each state variant carries exactly the data that is valid in it, so a
//! result handle only exists in `Succeeded` and an error message only in
//! `Failed`. Every transition that starts, abandons or supersedes a removal
//! bumps a generation counter; outcomes carry the [`RequestTicket`] they were
//! issued with and are dropped unless that ticket is still current.

use crate::services::encoding::DataUrl;
use std::sync::Arc;
use tracing::{debug, trace};

/// Image bytes selected by the user, with their declared MIME type
#[derive(Clone, PartialEq, Eq)]
pub struct SourceImage {
    bytes: Arc<[u8]>,
    mime_type: String,
    file_name: Option<String>,
}

impl std::fmt::Debug for SourceImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SourceImage")
            .field("bytes", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .field("file_name", &self.file_name)
            .finish()
    }
}

impl SourceImage {
    pub fn new<B: Into<Arc<[u8]>>, M: Into<String>>(bytes: B, mime_type: M) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            file_name: None,
        }
    }

    #[must_use]
    pub fn with_file_name(mut self, file_name: Option<String>) -> Self {
        self.file_name = file_name;
        self
    }

    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    #[must_use]
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Display-ready handle for this image
    #[must_use]
    pub fn to_handle(&self) -> DataUrl {
        DataUrl::from_bytes(&self.mime_type, &self.bytes)
    }
}

/// Status of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Idle,
    Selected,
    Processing,
    Succeeded,
    Failed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Selected => "selected",
            Self::Processing => "processing",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Identifies one removal request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    #[must_use]
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Everything the adapter needs for one removal
#[derive(Debug, Clone)]
pub struct RemovalRequest {
    pub ticket: RequestTicket,
    pub image: SourceImage,
}

/// Outcome of one removal as the session stores it
pub type RemovalOutcome = std::result::Result<DataUrl, String>;

/// State of a session together with the data valid in it
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Selected {
        source: SourceImage,
        source_handle: DataUrl,
    },
    Processing {
        source: SourceImage,
        source_handle: DataUrl,
        ticket: RequestTicket,
    },
    Succeeded {
        source: SourceImage,
        source_handle: DataUrl,
        result_handle: DataUrl,
    },
    Failed {
        source: SourceImage,
        source_handle: DataUrl,
        message: String,
    },
}

impl SessionState {
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        match self {
            Self::Idle => SessionStatus::Idle,
            Self::Selected { .. } => SessionStatus::Selected,
            Self::Processing { .. } => SessionStatus::Processing,
            Self::Succeeded { .. } => SessionStatus::Succeeded,
            Self::Failed { .. } => SessionStatus::Failed,
        }
    }
}

/// Result of feeding an event to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The event changed the state
    Applied {
        from: SessionStatus,
        to: SessionStatus,
    },
    /// The event is not valid in the current state, or its ticket is stale
    Ignored { status: SessionStatus },
}

impl Transition {
    #[must_use]
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied { .. })
    }

    /// Status after the event
    #[must_use]
    pub fn status(self) -> SessionStatus {
        match self {
            Self::Applied { to, .. } => to,
            Self::Ignored { status } => status,
        }
    }
}

/// The single mutable entity of an interaction
#[derive(Debug, Clone, Default)]
pub struct Session {
    state: SessionState,
    generation: u64,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.state.status()
    }

    /// Current generation; every ticket older than this is stale
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn source_image(&self) -> Option<&SourceImage> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Selected { source, .. }
            | SessionState::Processing { source, .. }
            | SessionState::Succeeded { source, .. }
            | SessionState::Failed { source, .. } => Some(source),
        }
    }

    #[must_use]
    pub fn source_handle(&self) -> Option<&DataUrl> {
        match &self.state {
            SessionState::Idle => None,
            SessionState::Selected { source_handle, .. }
            | SessionState::Processing { source_handle, .. }
            | SessionState::Succeeded { source_handle, .. }
            | SessionState::Failed { source_handle, .. } => Some(source_handle),
        }
    }

    #[must_use]
    pub fn result_handle(&self) -> Option<&DataUrl> {
        match &self.state {
            SessionState::Succeeded { result_handle, .. } => Some(result_handle),
            _ => None,
        }
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        match &self.state {
            SessionState::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Ticket of the request in flight, if any
    #[must_use]
    pub fn pending_ticket(&self) -> Option<RequestTicket> {
        match &self.state {
            SessionState::Processing { ticket, .. } => Some(*ticket),
            _ => None,
        }
    }

    /// Select a new image, replacing whatever the session held
    ///
    /// Ignored while a removal is in flight.
    pub fn select_image(&mut self, image: SourceImage) -> Transition {
        let from = self.status();
        if from == SessionStatus::Processing {
            debug!("Ignoring image selection while processing");
            return Transition::Ignored { status: from };
        }

        self.generation += 1;
        let source_handle = image.to_handle();
        trace!(
            mime_type = %image.mime_type(),
            bytes = image.bytes().len(),
            generation = self.generation,
            "Image selected"
        );
        self.state = SessionState::Selected {
            source: image,
            source_handle,
        };
        self.applied(from)
    }

    /// Start a removal for the selected image
    ///
    /// Only valid in `Selected`; returns `None` (and changes nothing)
    /// otherwise, which makes a second request while processing a no-op.
    pub fn begin_removal(&mut self) -> Option<RemovalRequest> {
        let (source, source_handle) = match std::mem::take(&mut self.state) {
            SessionState::Selected {
                source,
                source_handle,
            } => (source, source_handle),
            other => {
                debug!(status = %other.status(), "Ignoring removal request");
                self.state = other;
                return None;
            },
        };

        self.generation += 1;
        let ticket = RequestTicket(self.generation);
        debug!(generation = ticket.generation(), "Removal requested");
        self.state = SessionState::Processing {
            source: source.clone(),
            source_handle,
            ticket,
        };

        Some(RemovalRequest {
            ticket,
            image: source,
        })
    }

    /// Apply the outcome of the request identified by `ticket`
    ///
    /// Outcomes for anything but the request in flight are ignored.
    pub fn complete(&mut self, ticket: RequestTicket, outcome: RemovalOutcome) -> Transition {
        let from = self.status();
        if self.pending_ticket() != Some(ticket) {
            debug!(
                generation = ticket.generation(),
                current = self.generation,
                status = %from,
                "Dropping stale removal outcome"
            );
            return Transition::Ignored { status: from };
        }

        let (source, source_handle) = match std::mem::take(&mut self.state) {
            SessionState::Processing {
                source,
                source_handle,
                ..
            } => (source, source_handle),
            other => {
                self.state = other;
                return Transition::Ignored { status: from };
            },
        };

        self.state = match outcome {
            Ok(result_handle) => SessionState::Succeeded {
                source,
                source_handle,
                result_handle,
            },
            Err(message) => SessionState::Failed {
                source,
                source_handle,
                message,
            },
        };
        self.applied(from)
    }

    /// Return to `Idle`, dropping the image and every handle
    ///
    /// A request still in flight is abandoned: its outcome will be ignored.
    pub fn reset(&mut self) -> Transition {
        let from = self.status();
        if from == SessionStatus::Idle {
            return Transition::Ignored { status: from };
        }

        self.generation += 1;
        self.state = SessionState::Idle;
        self.applied(from)
    }

    fn applied(&self, from: SessionStatus) -> Transition {
        let to = self.status();
        debug!(%from, %to, "Session transition");
        Transition::Applied { from, to }
    }
}
