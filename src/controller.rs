//! Session controller
//!
//! Owns a [`Session`] and drives removal requests on tokio tasks. The session
//! lock is never held across an `.await`; each task completes the session
//! with the ticket it was issued, so outcomes of abandoned requests are
//! dropped by the state machine instead of overwriting newer state.

use crate::{
    adapter::RemoveBackground,
    error::{BgRemovalError, Result},
    session::{RequestTicket, Session, SessionStatus, SourceImage, Transition},
    view::{render, ViewModel},
};
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// A removal running in the background
#[derive(Debug)]
pub struct RemovalTask {
    ticket: RequestTicket,
    handle: JoinHandle<Transition>,
}

impl RemovalTask {
    #[must_use]
    pub fn ticket(&self) -> RequestTicket {
        self.ticket
    }

    /// Wait until the adapter call has settled and its outcome was offered
    /// to the session
    ///
    /// # Errors
    /// - The task panicked or was aborted by runtime shutdown
    pub async fn settled(self) -> Result<Transition> {
        self.handle
            .await
            .map_err(|e| BgRemovalError::internal(format!("removal task failed: {}", e)))
    }
}

/// Drives one session against a background-removal adapter
pub struct SessionController<R> {
    session: Arc<Mutex<Session>>,
    remover: Arc<R>,
}

impl<R> Clone for SessionController<R> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            remover: Arc::clone(&self.remover),
        }
    }
}

impl<R> std::fmt::Debug for SessionController<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("session", &*self.session.lock())
            .finish_non_exhaustive()
    }
}

impl<R: RemoveBackground + 'static> SessionController<R> {
    pub fn new(remover: R) -> Self {
        Self::with_shared(Arc::new(remover))
    }

    pub fn with_shared(remover: Arc<R>) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::new())),
            remover,
        }
    }

    pub fn select_image(&self, image: SourceImage) -> Transition {
        self.session.lock().select_image(image)
    }

    /// Start background removal for the selected image
    ///
    /// Returns `None` when the session is not in `Selected`, e.g. because a
    /// removal is already running. Must be called inside a tokio runtime.
    pub fn request_removal(&self) -> Option<RemovalTask> {
        let request = self.session.lock().begin_removal()?;
        let ticket = request.ticket;
        info!(
            generation = ticket.generation(),
            mime_type = %request.image.mime_type(),
            "Starting background removal"
        );

        let session = Arc::clone(&self.session);
        let remover = Arc::clone(&self.remover);
        let handle = tokio::spawn(async move {
            let outcome = remover
                .remove_background(request.image.bytes(), request.image.mime_type())
                .await
                .map_err(|e| e.to_string());

            let transition = session.lock().complete(request.ticket, outcome);
            if !transition.is_applied() {
                warn!(
                    generation = request.ticket.generation(),
                    "Removal settled after the session moved on; outcome discarded"
                );
            }
            transition
        });

        Some(RemovalTask { ticket, handle })
    }

    pub fn reset(&self) -> Transition {
        self.session.lock().reset()
    }

    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.session.lock().status()
    }

    /// Render the current state
    #[must_use]
    pub fn view(&self) -> ViewModel {
        render(&self.session.lock())
    }

    /// Copy of the current session
    #[must_use]
    pub fn snapshot(&self) -> Session {
        self.session.lock().clone()
    }

    #[must_use]
    pub fn remover(&self) -> &R {
        &self.remover
    }
}
