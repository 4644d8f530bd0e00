//! Presentation model derived from a session
//!
//! [`render`] is a pure function of the session state. Frontends draw the
//! returned [`ViewModel`] and map the user's chosen [`Action`] back to a
//! session event.

use crate::{
    services::{encoding::DataUrl, io::DOWNLOAD_FILE_NAME},
    session::{Session, SessionState},
};
use serde::Serialize;

pub const APP_TITLE: &str = "AI Background Remover";
pub const APP_SUBTITLE: &str = "Upload an image to magically remove the background in seconds.";
pub const FOOTER: &str = "Powered by Gemini API";
pub const LOADER_TEXT: &str = "AI is working its magic...";
pub const ERROR_HEADING: &str = "An Error Occurred";

/// One image shown to the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePanel {
    pub title: &'static str,
    pub alt: &'static str,
    pub src: DataUrl,
    /// Draw a checkerboard behind the image so transparency is visible
    pub checkerboard: bool,
}

/// Something the user can do from the current screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    RemoveBackground,
    ChooseDifferentImage,
    TryAgain,
    Download { file_name: &'static str, href: DataUrl },
    StartOver,
}

impl Action {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::RemoveBackground => "Remove Background",
            Self::ChooseDifferentImage => "Choose a different image",
            Self::TryAgain => "Try Again",
            Self::Download { .. } => "Download Image",
            Self::StartOver => "Start Over",
        }
    }

    /// Whether triggering this action resets the session
    #[must_use]
    pub fn resets_session(&self) -> bool {
        matches!(
            self,
            Self::ChooseDifferentImage | Self::TryAgain | Self::StartOver
        )
    }
}

/// Main area of the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum Screen {
    Uploader,
    Preview {
        image: ImagePanel,
        actions: Vec<Action>,
    },
    Processing {
        loader_text: &'static str,
    },
    Result {
        original: ImagePanel,
        result: ImagePanel,
        actions: Vec<Action>,
    },
    Error {
        heading: &'static str,
        message: String,
        actions: Vec<Action>,
    },
}

impl Screen {
    /// Actions offered on this screen
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        match self {
            Self::Preview { actions, .. }
            | Self::Result { actions, .. }
            | Self::Error { actions, .. } => actions.as_slice(),
            Self::Uploader | Self::Processing { .. } => &[][..],
        }
    }
}

/// Everything a frontend needs to draw the page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewModel {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub screen: Screen,
    pub footer: &'static str,
}

impl ViewModel {
    /// Whether the busy overlay should be shown
    #[must_use]
    pub fn is_busy(&self) -> bool {
        matches!(self.screen, Screen::Processing { .. })
    }
}

/// Derive the view for the current session state
#[must_use]
pub fn render(session: &Session) -> ViewModel {
    let screen = match session.state() {
        SessionState::Idle => Screen::Uploader,
        SessionState::Selected { source_handle, .. } => Screen::Preview {
            image: ImagePanel {
                title: "Your Image",
                alt: "Original",
                src: source_handle.clone(),
                checkerboard: false,
            },
            actions: vec![Action::RemoveBackground, Action::ChooseDifferentImage],
        },
        SessionState::Processing { .. } => Screen::Processing {
            loader_text: LOADER_TEXT,
        },
        SessionState::Succeeded {
            source_handle,
            result_handle,
            ..
        } => Screen::Result {
            original: ImagePanel {
                title: "Original",
                alt: "Original",
                src: source_handle.clone(),
                checkerboard: false,
            },
            result: ImagePanel {
                title: "Result",
                alt: "Background Removed",
                src: result_handle.clone(),
                checkerboard: true,
            },
            actions: vec![
                Action::Download {
                    file_name: DOWNLOAD_FILE_NAME,
                    href: result_handle.clone(),
                },
                Action::StartOver,
            ],
        },
        SessionState::Failed { message, .. } => Screen::Error {
            heading: ERROR_HEADING,
            message: message.clone(),
            actions: vec![Action::TryAgain],
        },
    };

    ViewModel {
        title: APP_TITLE,
        subtitle: APP_SUBTITLE,
        screen,
        footer: FOOTER,
    }
}
