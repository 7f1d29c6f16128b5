//! Presentation state for the app's screens. Nothing here draws; each screen
//! holds its form state and turns user actions into service calls and
//! [`Alert`]s for whatever front end presents them.

pub mod auth;
pub mod mood_capture;
pub mod tabs;

pub use auth::AuthScreen;
pub use mood_capture::{MoodCapture, ShareDestination};
pub use tabs::{Surface, Tab};

/// A modal message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: &'static str,
    pub message: String,
}

impl Alert {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            title: "Error",
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            title: "Success",
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.title == "Error"
    }
}
