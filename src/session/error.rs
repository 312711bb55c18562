//! Error types for the session module

use crate::error::Error as CrateError;
use thiserror::Error;

/// Error type for rendering session operations
#[derive(Debug, Error)]
pub enum SessionError {
    /// The WebDriver session could not be created
    #[error("failed to start WebDriver session: {0}")]
    Connect(#[from] fantoccini::error::NewSessionError),

    /// A WebDriver command failed
    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// The session was used after `close`
    #[error("rendering session is closed")]
    Closed,

    /// Navigation to a location failed for a reason other than WebDriver
    #[error("navigation to {url} failed: {reason}")]
    Navigation {
        /// Target location
        url: String,
        /// What went wrong
        reason: String,
    },

    /// A locator that cannot be evaluated against the page
    #[error("invalid locator {locator}: {reason}")]
    InvalidLocator {
        /// The locator as written
        locator: String,
        /// Parser message
        reason: String,
    },
}

impl From<SessionError> for CrateError {
    fn from(err: SessionError) -> Self {
        CrateError::Session(err.to_string())
    }
}
