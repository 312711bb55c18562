//! # Rendering Session Module
//!
//! The rendering session is the browser the harvest drives: it loads a
//! listing, hands back the rendered markup, and clicks controls on the page.
//! The [`RenderingSession`] trait is the seam between the harvest logic and
//! the browser; [`WebDriverSession`] talks to a real browser over WebDriver
//! and [`ScriptedSession`] replays canned pages.

mod error;
mod scripted;
mod webdriver;

pub use error::SessionError;
pub use scripted::{ScriptedPage, ScriptedSession};
pub use webdriver::WebDriverSession;

use async_trait::async_trait;
use std::fmt;

/// How an element on the rendered page is located
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Element id, without the leading `#`
    Id(String),

    /// CSS selector
    Css(String),
}

impl Locator {
    pub fn id(id: impl Into<String>) -> Self {
        Locator::Id(id.into())
    }

    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "#{id}"),
            Locator::Css(selector) => f.write_str(selector),
        }
    }
}

/// Outcome of trying to click a control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Activation {
    /// The control was found and clicked
    Activated,

    /// The control is absent or cannot be interacted with
    Unavailable(String),
}

/// A browser-like session that renders pages and interacts with them
#[async_trait]
pub trait RenderingSession: Send {
    /// Load `url`, replacing the current page
    async fn goto(&mut self, url: &str) -> Result<(), SessionError>;

    /// The current rendered markup of the page
    async fn page_source(&mut self) -> Result<String, SessionError>;

    /// Locate an element and click it.
    ///
    /// A missing or non-interactable element is reported as
    /// [`Activation::Unavailable`]; any other failure is an error.
    async fn activate(&mut self, locator: &Locator) -> Result<Activation, SessionError>;

    /// Terminate the session. Later calls fail with [`SessionError::Closed`].
    async fn close(&mut self) -> Result<(), SessionError>;
}
