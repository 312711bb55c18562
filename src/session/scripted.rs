//! A rendering session that replays canned pages
//!
//! Each URL maps to a sequence of rendered states. Navigating shows the
//! first state; every successful click on an element present in the
//! current state moves to the next one. Clicking an element that is not in
//! the current markup reports [`Activation::Unavailable`].

use async_trait::async_trait;
use scraper::{Html, Selector};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Mutex;

use super::{Activation, Locator, RenderingSession, SessionError};

/// The rendered states of one scripted URL
#[derive(Debug, Clone, Default)]
pub struct ScriptedPage {
    states: Vec<String>,
}

impl ScriptedPage {
    pub fn new(states: Vec<String>) -> Self {
        Self { states }
    }

    /// A listing that reveals `items` in batches of `batch_size`, with
    /// `load_more` markup appended while items remain hidden.
    pub fn paginated(items: &[String], batch_size: usize, load_more: &str) -> Self {
        let batch_size = batch_size.max(1);
        let batches = items.len().div_ceil(batch_size).max(1);
        let states = (1..=batches)
            .map(|shown| {
                let visible = items[..(shown * batch_size).min(items.len())].concat();
                let control = if shown < batches { load_more } else { "" };
                format!(
                    "<html><body><div class=\"row\">{visible}</div>{control}</body></html>"
                )
            })
            .collect();
        Self { states }
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }
}

#[derive(Debug, Default)]
struct ScriptState {
    pages: HashMap<String, ScriptedPage>,
    failing: HashSet<String>,
    current: Option<(String, usize)>,
    visits: Vec<String>,
    clicks: usize,
    closed: bool,
}

/// In-memory [`RenderingSession`]. Clones share the same state, so a test
/// can keep a handle to inspect the session after handing it off.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSession {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `page` at `url`
    pub async fn add_page(&self, url: impl Into<String>, page: ScriptedPage) {
        self.state.lock().await.pages.insert(url.into(), page);
    }

    /// Make navigation to `url` fail
    pub async fn fail_on(&self, url: impl Into<String>) {
        self.state.lock().await.failing.insert(url.into());
    }

    /// URLs navigated to, in order
    pub async fn visits(&self) -> Vec<String> {
        self.state.lock().await.visits.clone()
    }

    /// Number of successful clicks
    pub async fn clicks(&self) -> usize {
        self.state.lock().await.clicks
    }

    pub async fn is_closed(&self) -> bool {
        self.state.lock().await.closed
    }
}

fn contains_element(html: &str, locator: &Locator) -> Result<bool, SessionError> {
    let css = match locator {
        Locator::Id(id) => format!("[id=\"{id}\"]"),
        Locator::Css(selector) => selector.clone(),
    };
    let selector = Selector::parse(&css).map_err(|e| SessionError::InvalidLocator {
        locator: locator.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Html::parse_document(html).select(&selector).next().is_some())
}

#[async_trait]
impl RenderingSession for ScriptedSession {
    async fn goto(&mut self, url: &str) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(SessionError::Closed);
        }
        state.visits.push(url.to_string());
        if state.failing.contains(url) || !state.pages.contains_key(url) {
            return Err(SessionError::Navigation {
                url: url.to_string(),
                reason: "page not reachable".to_string(),
            });
        }
        state.current = Some((url.to_string(), 0));
        Ok(())
    }

    async fn page_source(&mut self) -> Result<String, SessionError> {
        let state = self.state.lock().await;
        if state.closed {
            return Err(SessionError::Closed);
        }
        let source = state
            .current
            .as_ref()
            .and_then(|(url, step)| state.pages.get(url).and_then(|p| p.states.get(*step)))
            .cloned()
            .unwrap_or_default();
        Ok(source)
    }

    async fn activate(&mut self, locator: &Locator) -> Result<Activation, SessionError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(SessionError::Closed);
        }
        let Some((url, step)) = state.current.clone() else {
            return Ok(Activation::Unavailable("no page loaded".to_string()));
        };
        let states_len = state.pages.get(&url).map_or(0, |p| p.states.len());
        let present = match state.pages.get(&url).and_then(|p| p.states.get(step)) {
            Some(html) => contains_element(html, locator)?,
            None => false,
        };
        if !present {
            return Ok(Activation::Unavailable(format!("no such element: {locator}")));
        }

        state.clicks += 1;
        if step + 1 < states_len {
            state.current = Some((url, step + 1));
        }
        Ok(Activation::Activated)
    }

    async fn close(&mut self) -> Result<(), SessionError> {
        let mut state = self.state.lock().await;
        if state.closed {
            return Err(SessionError::Closed);
        }
        state.closed = true;
        Ok(())
    }
}
