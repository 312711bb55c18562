//! Polling waits on the rendered page

use scraper::{Html, Selector};
use std::time::Duration;
use tokio::time::Instant;
use tracing::trace;

use crate::session::{RenderingSession, SessionError};

/// The page as last observed by a wait
#[derive(Debug, Clone)]
pub(crate) struct Settled {
    /// Rendered markup
    pub source: String,

    /// Number of elements matching the watched selector
    pub count: usize,
}

/// Count the elements of `source` matching `selector`
pub(crate) fn count_matches(source: &str, selector: &Selector) -> usize {
    Html::parse_document(source).select(selector).count()
}

/// Poll the page until more than `previous` elements match `selector`, or
/// until `timeout` elapses. Returns the last observed page either way; the
/// caller decides whether a page that did not grow is acceptable.
pub(crate) async fn wait_for_growth<S>(
    session: &mut S,
    selector: &Selector,
    previous: usize,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<Settled, SessionError>
where
    S: RenderingSession + ?Sized,
{
    let deadline = Instant::now() + timeout;
    loop {
        let source = session.page_source().await?;
        let count = count_matches(&source, selector);
        if count > previous || Instant::now() >= deadline {
            return Ok(Settled { source, count });
        }
        trace!(count, previous, "Waiting for page to grow");
        tokio::time::sleep(poll_interval).await;
    }
}
