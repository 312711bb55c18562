//! # Listing Pagination Module
//!
//! Walks a category listing through its "load more" control and collects
//! every product element the listing reveals. Each pagination step appends
//! only the elements beyond those already collected, so the result is in
//! display order with no duplicates.
//!
//! Running out of pages is signalled by the control disappearing (or no
//! longer being clickable) and ends the walk normally. Any other session
//! failure aborts the category with a navigation error.

mod wait;

use scraper::{Html, Selector};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::config::HarvestConfig;
use crate::extract::{ProductFragment, compile_selector};
use crate::harvest::HarvestError;
use crate::session::{Activation, Locator, RenderingSession, SessionError};
use wait::wait_for_growth;

/// Everything a category listing revealed
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    /// Product elements in display order
    pub fragments: Vec<ProductFragment>,

    /// Number of listing states read, the first render included
    pub steps: usize,
}

/// Drives a rendering session through a category's pagination
pub struct ProductPager<'a, S: RenderingSession + ?Sized> {
    session: &'a mut S,
    product_selector: Selector,
    load_more: Locator,
    poll_interval: Duration,
    settle_timeout: Duration,
    max_steps: usize,
}

impl<'a, S: RenderingSession + ?Sized> ProductPager<'a, S> {
    pub fn new(session: &'a mut S, config: &HarvestConfig) -> Result<Self, HarvestError> {
        Ok(Self {
            session,
            product_selector: compile_selector(&config.product_selector)?,
            load_more: Locator::css(config.load_more_selector.clone()),
            poll_interval: config.poll_interval(),
            settle_timeout: config.settle_timeout(),
            max_steps: config.max_steps.max(1),
        })
    }

    /// Load `url` and collect its product elements across all pagination steps
    #[instrument(skip(self))]
    pub async fn collect(&mut self, url: &str) -> Result<Pagination, HarvestError> {
        let navigation = |source: SessionError| HarvestError::Navigation {
            url: url.to_string(),
            source,
        };

        self.session.goto(url).await.map_err(navigation)?;
        let mut settled = wait_for_growth(
            &mut *self.session,
            &self.product_selector,
            0,
            self.poll_interval,
            self.settle_timeout,
        )
        .await
        .map_err(navigation)?;
        if settled.count == 0 {
            warn!("No products appeared on the listing");
        }

        let mut pagination = Pagination::default();
        loop {
            pagination.steps += 1;
            let revealed = new_fragments(
                &settled.source,
                &self.product_selector,
                pagination.fragments.len(),
            );
            debug!(step = pagination.steps, revealed = revealed.len(), "Collected products");
            pagination.fragments.extend(revealed);

            if pagination.steps >= self.max_steps {
                warn!(max_steps = self.max_steps, "Stopping pagination at step limit");
                break;
            }

            match self.session.activate(&self.load_more).await.map_err(navigation)? {
                Activation::Activated => {}
                Activation::Unavailable(reason) => {
                    debug!(%reason, "No more pages");
                    break;
                }
            }

            settled = wait_for_growth(
                &mut *self.session,
                &self.product_selector,
                pagination.fragments.len(),
                self.poll_interval,
                self.settle_timeout,
            )
            .await
            .map_err(navigation)?;
            if settled.count <= pagination.fragments.len() {
                warn!(
                    step = pagination.steps,
                    "Listing did not grow after loading more; stopping"
                );
                break;
            }
        }

        info!(
            steps = pagination.steps,
            products = pagination.fragments.len(),
            "Pagination finished"
        );
        Ok(pagination)
    }
}

/// Product elements of `source` past the first `already_seen`, in document order
fn new_fragments(source: &str, selector: &Selector, already_seen: usize) -> Vec<ProductFragment> {
    Html::parse_document(source)
        .select(selector)
        .enumerate()
        .skip(already_seen)
        .map(|(index, element)| ProductFragment::new(index, element.html()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ScriptedPage, ScriptedSession};

    const MORE: &str = r#"<a class="btn btn-default">More</a>"#;
    const URL: &str = "http://shop/laptops";

    fn items(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!(r#"<div class="thumbnail"><a class="title">Item {i}</a></div>"#))
            .collect()
    }

    fn config() -> HarvestConfig {
        HarvestConfig::builder()
            .poll_interval_ms(1)
            .settle_timeout_ms(50)
            .build()
    }

    #[tokio::test]
    async fn test_collects_every_product_once_in_order() {
        let mut session = ScriptedSession::new();
        session
            .add_page(URL, ScriptedPage::paginated(&items(7), 3, MORE))
            .await;

        let config = config();
        let pagination = ProductPager::new(&mut session, &config)
            .unwrap()
            .collect(URL)
            .await
            .unwrap();

        assert_eq!(pagination.steps, 3);
        assert_eq!(pagination.fragments.len(), 7);
        for (i, fragment) in pagination.fragments.iter().enumerate() {
            assert_eq!(fragment.index, i);
            assert!(fragment.html.contains(&format!("Item {i}<")));
        }
        assert_eq!(session.clicks().await, 2);
    }

    #[tokio::test]
    async fn test_single_step_without_load_more() {
        let mut session = ScriptedSession::new();
        session
            .add_page(URL, ScriptedPage::paginated(&items(4), 10, MORE))
            .await;

        let config = config();
        let pagination = ProductPager::new(&mut session, &config)
            .unwrap()
            .collect(URL)
            .await
            .unwrap();

        assert_eq!(pagination.steps, 1);
        assert_eq!(pagination.fragments.len(), 4);
        assert_eq!(session.clicks().await, 0);
    }

    #[tokio::test]
    async fn test_empty_listing_yields_nothing() {
        let mut session = ScriptedSession::new();
        session
            .add_page(URL, ScriptedPage::paginated(&[], 3, MORE))
            .await;

        let config = config();
        let pagination = ProductPager::new(&mut session, &config)
            .unwrap()
            .collect(URL)
            .await
            .unwrap();

        assert_eq!(pagination.steps, 1);
        assert!(pagination.fragments.is_empty());
    }

    #[tokio::test]
    async fn test_stalled_listing_stops() {
        let first = format!("<html><body>{}{MORE}</body></html>", items(2).concat());
        let mut session = ScriptedSession::new();
        // Clicking "more" re-renders the same two products
        session
            .add_page(URL, ScriptedPage::new(vec![first.clone(), first]))
            .await;

        let config = config();
        let pagination = ProductPager::new(&mut session, &config)
            .unwrap()
            .collect(URL)
            .await
            .unwrap();

        assert_eq!(pagination.steps, 1);
        assert_eq!(pagination.fragments.len(), 2);
    }

    #[tokio::test]
    async fn test_step_limit() {
        let mut session = ScriptedSession::new();
        session
            .add_page(URL, ScriptedPage::paginated(&items(10), 2, MORE))
            .await;

        let config = HarvestConfig::builder()
            .poll_interval_ms(1)
            .settle_timeout_ms(50)
            .max_steps(2)
            .build();
        let pagination = ProductPager::new(&mut session, &config)
            .unwrap()
            .collect(URL)
            .await
            .unwrap();

        assert_eq!(pagination.steps, 2);
        assert_eq!(pagination.fragments.len(), 4);
    }

    #[tokio::test]
    async fn test_navigation_failure_is_surfaced() {
        let mut session = ScriptedSession::new();
        session.fail_on(URL).await;

        let config = config();
        let err = ProductPager::new(&mut session, &config)
            .unwrap()
            .collect(URL)
            .await
            .unwrap_err();

        match err {
            HarvestError::Navigation { url, source } => {
                assert_eq!(url, URL);
                assert!(matches!(source, SessionError::Navigation { .. }));
            }
            other => panic!("Expected Navigation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_more_failure_is_surfaced() {
        let mut session = ScriptedSession::new();
        session
            .add_page(URL, ScriptedPage::paginated(&items(4), 3, MORE))
            .await;

        let config = HarvestConfig::builder()
            .poll_interval_ms(1)
            .settle_timeout_ms(50)
            .load_more_selector("div[")
            .build();
        let err = ProductPager::new(&mut session, &config)
            .unwrap()
            .collect(URL)
            .await
            .unwrap_err();

        match err {
            HarvestError::Navigation { url, source } => {
                assert_eq!(url, URL);
                assert!(matches!(source, SessionError::InvalidLocator { .. }));
            }
            other => panic!("Expected Navigation error, got {other:?}"),
        }
        assert_eq!(session.clicks().await, 0);
    }

    #[test]
    fn test_invalid_product_selector() {
        let mut session = ScriptedSession::new();
        let config = HarvestConfig::builder().product_selector("div[").build();

        assert!(matches!(
            ProductPager::new(&mut session, &config),
            Err(HarvestError::Selector(_))
        ));
    }

    #[test]
    fn test_new_fragments_skips_seen() {
        let selector = Selector::parse(".thumbnail").unwrap();
        let source = items(5).concat();

        let fragments = new_fragments(&source, &selector, 3);

        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].index, 3);
        assert!(fragments[1].html.contains("Item 4"));
    }
}
