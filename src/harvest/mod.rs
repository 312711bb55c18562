//! # Harvest Orchestration Module
//!
//! Runs a whole harvest: dismisses the cookie banner once, then processes
//! each category in turn (paginate, extract, write) and reports what
//! happened. The [`Harvester`] owns the rendering session for the whole run
//! and closes it when the run ends, whatever the outcome of individual
//! categories.
//!
//! Failure isolation follows three levels:
//!
//! - a malformed product is skipped and recorded in its category report
//! - a navigation failure, timeout or write failure aborts its category only
//! - nothing short of a failed session start stops the run

mod error;
mod summary;

pub use error::HarvestError;
pub use summary::{CategoryReport, RunSummary, SkippedProduct};

use chrono::Utc;
use std::path::PathBuf;
use tracing::{error, info, instrument, warn};

use crate::catalog::CategoryPage;
use crate::config::HarvestConfig;
use crate::extract::{ProductSelectors, compile_selector, extract_all};
use crate::output::write_products;
use crate::pager::ProductPager;
use crate::session::{Activation, Locator, RenderingSession, WebDriverSession};

/// What a successfully processed category produced
#[derive(Debug, Clone)]
pub struct CategoryOutcome {
    /// Pagination steps taken
    pub steps: usize,

    /// Product elements found
    pub found: usize,

    /// Rows written to the output file
    pub written: usize,

    /// Products that could not be extracted
    pub skipped: Vec<SkippedProduct>,

    /// Output file
    pub output: PathBuf,
}

/// Runs harvests over an exclusively owned rendering session
pub struct Harvester<S: RenderingSession> {
    session: S,
    config: HarvestConfig,
    selectors: ProductSelectors,
}

impl<S: RenderingSession> Harvester<S> {
    pub fn new(session: S, config: HarvestConfig) -> Result<Self, HarvestError> {
        Ok(Self::with_selectors(session, config, ProductSelectors::new()?))
    }

    pub fn with_selectors(session: S, config: HarvestConfig, selectors: ProductSelectors) -> Self {
        Self {
            session,
            config,
            selectors,
        }
    }

    pub fn config(&self) -> &HarvestConfig {
        &self.config
    }

    /// Load the base listing and click the cookie consent button if present.
    ///
    /// The banner is optional, so every failure here is logged and ignored.
    pub async fn dismiss_cookie_banner(&mut self) {
        if let Err(e) = self.session.goto(&self.config.base_url).await {
            info!("Could not load base listing for cookie banner: {}", e);
            return;
        }
        let button = Locator::id(self.config.cookie_button_id.clone());
        match self.session.activate(&button).await {
            Ok(Activation::Activated) => info!("Dismissed cookie banner"),
            Ok(Activation::Unavailable(reason)) => info!("No cookie banner found: {}", reason),
            Err(e) => info!("Could not dismiss cookie banner: {}", e),
        }
    }

    /// Process one category under the configured time limit
    #[instrument(skip(self, page), fields(category = %page.name))]
    pub async fn run_category(
        &mut self,
        page: &CategoryPage,
    ) -> Result<CategoryOutcome, HarvestError> {
        let limit = self.config.category_timeout();
        match tokio::time::timeout(limit, self.harvest_category(page)).await {
            Ok(result) => result,
            Err(_) => Err(HarvestError::Timeout {
                category: page.name.clone(),
                after: limit,
            }),
        }
    }

    async fn harvest_category(
        &mut self,
        page: &CategoryPage,
    ) -> Result<CategoryOutcome, HarvestError> {
        let pagination = ProductPager::new(&mut self.session, &self.config)?
            .collect(&page.url)
            .await?;

        let extraction = extract_all(&page.name, &pagination.fragments, &self.selectors);
        let output = self.config.output_dir.join(&page.filename);
        let written = write_products(&output, &extraction.products)?;

        let skipped: Vec<SkippedProduct> = extraction
            .failures
            .into_iter()
            .map(SkippedProduct::from)
            .collect();
        info!(
            found = pagination.fragments.len(),
            written,
            skipped = skipped.len(),
            output = %output.display(),
            "Category done"
        );

        Ok(CategoryOutcome {
            steps: pagination.steps,
            found: pagination.fragments.len(),
            written,
            skipped,
            output,
        })
    }

    /// Run every page in order and close the session afterwards.
    ///
    /// `on_category` is called with each report as soon as its category
    /// finishes.
    pub async fn run<F>(mut self, pages: &[CategoryPage], mut on_category: F) -> RunSummary
    where
        F: FnMut(&CategoryReport),
    {
        let started_at = Utc::now();
        let limit = self.config.category_timeout();
        if tokio::time::timeout(limit, self.dismiss_cookie_banner())
            .await
            .is_err()
        {
            info!("Cookie banner dismissal timed out");
        }

        let mut categories = Vec::with_capacity(pages.len());
        for page in pages {
            let report = match self.run_category(page).await {
                Ok(outcome) => CategoryReport::completed(page, outcome),
                Err(e) => {
                    error!(category = %page.name, "Category failed: {}", e);
                    CategoryReport::failed(page, &e)
                }
            };
            on_category(&report);
            categories.push(report);
        }

        if let Err(e) = self.session.close().await {
            warn!("Failed to close rendering session: {}", e);
        }

        RunSummary {
            started_at,
            finished_at: Utc::now(),
            categories,
        }
    }
}

/// Open a WebDriver session and harvest `pages` with it.
///
/// Everything that can fail before the session exists is checked first, so
/// once the browser is started it is always closed by [`Harvester::run`].
pub async fn harvest_with_webdriver<F>(
    config: HarvestConfig,
    pages: &[CategoryPage],
    on_category: F,
) -> crate::Result<RunSummary>
where
    F: FnMut(&CategoryReport),
{
    let selectors = ProductSelectors::new()?;
    compile_selector(&config.product_selector)?;

    let session = WebDriverSession::connect(&config.webdriver_url, config.headless).await?;
    let harvester = Harvester::with_selectors(session, config, selectors);
    Ok(harvester.run(pages, on_category).await)
}
