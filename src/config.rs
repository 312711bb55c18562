//! # Harvest Configuration Module
//!
//! Configuration for a harvest run: where the site lives, how to reach the
//! WebDriver server, which selectors identify products and the pagination
//! control, and how long to wait for the page to settle. Built with the
//! same builder pattern used across the crate.
//!
//! ## Key Components
//!
//! - `HarvestConfig`: the run configuration
//! - `HarvestConfigBuilder`: fluent builder over the defaults

use std::path::PathBuf;
use std::time::Duration;

/// Listing page of the demo shop that exposes a "load more" button.
pub const DEFAULT_BASE_URL: &str = "https://webscraper.io/test-sites/e-commerce/more/";

/// chromedriver's default listen address.
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Configuration for a harvest run
#[derive(Debug, Clone)]
pub struct HarvestConfig {
    /// Base listing URL; category URLs are resolved against it
    pub base_url: String,

    /// WebDriver server to open the rendering session on
    pub webdriver_url: String,

    /// Run the browser without a window
    pub headless: bool,

    /// Directory the CSV files are written to
    pub output_dir: PathBuf,

    /// CSS selector matching one product listing
    pub product_selector: String,

    /// CSS selector of the "load more" control
    pub load_more_selector: String,

    /// Element id of the cookie consent button
    pub cookie_button_id: String,

    /// Interval between checks while waiting for content
    pub poll_interval_ms: u64,

    /// Upper bound for content to appear after navigation or a click
    pub settle_timeout_ms: u64,

    /// Upper bound for a whole category, pagination and extraction included
    pub category_timeout_secs: u64,

    /// Maximum number of pagination steps per category
    pub max_steps: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            headless: true,
            output_dir: PathBuf::from("."),
            product_selector: ".thumbnail".to_string(),
            load_more_selector: ".btn.btn-default".to_string(),
            cookie_button_id: "onetrust-accept-btn-handler".to_string(),
            poll_interval_ms: 100,
            settle_timeout_ms: 5_000,
            category_timeout_secs: 300,
            max_steps: 500,
        }
    }
}

/// Builder for HarvestConfig
#[derive(Debug, Default)]
pub struct HarvestConfigBuilder {
    config: HarvestConfig,
}

impl HarvestConfigBuilder {
    /// Create a new builder with default configuration
    pub fn new() -> Self {
        Self {
            config: HarvestConfig::default(),
        }
    }

    /// Set the base listing URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    /// Set the WebDriver server URL
    pub fn webdriver_url(mut self, webdriver_url: impl Into<String>) -> Self {
        self.config.webdriver_url = webdriver_url.into();
        self
    }

    /// Set whether the browser runs headless
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set the output directory
    pub fn output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = output_dir.into();
        self
    }

    /// Set the product selector
    pub fn product_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.product_selector = selector.into();
        self
    }

    /// Set the "load more" selector
    pub fn load_more_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.load_more_selector = selector.into();
        self
    }

    /// Set the cookie consent button id
    pub fn cookie_button_id(mut self, id: impl Into<String>) -> Self {
        self.config.cookie_button_id = id.into();
        self
    }

    /// Set the poll interval in milliseconds
    pub fn poll_interval_ms(mut self, poll_interval_ms: u64) -> Self {
        self.config.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Set the settle timeout in milliseconds
    pub fn settle_timeout_ms(mut self, settle_timeout_ms: u64) -> Self {
        self.config.settle_timeout_ms = settle_timeout_ms;
        self
    }

    /// Set the per-category timeout in seconds
    pub fn category_timeout_secs(mut self, category_timeout_secs: u64) -> Self {
        self.config.category_timeout_secs = category_timeout_secs;
        self
    }

    /// Set the maximum number of pagination steps
    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.config.max_steps = max_steps;
        self
    }

    /// Build the configuration
    pub fn build(self) -> HarvestConfig {
        self.config
    }
}

impl HarvestConfig {
    /// Create a new builder
    pub fn builder() -> HarvestConfigBuilder {
        HarvestConfigBuilder::new()
    }

    /// Get the poll interval as a Duration
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Get the settle timeout as a Duration
    pub fn settle_timeout(&self) -> Duration {
        Duration::from_millis(self.settle_timeout_ms)
    }

    /// Get the per-category timeout as a Duration
    pub fn category_timeout(&self) -> Duration {
        Duration::from_secs(self.category_timeout_secs)
    }
}
