//! # shopharvest - product listing extraction for a paginated demo shop
//!
//! This crate drives a browser through the category listings of the
//! webscraper.io e-commerce test site, expands each listing with its
//! "load more" button, extracts every product into a typed record, and
//! writes one CSV file per category.
//!
//! ## Features
//!
//! - Pagination with poll-until-grown waits instead of fixed sleeps
//! - Typed extraction errors separating layout mismatches from bad values
//! - Per-product and per-category failure isolation
//! - A rendering-session trait with WebDriver and scripted implementations
//! - One browser session per run, always closed at the end
//!
//! ## Example
//!
//! ```rust,no_run
//! use shopharvest::catalog::default_categories;
//! use shopharvest::config::HarvestConfig;
//! use shopharvest::harvest::harvest_with_webdriver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = HarvestConfig::builder().output_dir("out").build();
//!     let pages = default_categories(&config.base_url)?;
//!
//!     let summary = harvest_with_webdriver(config, &pages, |report| {
//!         println!("{}: {} records", report.category, report.records);
//!     })
//!     .await?;
//!
//!     println!("{}", summary);
//!     Ok(())
//! }
//! ```

mod error;

pub mod catalog;
pub mod config;
pub mod extract;
pub mod harvest;
pub mod output;
pub mod pager;
pub mod session;

pub use error::{Error, Result};

/// Re-export of types module for public use
pub mod prelude {
    pub use crate::catalog::{CategoryPage, Product};
    pub use crate::config::HarvestConfig;
    pub use crate::error::Error;
    pub use crate::error::Result;
    pub use crate::harvest::{Harvester, RunSummary};
    pub use crate::session::RenderingSession;
}
