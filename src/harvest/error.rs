//! Error types for the harvest module

use std::time::Duration;

use crate::error::Error as CrateError;
use crate::extract::ExtractError;
use crate::output::OutputError;
use crate::session::SessionError;
use thiserror::Error;

/// Errors that abort one category
#[derive(Debug, Error)]
pub enum HarvestError {
    /// The session could not load or interact with a listing
    #[error("navigation failed for {url}: {source}")]
    Navigation {
        /// Listing being processed
        url: String,
        /// Underlying session failure
        #[source]
        source: SessionError,
    },

    /// The category did not finish in time
    #[error("category {category} timed out after {after:?}")]
    Timeout {
        /// Category name
        category: String,
        /// Configured limit
        after: Duration,
    },

    /// A configured selector does not compile
    #[error("selector error: {0}")]
    Selector(#[from] ExtractError),

    /// The category file could not be written
    #[error(transparent)]
    Output(#[from] OutputError),
}

impl From<HarvestError> for CrateError {
    fn from(err: HarvestError) -> Self {
        match err {
            HarvestError::Output(e) => e.into(),
            HarvestError::Selector(e) => e.into(),
            _ => CrateError::Harvest(err.to_string()),
        }
    }
}
