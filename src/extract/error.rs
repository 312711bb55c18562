//! Error types for the extract module

use crate::error::Error as CrateError;
use thiserror::Error;

use super::Field;

/// Error type for record extraction
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// A required sub-element is missing from the product element
    #[error("missing {field} element (selector `{selector}`)")]
    Structure {
        /// Field whose element was not found
        field: Field,
        /// Selector that matched nothing
        selector: &'static str,
    },

    /// A sub-element is present but its content is malformed
    #[error("cannot parse {field} from {value:?}: {reason}")]
    Parse {
        /// Field being parsed
        field: Field,
        /// Raw value as found in the page
        value: String,
        /// Why the conversion failed
        reason: String,
    },

    /// A CSS selector failed to compile
    #[error("invalid selector `{selector}`: {reason}")]
    InvalidSelector {
        /// The selector text
        selector: String,
        /// Parser message
        reason: String,
    },
}

impl ExtractError {
    pub(crate) fn parse(field: Field, value: &str, reason: impl ToString) -> Self {
        Self::Parse {
            field,
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    /// The page layout does not match the expected structure
    pub fn is_structure(&self) -> bool {
        matches!(self, Self::Structure { .. })
    }

    /// The page layout matched but a value was malformed
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

impl From<ExtractError> for CrateError {
    fn from(err: ExtractError) -> Self {
        CrateError::Extract(err.to_string())
    }
}
