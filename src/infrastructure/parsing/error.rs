//! Parsing error types
//!
//! Detailed errors for weight extraction. None of these ever reach the
//! caller of the resolution pipeline: scrape failures are logged and the
//! fallback chain advances.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Invalid extraction pattern '{name}': {reason}")]
    InvalidPattern { name: String, reason: String },

    #[error("Unsupported product URL: {url} - {reason}")]
    UnsupportedUrl { url: String, reason: String },

    #[error("Product page fetch failed: {url} - {message}")]
    PageFetchFailed { url: String, message: String },

    #[error("No weight found on product page (tried {})", tried_patterns.join(", "))]
    WeightNotFound { tried_patterns: Vec<String> },
}

impl ParsingError {
    /// Create an invalid selector error
    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Create an invalid pattern error
    pub fn invalid_pattern(name: &str, reason: impl ToString) -> Self {
        Self::InvalidPattern {
            name: name.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Configuration problems, as opposed to a page that lacks data
    #[must_use]
    pub const fn is_configuration_error(&self) -> bool {
        matches!(self, Self::InvalidSelector { .. } | Self::InvalidPattern { .. })
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
