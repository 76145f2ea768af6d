//! Outbound collaborator traits
//!
//! The resolution pipeline talks to the vendor search API and to product
//! pages only through these interfaces; infrastructure provides the HTTP
//! implementations and tests provide in-memory ones.

use anyhow::Result;
use async_trait::async_trait;
use thiserror::Error;

use crate::domain::vendor_record::VendorRecord;

/// Vendor search failures. All of them are fatal to one resolution.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VendorSearchError {
    #[error("Vendor request failed: {message}")]
    Transport { message: String },

    #[error("Vendor responded with status {status}")]
    Status { status: u16, details: String },

    #[error("Vendor returned errors: {}", messages.join("; "))]
    Api { messages: Vec<String> },

    #[error("Malformed vendor payload: {message}")]
    MalformedPayload { message: String },
}

impl VendorSearchError {
    /// Upstream HTTP status, when the vendor produced one
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Details forwarded to the caller for diagnosis
    #[must_use]
    pub fn details(&self) -> String {
        match self {
            Self::Transport { message } | Self::MalformedPayload { message } => message.clone(),
            Self::Status { details, .. } => details.clone(),
            Self::Api { messages } => messages.join("; "),
        }
    }
}

/// Part-number search against one vendor
#[async_trait]
pub trait VendorSearch: Send + Sync {
    /// Display name used in provenance labels
    fn vendor_name(&self) -> &str;

    /// Candidate records in the vendor's relevance order
    async fn search_part(&self, identifier: &str) -> Result<Vec<VendorRecord>, VendorSearchError>;
}

/// Product page retrieval
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Page body; non-success statuses are errors
    async fn fetch_page(&self, url: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_details() {
        let err = VendorSearchError::Status {
            status: 403,
            details: "Invalid API key".into(),
        };
        assert_eq!(err.status(), Some(403));
        assert_eq!(err.details(), "Invalid API key");

        let err = VendorSearchError::Api {
            messages: vec!["Invalid part".into(), "Quota".into()],
        };
        assert_eq!(err.status(), None);
        assert_eq!(err.to_string(), "Vendor returned errors: Invalid part; Quota");
    }
}
