//! Application layer module
//!
//! This module contains the weight resolution use case, the data transfer
//! objects of the inbound API and the error taxonomy shared by both.

pub mod dto;
pub mod weight_resolution_service;

pub use dto::{WeightRequest, WeightResponse};
pub use weight_resolution_service::WeightResolutionService;

use thiserror::Error;

use crate::domain::part_query::QueryError;
use crate::domain::services::VendorSearchError;

/// Fatal failures of a weight request.
///
/// Non-fatal outcomes ("not found", "weight unresolved") are regular
/// [`ResolutionResult`](crate::domain::ResolutionResult)s, not errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeightError {
    #[error("Server configuration error: {message}")]
    Configuration { message: String },

    #[error("{0}")]
    InvalidInput(#[from] QueryError),

    #[error("{source}")]
    VendorUnavailable {
        #[from]
        source: VendorSearchError,
    },

    #[error("Internal server error")]
    Internal { message: String },
}

impl WeightError {
    /// HTTP status used at the inbound boundary
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Configuration { .. } | Self::Internal { .. } => 500,
            Self::InvalidInput(_) => 400,
            Self::VendorUnavailable { .. } => 502,
        }
    }

    /// Diagnostic details safe to return to the caller
    #[must_use]
    pub fn details(&self) -> Option<String> {
        match self {
            Self::VendorUnavailable { source } => Some(match source.status() {
                Some(status) => format!("vendor status {status}: {}", source.details()),
                None => source.details(),
            }),
            _ => None,
        }
    }
}
