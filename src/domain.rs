//! Domain module - Core weight resolution entities
//!
//! This module contains the value objects that flow through the weight
//! resolution pipeline and the pure domain services (unit normalization and
//! package-size inference) that need no I/O.
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod part_query;
pub mod resolution;
pub mod services;
pub mod vendor_record;
pub mod weight;

// Re-export commonly used items for convenience
pub use part_query::{PartQuery, QueryError};
pub use resolution::{
    PartMetadata, ResolutionDiagnostic, ResolutionOutcome, ResolutionResult, ResolutionStage,
};
pub use vendor_record::{ProductAttribute, VendorRecord};
pub use weight::{CanonicalWeight, MassUnit, RawWeightExpression, WeightProvenance};
