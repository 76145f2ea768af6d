//! Part Weight Resolver
//!
//! Resolves the shipping weight of an electronic component from its part
//! number: local catalog, vendor search fields and attributes, the vendor
//! product page, and finally a package-size estimate. Every weight is
//! normalized to pounds and reported with the stage that produced it.

// Module declarations
pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod commands;

pub use application::{WeightError, WeightResolutionService};
pub use commands::{AppState, router};
pub use domain::{CanonicalWeight, PartQuery, ResolutionResult, ResolutionStage};
