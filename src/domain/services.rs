//! Domain services
//!
//! Pure weight logic that doesn't naturally fit within value objects, and the
//! collaborator interfaces the pipeline depends on.

pub mod collaborators;
pub mod package_inference;
pub mod unit_normalizer;

pub use collaborators::{PageFetcher, VendorSearch, VendorSearchError};
pub use package_inference::{PackageInference, PackageMatch};
pub use unit_normalizer::UnitNormalizer;
