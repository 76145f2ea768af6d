//! Resolution results
//!
//! The outcome of one weight resolution, including the stage that produced
//! the weight and enough diagnostics to audit it.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::weight::CanonicalWeight;

/// Pipeline stage that produced (or failed to produce) the weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionStage {
    LocalCatalog,
    VendorField,
    VendorAttribute,
    HtmlScrape,
    PackageInference,
    Unresolved,
}

impl ResolutionStage {
    /// Whether the weight is a typical-value estimate rather than measured data
    #[must_use]
    pub const fn is_estimate(self) -> bool {
        matches!(self, Self::PackageInference)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LocalCatalog => "local catalog",
            Self::VendorField => "vendor fields",
            Self::VendorAttribute => "vendor attributes",
            Self::HtmlScrape => "product page",
            Self::PackageInference => "package inference",
            Self::Unresolved => "unresolved",
        }
    }
}

impl fmt::Display for ResolutionStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Descriptive data carried over from the selected vendor record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartMetadata {
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub manufacturer_part_number: Option<String>,
    pub vendor_part_number: Option<String>,
    pub product_url: Option<String>,
    pub datasheet_url: Option<String>,
}

/// Raw text and origin of the accepted weight, plus every stage tried
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionDiagnostic {
    pub raw_expression: Option<String>,
    pub parsed_from: Option<String>,
    pub attempted_stages: Vec<ResolutionStage>,
}

/// Terminal state of a resolution that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionOutcome {
    Resolved,
    NotFound,
    WeightUnresolved,
}

/// Final answer for one part query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub quantity: u32,
    pub unit_weight: Option<CanonicalWeight>,
    pub total_weight: Option<CanonicalWeight>,
    pub stage: ResolutionStage,
    pub outcome: ResolutionOutcome,
    /// Human-readable provenance label
    pub source: Option<String>,
    pub metadata: PartMetadata,
    pub diagnostic: ResolutionDiagnostic,
}

impl ResolutionResult {
    /// Build a resolved result; the total is derived from the unit weight
    #[must_use]
    pub fn resolved(
        quantity: u32,
        unit_weight: CanonicalWeight,
        stage: ResolutionStage,
        source: String,
        metadata: PartMetadata,
        diagnostic: ResolutionDiagnostic,
    ) -> Self {
        let total_weight = unit_weight.scaled(quantity);
        Self {
            quantity,
            unit_weight: Some(unit_weight),
            total_weight: Some(total_weight),
            stage,
            outcome: ResolutionOutcome::Resolved,
            source: Some(source),
            metadata,
            diagnostic,
        }
    }

    /// Build an unresolved result; both weights stay `None`
    #[must_use]
    pub fn unresolved(
        quantity: u32,
        outcome: ResolutionOutcome,
        metadata: PartMetadata,
        diagnostic: ResolutionDiagnostic,
    ) -> Self {
        Self {
            quantity,
            unit_weight: None,
            total_weight: None,
            stage: ResolutionStage::Unresolved,
            outcome,
            source: None,
            metadata,
            diagnostic,
        }
    }

    /// Total weight for the requested quantity
    #[must_use]
    pub const fn weight(&self) -> Option<&CanonicalWeight> {
        self.total_weight.as_ref()
    }

    /// Message for non-fatal unresolved outcomes
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        match self.outcome {
            ResolutionOutcome::Resolved => None,
            ResolutionOutcome::NotFound => Some("not found".to_string()),
            ResolutionOutcome::WeightUnresolved => {
                let tried = self
                    .diagnostic
                    .attempted_stages
                    .iter()
                    .map(|s| s.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                Some(format!("weight not found (tried: {tried})"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_has_no_weights() {
        let result = ResolutionResult::unresolved(
            4,
            ResolutionOutcome::NotFound,
            PartMetadata::default(),
            ResolutionDiagnostic::default(),
        );
        assert!(result.weight().is_none());
        assert!(result.unit_weight.is_none());
        assert_eq!(result.error_message().as_deref(), Some("not found"));
    }

    #[test]
    fn test_weight_unresolved_lists_stages() {
        let diagnostic = ResolutionDiagnostic {
            attempted_stages: vec![
                ResolutionStage::VendorField,
                ResolutionStage::VendorAttribute,
                ResolutionStage::PackageInference,
            ],
            ..Default::default()
        };
        let result = ResolutionResult::unresolved(
            1,
            ResolutionOutcome::WeightUnresolved,
            PartMetadata::default(),
            diagnostic,
        );
        assert_eq!(
            result.error_message().as_deref(),
            Some("weight not found (tried: vendor fields, vendor attributes, package inference)")
        );
    }

    #[test]
    fn test_resolved_total_scales() {
        let unit = CanonicalWeight::from_pounds(0.25, None).unwrap();
        let result = ResolutionResult::resolved(
            3,
            unit,
            ResolutionStage::VendorField,
            "test".to_string(),
            PartMetadata::default(),
            ResolutionDiagnostic::default(),
        );
        assert_eq!(result.weight().map(CanonicalWeight::pounds), Some(0.75));
        assert!(!result.stage.is_estimate());
    }
}
