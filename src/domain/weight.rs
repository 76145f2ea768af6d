//! # Weight Value Objects
//!
//! Mass units, raw weight expressions with their provenance, and the
//! canonical (pound-denominated) weight produced by the unit normalizer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Grams per avoirdupois pound.
pub const GRAMS_PER_POUND: f64 = 453.592_37;

/// Ounces per pound.
pub const OUNCES_PER_POUND: f64 = 16.0;

/// Decimal digits kept in canonical values.
pub const CANONICAL_DECIMALS: i32 = 10;

/// Recognized mass units
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MassUnit {
    Milligram,
    Gram,
    Kilogram,
    Ounce,
    Pound,
}

impl MassUnit {
    pub const ALL: [Self; 5] = [
        Self::Milligram,
        Self::Gram,
        Self::Kilogram,
        Self::Ounce,
        Self::Pound,
    ];

    /// Map a unit token (`mg`, `grams`, `LBS`, ...) to a unit
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "mg" | "milligram" | "milligrams" => Some(Self::Milligram),
            "g" | "gram" | "grams" => Some(Self::Gram),
            "kg" | "kilogram" | "kilograms" => Some(Self::Kilogram),
            "oz" | "ounce" | "ounces" => Some(Self::Ounce),
            "lb" | "lbs" | "pound" | "pounds" => Some(Self::Pound),
            _ => None,
        }
    }

    /// Short symbol used when re-expressing a value
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Milligram => "mg",
            Self::Gram => "g",
            Self::Kilogram => "kg",
            Self::Ounce => "oz",
            Self::Pound => "lb",
        }
    }

    /// Convert a magnitude in this unit to pounds (unrounded)
    #[must_use]
    pub fn to_pounds(self, value: f64) -> f64 {
        match self {
            Self::Milligram => value / 1000.0 / GRAMS_PER_POUND,
            Self::Gram => value / GRAMS_PER_POUND,
            Self::Kilogram => value * 1000.0 / GRAMS_PER_POUND,
            Self::Ounce => value / OUNCES_PER_POUND,
            Self::Pound => value,
        }
    }
}

impl fmt::Display for MassUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Round to the canonical number of decimal digits
#[must_use]
pub fn round_canonical(value: f64) -> f64 {
    let factor = 10f64.powi(CANONICAL_DECIMALS);
    (value * factor).round() / factor
}

/// Where a raw weight expression came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum WeightProvenance {
    /// Operator-maintained catalog entry
    LocalCatalog,
    /// A direct weight-bearing field on the vendor record
    DirectField { field: String },
    /// A named attribute of the vendor record
    NamedAttribute { name: String },
    /// Text scraped from the product page
    HtmlScrape { pattern: String },
    /// Typical mass for a detected package code
    PackageInference { code: String },
}

impl fmt::Display for WeightProvenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LocalCatalog => write!(f, "local catalog"),
            Self::DirectField { field } => write!(f, "field {field}"),
            Self::NamedAttribute { name } => write!(f, "attribute \"{name}\""),
            Self::HtmlScrape { pattern } => write!(f, "product page ({pattern})"),
            Self::PackageInference { code } => write!(f, "package {code}"),
        }
    }
}

/// Unparsed weight text together with its origin
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawWeightExpression {
    pub text: String,
    pub provenance: WeightProvenance,
}

impl RawWeightExpression {
    pub fn new(text: impl Into<String>, provenance: WeightProvenance) -> Self {
        Self {
            text: text.into(),
            provenance,
        }
    }
}

/// A mass expressed in pounds
///
/// The value is finite and non-negative; construction refuses anything else so
/// an unresolved weight can only be represented as `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalWeight {
    pounds: f64,
    source: Option<RawWeightExpression>,
}

impl CanonicalWeight {
    /// Build from a pound value, rejecting negative and non-finite values
    #[must_use]
    pub fn from_pounds(pounds: f64, source: Option<RawWeightExpression>) -> Option<Self> {
        if pounds.is_finite() && pounds >= 0.0 {
            Some(Self { pounds, source })
        } else {
            None
        }
    }

    #[must_use]
    pub const fn pounds(&self) -> f64 {
        self.pounds
    }

    /// SI form for auditability
    #[must_use]
    pub fn grams(&self) -> f64 {
        round_canonical(self.pounds * GRAMS_PER_POUND)
    }

    #[must_use]
    pub const fn source(&self) -> Option<&RawWeightExpression> {
        self.source.as_ref()
    }

    /// Total for `quantity` pieces. The product is not re-rounded.
    #[must_use]
    pub fn scaled(&self, quantity: u32) -> Self {
        Self {
            pounds: self.pounds * f64::from(quantity),
            source: self.source.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_tokens() {
        assert_eq!(MassUnit::from_token("MG"), Some(MassUnit::Milligram));
        assert_eq!(MassUnit::from_token("grams"), Some(MassUnit::Gram));
        assert_eq!(MassUnit::from_token("Lbs"), Some(MassUnit::Pound));
        assert_eq!(MassUnit::from_token("ounces"), Some(MassUnit::Ounce));
        assert_eq!(MassUnit::from_token("stone"), None);
    }

    #[test]
    fn test_conversion_factors() {
        assert!((MassUnit::Gram.to_pounds(453.592_37) - 1.0).abs() < 1e-12);
        assert!((MassUnit::Kilogram.to_pounds(1.0) - 2.204_622_621_8).abs() < 1e-9);
        assert!((MassUnit::Ounce.to_pounds(8.0) - 0.5).abs() < f64::EPSILON);
        assert!((MassUnit::Pound.to_pounds(3.25) - 3.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_canonical_weight_rejects_invalid() {
        assert!(CanonicalWeight::from_pounds(-0.1, None).is_none());
        assert!(CanonicalWeight::from_pounds(f64::NAN, None).is_none());
        assert!(CanonicalWeight::from_pounds(f64::INFINITY, None).is_none());
        assert!(CanonicalWeight::from_pounds(0.0, None).is_some());
    }

    #[test]
    fn test_scaled_is_exact_product() {
        let unit = CanonicalWeight::from_pounds(0.000_012_125_4, None).unwrap();
        let total = unit.scaled(7);
        assert_eq!(total.pounds(), unit.pounds() * 7.0);
    }
}
