//! Vendor record weight extractor
//!
//! Finds a raw weight expression on a vendor search record: first in the
//! direct weight-bearing fields, then in the named attribute list.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

use crate::domain::vendor_record::{VendorRecord, clean_text, value_text};
use crate::domain::weight::{MassUnit, RawWeightExpression, WeightProvenance};

/// A direct field and the unit its bare numbers are expressed in
#[derive(Debug, Clone, Copy)]
pub struct DirectWeightField {
    pub name: &'static str,
    pub implied_unit: Option<MassUnit>,
}

/// Direct fields in priority order
pub const DIRECT_WEIGHT_FIELDS: [DirectWeightField; 5] = [
    DirectWeightField { name: "UnitWeight", implied_unit: None },
    // Mouser: { "UnitWeight": 0.000055 } in kilograms
    DirectWeightField { name: "UnitWeightKg", implied_unit: Some(MassUnit::Kilogram) },
    DirectWeightField { name: "Weight", implied_unit: None },
    DirectWeightField { name: "NetWeight", implied_unit: None },
    DirectWeightField { name: "PackageWeight", implied_unit: None },
];

/// Attribute name patterns, most specific first
static ATTRIBUTE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)\bunit\s*weight\b",
        r"(?i)\bnet\s*weight\b",
        r"(?i)\bpack(?:age|aging)\s*weight\b",
        r"(?i)\bweight\b",
        r"(?i)\bmass\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("attribute pattern is a valid regex"))
    .collect()
});

#[derive(Debug, Clone, Copy, Default)]
pub struct VendorRecordExtractor;

impl VendorRecordExtractor {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Direct fields first, then named attributes
    #[must_use]
    pub fn extract(&self, record: &VendorRecord) -> Option<RawWeightExpression> {
        self.extract_direct_field(record)
            .or_else(|| self.extract_named_attribute(record))
    }

    /// First non-empty direct weight field
    #[must_use]
    pub fn extract_direct_field(&self, record: &VendorRecord) -> Option<RawWeightExpression> {
        DIRECT_WEIGHT_FIELDS.iter().find_map(|field| {
            let text = record.field(field.name).and_then(scalar_or_nested_text)?;
            let text = match field.implied_unit {
                Some(unit) if text.parse::<f64>().is_ok() => format!("{text} {}", unit.symbol()),
                _ => text,
            };
            debug!("Weight candidate from field {}: {}", field.name, text);
            Some(RawWeightExpression::new(
                text,
                WeightProvenance::DirectField {
                    field: field.name.to_string(),
                },
            ))
        })
    }

    /// First attribute matching the most specific name pattern
    #[must_use]
    pub fn extract_named_attribute(&self, record: &VendorRecord) -> Option<RawWeightExpression> {
        ATTRIBUTE_PATTERNS.iter().find_map(|pattern| {
            record.attributes.iter().find_map(|attribute| {
                if !pattern.is_match(&attribute.name) {
                    return None;
                }
                let value = clean_text(&attribute.value)?;
                debug!("Weight candidate from attribute '{}': {}", attribute.name, value);
                Some(RawWeightExpression::new(
                    value,
                    WeightProvenance::NamedAttribute {
                        name: attribute.name.clone(),
                    },
                ))
            })
        })
    }
}

/// Scalars directly; objects through their first scalar member
fn scalar_or_nested_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(inner) => inner.values().find_map(value_text),
        other => value_text(other),
    }
}
