//! Package inference table
//!
//! Last-resort estimator: detects an EIA chip package code (0402, 0805, ...)
//! in part numbers and descriptions and answers with a typical unit mass.

use crate::domain::weight::{RawWeightExpression, WeightProvenance};

/// Typical unit masses in grams, in detection order.
///
/// Calibration constants for thick-film chip resistors and MLCCs of each
/// size; tune here when carrier data shows a consistent bias.
pub const PACKAGE_TABLE: [(&str, f64); 12] = [
    // 0.4 x 0.2 mm
    ("01005", 0.000_04),
    // 0.6 x 0.3 mm
    ("0201", 0.000_15),
    // 1.0 x 0.5 mm
    ("0402", 0.000_6),
    // 1.6 x 0.8 mm
    ("0603", 0.002),
    // 2.0 x 1.25 mm
    ("0805", 0.005_5),
    // 2.5 x 2.0 mm, mostly wirewound inductors
    ("1008", 0.012),
    // 3.2 x 1.6 mm
    ("1206", 0.01),
    // 3.2 x 2.5 mm
    ("1210", 0.016),
    // 4.5 x 1.6 mm
    ("1806", 0.025),
    // 4.5 x 3.2 mm
    ("1812", 0.04),
    // 5.0 x 2.5 mm
    ("2010", 0.025),
    // 6.3 x 3.2 mm
    ("2512", 0.045),
];

/// A detected package code and its typical mass
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PackageMatch {
    pub code: &'static str,
    pub typical_grams: f64,
    /// `true` when the code stood alone rather than inside a longer digit run
    pub bounded: bool,
}

impl PackageMatch {
    /// Weight expression handed to the unit normalizer
    #[must_use]
    pub fn to_expression(&self) -> RawWeightExpression {
        RawWeightExpression::new(
            format!("{} g", self.typical_grams),
            WeightProvenance::PackageInference {
                code: self.code.to_string(),
            },
        )
    }
}

/// Package code detector over [`PACKAGE_TABLE`]
#[derive(Debug, Clone, Copy, Default)]
pub struct PackageInference;

impl PackageInference {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Detect a package code.
    ///
    /// The first code in table order that appears as a bounded token wins;
    /// failing that, the first code found anywhere as a substring.
    #[must_use]
    pub fn detect(&self, text: &str) -> Option<PackageMatch> {
        let found = |code: &'static str, grams: f64, bounded: bool| PackageMatch {
            code,
            typical_grams: grams,
            bounded,
        };

        PACKAGE_TABLE
            .iter()
            .find(|(code, _)| contains_bounded(text, code))
            .map(|&(code, grams)| found(code, grams, true))
            .or_else(|| {
                PACKAGE_TABLE
                    .iter()
                    .find(|(code, _)| text.contains(code))
                    .map(|&(code, grams)| found(code, grams, false))
            })
    }
}

/// `code` occurs with no ASCII digit immediately before or after it
fn contains_bounded(text: &str, code: &str) -> bool {
    let bytes = text.as_bytes();
    text.match_indices(code).any(|(start, matched)| {
        let end = start + matched.len();
        let digit_before = start > 0 && bytes[start - 1].is_ascii_digit();
        let digit_after = end < bytes.len() && bytes[end].is_ascii_digit();
        !digit_before && !digit_after
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("CRCW0805-1K", "0805", true)]
    #[case("RC0603FR-0710KL Thick Film Resistors 0603", "0603", true)]
    #[case("GRM155R71C104KA88D 0402 X7R", "0402", true)]
    #[case("ERJ-P14F1001U 1210", "1210", true)]
    #[case("CAP 10uF 1206 25V", "1206", true)]
    fn test_bounded_detection(#[case] text: &str, #[case] code: &str, #[case] bounded: bool) {
        let found = PackageInference::new().detect(text).unwrap();
        assert_eq!(found.code, code);
        assert_eq!(found.bounded, bounded);
    }

    #[test]
    fn test_bounded_beats_earlier_unbounded() {
        // "10402" hides 0402 inside a digit run; 1206 stands alone
        let found = PackageInference::new().detect("X10402Y 1206").unwrap();
        assert_eq!(found.code, "1206");
        assert!(found.bounded);
    }

    #[test]
    fn test_unbounded_fallback() {
        let found = PackageInference::new().detect("ABC206035").unwrap();
        assert_eq!(found.code, "0603");
        assert!(!found.bounded);
    }

    #[test]
    fn test_table_order_breaks_ties() {
        let found = PackageInference::new().detect("kit 2512 and 0201").unwrap();
        assert_eq!(found.code, "0201");
    }

    #[test]
    fn test_no_code() {
        assert_eq!(PackageInference::new().detect("LM358DR SOIC-8 Op Amp"), None);
        assert_eq!(PackageInference::new().detect(""), None);
    }

    #[test]
    fn test_deterministic() {
        let text = "CL10B104KB8NNNC 0603 100nF";
        let a = PackageInference::new().detect(text);
        let b = PackageInference::new().detect(text);
        assert_eq!(a, b);
    }

    #[test]
    fn test_expression_is_grams() {
        let found = PackageInference::new().detect("0603").unwrap();
        let expression = found.to_expression();
        assert_eq!(expression.text, "0.002 g");
        assert_eq!(found.typical_grams, 0.002);
    }
}
