//! Unit normalizer
//!
//! Turns free-text weight expressions such as `"5.500 mg"`, `"0.02 oz"` or
//! `"1,250 Grams"` into a [`CanonicalWeight`] in pounds.

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::weight::{CanonicalWeight, MassUnit, RawWeightExpression, round_canonical};

/// Magnitude (optionally signed, with thousands separators or an exponent)
/// followed by a unit. A sign only counts when it touches the digits.
/// Longer unit spellings are listed first so `mg` never matches as `m` + `g`.
static WEIGHT_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)(?P<sign>-?)(?P<number>(?:\d{1,3}(?:,\d{3})+(?:\.\d+)?|\d+(?:\.\d+)?|\.\d+)(?:e[+-]?\d+)?)\s*(?P<unit>milligrams?|mg|kilograms?|kg|grams?|g|ounces?|oz|pounds?|lbs?)\b",
    )
    .expect("weight pattern is a valid regex")
});

/// Stateless parser for weight expressions
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitNormalizer;

impl UnitNormalizer {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Find the first `(magnitude, unit)` pair in `text`
    ///
    /// Returns `None` when no unit token is present or the first magnitude is
    /// negative or non-finite.
    #[must_use]
    pub fn parse(&self, text: &str) -> Option<(f64, MassUnit)> {
        let captures = WEIGHT_PATTERN.captures(text)?;
        let number: String = captures["number"].chars().filter(|c| *c != ',').collect();
        let unit = MassUnit::from_token(&captures["unit"])?;

        let value = number.parse::<f64>().ok()?;
        if !value.is_finite() {
            return None;
        }

        // "0.5-1 g" or "CRCW-5 mg": a hyphen right after a letter or digit
        // separates tokens rather than negating the value
        if let Some(sign) = captures.name("sign").filter(|m| !m.is_empty()) {
            let joined = text[..sign.start()]
                .chars()
                .next_back()
                .is_some_and(char::is_alphanumeric);
            if !joined {
                debug!("Rejected negative weight magnitude '-{}' in '{}'", number, text);
                return None;
            }
        }
        Some((value, unit))
    }

    /// Convert free text to pounds, rounded to the canonical precision
    #[must_use]
    pub fn to_pounds(&self, text: &str) -> Option<f64> {
        let (value, unit) = self.parse(text)?;
        let pounds = round_canonical(unit.to_pounds(value));
        pounds.is_finite().then_some(pounds)
    }

    /// Normalize a raw expression, keeping it as the weight's source
    #[must_use]
    pub fn normalize(&self, expression: &RawWeightExpression) -> Option<CanonicalWeight> {
        let pounds = self.to_pounds(&expression.text)?;
        CanonicalWeight::from_pounds(pounds, Some(expression.clone()))
    }
}
