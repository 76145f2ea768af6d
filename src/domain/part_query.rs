//! Validated part query
//!
//! Created once per request from untrusted inbound parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input validation failures, surfaced before any network call
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Missing required parameter: part")]
    MissingPart,

    #[error("Invalid quantity '{value}': must be a positive integer")]
    InvalidQuantity { value: String },
}

/// A part identifier with the requested quantity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartQuery {
    identifier: String,
    quantity: u32,
}

impl PartQuery {
    pub const DEFAULT_QUANTITY: u32 = 1;

    /// Build a query from a part identifier and quantity
    pub fn new(identifier: &str, quantity: u32) -> Result<Self, QueryError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(QueryError::MissingPart);
        }
        if quantity == 0 {
            return Err(QueryError::InvalidQuantity {
                value: quantity.to_string(),
            });
        }
        Ok(Self {
            identifier: identifier.to_string(),
            quantity,
        })
    }

    /// Parse raw request parameters. A missing or blank quantity means 1.
    pub fn parse(part: Option<&str>, qty: Option<&str>) -> Result<Self, QueryError> {
        let part = part.ok_or(QueryError::MissingPart)?;
        let quantity = match qty.map(str::trim).filter(|q| !q.is_empty()) {
            None => Self::DEFAULT_QUANTITY,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|q| *q >= 1)
                .ok_or_else(|| QueryError::InvalidQuantity {
                    value: raw.to_string(),
                })?,
        };
        Self::new(part, quantity)
    }

    #[must_use]
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_is_trimmed() {
        let query = PartQuery::parse(Some("  CRCW0805-1K \n"), None).unwrap();
        assert_eq!(query.identifier(), "CRCW0805-1K");
        assert_eq!(query.quantity(), 1);
    }

    #[test]
    fn test_missing_or_blank_part() {
        assert_eq!(PartQuery::parse(None, None), Err(QueryError::MissingPart));
        assert_eq!(PartQuery::parse(Some("   "), Some("2")), Err(QueryError::MissingPart));
    }

    #[test]
    fn test_quantity_validation() {
        assert_eq!(PartQuery::parse(Some("X"), Some("25")).unwrap().quantity(), 25);
        assert_eq!(PartQuery::parse(Some("X"), Some(" ")).unwrap().quantity(), 1);
        for bad in ["0", "-3", "2.5", "ten"] {
            assert!(matches!(
                PartQuery::parse(Some("X"), Some(bad)),
                Err(QueryError::InvalidQuantity { .. })
            ));
        }
    }
}
