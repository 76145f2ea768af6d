//! Data Transfer Objects for the weight API
//!
//! Request parsing from query strings and JSON bodies, and the flat camelCase
//! response shape returned for every outcome.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::WeightError;
use crate::domain::part_query::{PartQuery, QueryError};
use crate::domain::resolution::{ResolutionResult, ResolutionStage};

/// Raw request parameters, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightRequest {
    pub part: Option<String>,
    pub qty: Option<String>,
}

impl WeightRequest {
    /// From `?part=..&qty=..`
    #[must_use]
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        Self {
            part: params.get("part").cloned(),
            qty: params.get("qty").cloned(),
        }
    }

    /// From a JSON body; `qty` may be a number or a numeric string
    #[must_use]
    pub fn from_json(body: &Value) -> Self {
        Self {
            part: body.get("part").and_then(scalar_text),
            qty: body.get("qty").and_then(scalar_text),
        }
    }

    /// Fill parameters missing here from `fallback`
    #[must_use]
    pub fn with_fallback(self, fallback: Self) -> Self {
        Self {
            part: self.part.or(fallback.part),
            qty: self.qty.or(fallback.qty),
        }
    }

    pub fn to_query(&self) -> Result<PartQuery, QueryError> {
        PartQuery::parse(self.part.as_deref(), self.qty.as_deref())
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Response body for `/api/weight`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightResponse {
    /// Total weight in pounds for the requested quantity
    pub weight: Option<f64>,
    pub unit_weight_lbs: Option<f64>,
    pub unit_weight_g: Option<f64>,
    pub qty: Option<u32>,
    pub total_weight_lbs: Option<f64>,
    pub source: Option<String>,
    pub stage: Option<ResolutionStage>,
    pub estimated: bool,
    pub description: Option<String>,
    pub manufacturer: Option<String>,
    pub manufacturer_part_number: Option<String>,
    pub vendor_part_number: Option<String>,
    pub product_url: Option<String>,
    pub datasheet_url: Option<String>,
    pub raw_weight: Option<String>,
    pub parsed_from: Option<String>,
    pub attempted_stages: Vec<ResolutionStage>,
    pub error: Option<String>,
    pub details: Option<String>,
}

impl From<ResolutionResult> for WeightResponse {
    fn from(result: ResolutionResult) -> Self {
        let error = result.error_message();
        let total = result.total_weight.as_ref().map(|w| w.pounds());
        let metadata = result.metadata;
        let diagnostic = result.diagnostic;

        Self {
            weight: total,
            unit_weight_lbs: result.unit_weight.as_ref().map(|w| w.pounds()),
            unit_weight_g: result.unit_weight.as_ref().map(|w| w.grams()),
            qty: Some(result.quantity),
            total_weight_lbs: total,
            source: result.source,
            stage: Some(result.stage),
            estimated: result.stage.is_estimate(),
            description: metadata.description,
            manufacturer: metadata.manufacturer,
            manufacturer_part_number: metadata.manufacturer_part_number,
            vendor_part_number: metadata.vendor_part_number,
            product_url: metadata.product_url,
            datasheet_url: metadata.datasheet_url,
            raw_weight: diagnostic.raw_expression,
            parsed_from: diagnostic.parsed_from,
            attempted_stages: diagnostic.attempted_stages,
            error,
            details: None,
        }
    }
}

impl From<&WeightError> for WeightResponse {
    fn from(error: &WeightError) -> Self {
        Self {
            error: Some(error.to_string()),
            details: error.details(),
            ..Default::default()
        }
    }
}
