//! Parsing configuration for weight extraction
//!
//! Centralized labels, selectors and structured-data keys used by the
//! product page scraper.

use serde::{Deserialize, Serialize};

/// Product page scraping configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightScraperConfig {
    /// Selector for table rows
    pub row_selector: String,

    /// Selector for cells inside a row
    pub cell_selector: String,

    /// Primary labels ("Unit Weight")
    pub unit_weight_labels: Vec<String>,

    /// Secondary labels ("Net Weight")
    pub net_weight_labels: Vec<String>,

    /// Keys of embedded structured data carrying the unit weight
    pub structured_data_keys: Vec<String>,
}

impl Default for WeightScraperConfig {
    fn default() -> Self {
        Self {
            row_selector: "tr".to_string(),
            cell_selector: "th, td".to_string(),
            unit_weight_labels: vec!["Unit Weight".to_string()],
            net_weight_labels: vec!["Net Weight".to_string()],
            structured_data_keys: vec![
                "Unit Weight".to_string(),
                "UnitWeight".to_string(),
                "unitWeight".to_string(),
            ],
        }
    }
}
