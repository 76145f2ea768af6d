//! Weight extraction from vendor data
//!
//! Structured extraction from vendor search records and best-effort
//! scraping of product pages, with shared error and configuration types.

pub mod config;
pub mod error;
pub mod html_weight_scraper;
pub mod vendor_record_extractor;

// Re-export public types
pub use config::WeightScraperConfig;
pub use error::{ParsingError, ParsingResult};
pub use html_weight_scraper::{HtmlWeightScraper, ScrapePattern};
pub use vendor_record_extractor::{DIRECT_WEIGHT_FIELDS, DirectWeightField, VendorRecordExtractor};
