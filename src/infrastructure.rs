//! Infrastructure layer for configuration, logging, parsing and outbound HTTP
//!
//! This module provides the vendor search client, the product page fetcher,
//! weight extraction from vendor data, and the ambient configuration and
//! logging setup.

pub mod config;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod vendor_client;

// Re-export commonly used items
pub use config::{AppConfig, ConfigError, LoggingConfig};
pub use http_client::{HttpClient, HttpClientConfig};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{HtmlWeightScraper, ParsingError, ParsingResult, VendorRecordExtractor};
pub use vendor_client::MouserClient;
