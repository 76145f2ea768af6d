//! Configuration infrastructure
//!
//! Configuration is layered with the `config` crate:
//! 1. Compiled defaults (every section is `#[serde(default)]`)
//! 2. `config/part-weight-resolver.{toml,json,yaml}` next to the working directory
//! 3. `<user config dir>/part-weight-resolver/config.toml`
//! 4. `PARTWEIGHT__<SECTION>__<KEY>` environment variables
//! 5. The vendor credential from `MOUSER_API_KEY`
//!
//! The environment is read only by [`AppConfig::load`]; everything below it
//! receives configuration explicitly.

#![allow(clippy::uninlined_format_args)]

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

use super::parsing::WeightScraperConfig;

/// Default values
pub mod defaults {
    pub const CONFIG_FILE: &str = "config/part-weight-resolver";
    pub const USER_CONFIG_DIR: &str = "part-weight-resolver";
    pub const ENV_PREFIX: &str = "PARTWEIGHT";
    pub const API_KEY_ENV: &str = "MOUSER_API_KEY";

    pub const BIND_ADDR: &str = "127.0.0.1:8787";

    pub const VENDOR_NAME: &str = "Mouser";
    pub const VENDOR_BASE_URL: &str = "https://api.mouser.com/api/v1";
    pub const VENDOR_TIMEOUT_SECONDS: u64 = 10;
    pub const VENDOR_SEARCH_OPTION: &str = "None";

    pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
    pub const BROWSER_ACCEPT: &str =
        "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,*/*;q=0.8";
    pub const BROWSER_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
    pub const PAGE_TIMEOUT_SECONDS: u64 = 8;
    pub const PAGE_MAX_REQUESTS_PER_SECOND: u32 = 2;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_JSON_FORMAT: bool = false;
    pub const LOG_CONSOLE_OUTPUT: bool = true;
    pub const LOG_FILE_OUTPUT: bool = false;
    pub const LOG_FILE_NAME: &str = "part-weight-resolver.log";
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Complete application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub vendor: VendorConfig,
    pub page_fetch: PageFetchConfig,
    pub scraper: WeightScraperConfig,
    pub logging: LoggingConfig,
    /// Known part weights consulted before the vendor
    pub catalog: Vec<CatalogEntry>,
}

/// Inbound HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address to bind (host:port)
    pub bind_addr: String,
}

/// Vendor search API settings
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VendorConfig {
    /// Display name used in provenance labels
    pub name: String,

    /// API root, without trailing slash
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// `partSearchOptions` sent with each search
    pub search_option: String,

    /// API key; injected from the environment, never serialized
    #[serde(skip_serializing)]
    pub api_key: Option<String>,
}

/// Product page fetch settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageFetchConfig {
    /// Disable to skip the scrape stage entirely
    pub enabled: bool,
    pub user_agent: String,
    pub accept: String,
    pub accept_language: String,
    pub timeout_seconds: u64,
    pub max_requests_per_second: u32,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable daily-rolling file output
    pub file_output: bool,

    /// Log directory; defaults to `logs/` next to the executable
    pub log_dir: Option<PathBuf>,

    /// Module-specific log level filters (e.g., "reqwest": "warn")
    pub module_filters: HashMap<String, String>,
}

/// One operator-maintained part weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub part: String,
    /// Weight expression with a unit, e.g. "12 g"
    pub weight: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: defaults::BIND_ADDR.to_string(),
        }
    }
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            name: defaults::VENDOR_NAME.to_string(),
            base_url: defaults::VENDOR_BASE_URL.to_string(),
            timeout_seconds: defaults::VENDOR_TIMEOUT_SECONDS,
            search_option: defaults::VENDOR_SEARCH_OPTION.to_string(),
            api_key: None,
        }
    }
}

impl fmt::Debug for VendorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VendorConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("search_option", &self.search_option)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl VendorConfig {
    /// The API key, if one is set and not blank
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

impl Default for PageFetchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            user_agent: defaults::BROWSER_USER_AGENT.to_string(),
            accept: defaults::BROWSER_ACCEPT.to_string(),
            accept_language: defaults::BROWSER_ACCEPT_LANGUAGE.to_string(),
            timeout_seconds: defaults::PAGE_TIMEOUT_SECONDS,
            max_requests_per_second: defaults::PAGE_MAX_REQUESTS_PER_SECOND,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: defaults::LOG_JSON_FORMAT,
            console_output: defaults::LOG_CONSOLE_OUTPUT,
            file_output: defaults::LOG_FILE_OUTPUT,
            log_dir: None,
            module_filters: {
                let mut filters = HashMap::new();
                filters.insert("reqwest".to_string(), "warn".to_string());
                filters.insert("hyper".to_string(), "warn".to_string());
                filters.insert("html5ever".to_string(), "warn".to_string());
                filters
            },
        }
    }
}

impl AppConfig {
    /// Load from the standard locations and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let mut files = vec![PathBuf::from(defaults::CONFIG_FILE)];
        if let Some(user_file) = Self::user_config_file() {
            files.push(user_file);
        }
        let api_key = std::env::var(defaults::API_KEY_ENV).ok();
        Self::load_from(&files, api_key)
    }

    /// Load from explicit files (missing files are skipped) plus `PARTWEIGHT__*`
    /// variables, with `api_key` applied last
    pub fn load_from(files: &[PathBuf], api_key: Option<String>) -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();
        for file in files {
            builder = builder.add_source(config::File::from(file.as_path()).required(false));
        }
        let settings = builder
            .add_source(
                config::Environment::with_prefix(defaults::ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut config: Self = settings.try_deserialize()?;
        if api_key.is_some() {
            config.vendor.api_key = api_key;
        }
        config.validate()?;
        Ok(config)
    }

    /// One-line description for the startup log; never includes the key
    #[must_use]
    pub fn summary(&self) -> String {
        format!(
            "vendor: {}, credential: {}, catalog entries: {}, page fetch: {}",
            self.vendor.name,
            if self.vendor.api_key().is_some() { "present" } else { "missing" },
            self.catalog.len(),
            if self.page_fetch.enabled { "on" } else { "off" }
        )
    }

    /// `<user config dir>/part-weight-resolver/config.toml`
    #[must_use]
    pub fn user_config_file() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(defaults::USER_CONFIG_DIR).join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fail = |message: String| Err(ConfigError::Validation { message });

        if self.server.bind_addr.parse::<SocketAddr>().is_err() {
            return fail(format!("server.bind_addr '{}' is not a socket address", self.server.bind_addr));
        }
        if self.vendor.timeout_seconds == 0 {
            return fail("vendor.timeout_seconds must be greater than 0".to_string());
        }
        if url::Url::parse(&self.vendor.base_url).is_err() {
            return fail(format!("vendor.base_url '{}' is not a valid URL", self.vendor.base_url));
        }
        if self.page_fetch.timeout_seconds == 0 {
            return fail("page_fetch.timeout_seconds must be greater than 0".to_string());
        }
        if self.page_fetch.max_requests_per_second == 0 {
            return fail("page_fetch.max_requests_per_second must be greater than 0".to_string());
        }
        for (name, labels) in [
            ("scraper.unit_weight_labels", &self.scraper.unit_weight_labels),
            ("scraper.net_weight_labels", &self.scraper.net_weight_labels),
            ("scraper.structured_data_keys", &self.scraper.structured_data_keys),
        ] {
            if labels.is_empty() || labels.iter().any(|l| l.trim().is_empty()) {
                return fail(format!("{name} must list at least one non-blank label"));
            }
        }
        if let Some(entry) = self.catalog.iter().find(|e| e.part.trim().is_empty()) {
            return fail(format!("catalog entry with weight '{}' has an empty part", entry.weight));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(config.vendor.api_key().is_none());
        assert!(config.page_fetch.enabled);
    }

    #[test]
    fn test_load_from_file_with_api_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resolver.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            r#"
[vendor]
timeout_seconds = 3

[page_fetch]
enabled = false

[[catalog]]
part = "71-CRCW0805-1.0K"
weight = "5.5 mg"
"#
        )
        .unwrap();

        let config = AppConfig::load_from(&[path], Some("secret".to_string())).unwrap();
        assert_eq!(config.vendor.timeout_seconds, 3);
        assert_eq!(config.vendor.base_url, defaults::VENDOR_BASE_URL);
        assert!(!config.page_fetch.enabled);
        assert_eq!(config.vendor.api_key(), Some("secret"));
        assert_eq!(config.catalog.len(), 1);
        assert_eq!(config.catalog[0].part, "71-CRCW0805-1.0K");
    }

    #[test]
    fn test_missing_file_is_skipped() {
        let config =
            AppConfig::load_from(&[PathBuf::from("/nonexistent/resolver.toml")], None).unwrap();
        assert!(config.vendor.api_key().is_none());
    }

    #[test]
    fn test_blank_api_key_is_missing() {
        let vendor = VendorConfig {
            api_key: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(vendor.api_key().is_none());
    }

    #[test]
    fn test_validation_rejects_zero_timeouts() {
        let mut config = AppConfig::default();
        config.page_fetch.timeout_seconds = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_validation_rejects_empty_scraper_labels() {
        let mut config = AppConfig::default();
        config.scraper.unit_weight_labels.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));

        let mut config = AppConfig::default();
        config.scraper.structured_data_keys = vec!["  ".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));

        let mut config = AppConfig::default();
        config.scraper.net_weight_labels = vec!["Net Weight".to_string(), String::new()];
        assert!(matches!(config.validate(), Err(ConfigError::Validation { .. })));
    }

    #[test]
    fn test_summary_hides_api_key() {
        let mut config = AppConfig::default();
        assert_eq!(
            config.summary(),
            "vendor: Mouser, credential: missing, catalog entries: 0, page fetch: on"
        );

        config.vendor.api_key = Some("secret".to_string());
        let summary = config.summary();
        assert!(summary.contains("credential: present"));
        assert!(!summary.contains("secret"));
    }

    #[test]
    fn test_api_key_is_redacted() {
        let vendor = VendorConfig {
            api_key: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(!format!("{vendor:?}").contains("secret"));
    }
}
