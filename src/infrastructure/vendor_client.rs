//! Mouser part-number search client
//!
//! One POST per resolution. Responses are treated as untrusted JSON: the
//! error envelope and the part list are picked out of a `serde_json::Value`
//! and each part is normalized by [`VendorRecord::from_json`].

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::domain::services::{VendorSearch, VendorSearchError};
use crate::domain::vendor_record::VendorRecord;
use crate::infrastructure::config::VendorConfig;

/// Longest upstream body forwarded as error details
const MAX_DETAILS_CHARS: usize = 500;

/// Mouser search API client
pub struct MouserClient {
    client: Client,
    name: String,
    endpoint: String,
    api_key: String,
    search_option: String,
}

impl MouserClient {
    /// Build a client; the API key must already be validated by the caller
    pub fn new(config: &VendorConfig, api_key: &str) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            name: config.name.clone(),
            endpoint: format!("{}/search/partnumber", config.base_url.trim_end_matches('/')),
            api_key: api_key.to_string(),
            search_option: config.search_option.clone(),
        })
    }

    fn request_body(&self, identifier: &str) -> Value {
        json!({
            "SearchByPartRequest": {
                "mouserPartNumber": identifier,
                "partSearchOptions": self.search_option,
            }
        })
    }
}

#[async_trait]
impl VendorSearch for MouserClient {
    fn vendor_name(&self) -> &str {
        &self.name
    }

    async fn search_part(&self, identifier: &str) -> Result<Vec<VendorRecord>, VendorSearchError> {
        info!("Searching {} for part {}", self.name, identifier);

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("apiKey", self.api_key.as_str())])
            .json(&self.request_body(identifier))
            .send()
            .await
            .map_err(|e| {
                error!("{} search request failed: {}", self.name, e);
                VendorSearchError::Transport {
                    message: if e.is_timeout() {
                        format!("{} search timed out", self.name)
                    } else {
                        e.without_url().to_string()
                    },
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| VendorSearchError::Transport {
            message: e.without_url().to_string(),
        })?;

        if !status.is_success() {
            error!("{} search returned status {}", self.name, status);
            return Err(VendorSearchError::Status {
                status: status.as_u16(),
                details: truncate(&body, MAX_DETAILS_CHARS),
            });
        }

        let payload: Value =
            serde_json::from_str(&body).map_err(|e| VendorSearchError::MalformedPayload {
                message: e.to_string(),
            })?;
        let records = parse_search_response(&payload)?;
        debug!("{} returned {} candidate(s) for {}", self.name, records.len(), identifier);
        Ok(records)
    }
}

/// Extract candidate records from a search response body
pub fn parse_search_response(payload: &Value) -> Result<Vec<VendorRecord>, VendorSearchError> {
    let messages: Vec<String> = payload
        .get("Errors")
        .and_then(Value::as_array)
        .map(|errors| errors.iter().filter_map(error_message).collect())
        .unwrap_or_default();
    if !messages.is_empty() {
        return Err(VendorSearchError::Api { messages });
    }

    let results = payload
        .get("SearchResults")
        .ok_or_else(|| VendorSearchError::MalformedPayload {
            message: "missing SearchResults".to_string(),
        })?;

    // A null or absent part list means nothing matched
    match results.get("Parts") {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(parts)) => Ok(parts.iter().map(VendorRecord::from_json).collect()),
        Some(_) => Err(VendorSearchError::MalformedPayload {
            message: "SearchResults.Parts is not a list".to_string(),
        }),
    }
}

fn error_message(error: &Value) -> Option<String> {
    match error {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("Message")
            .or_else(|| obj.get("Code"))
            .and_then(Value::as_str)
            .map(ToString::to_string),
        _ => None,
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= max_chars {
        trimmed.to_string()
    } else {
        let mut cut: String = trimmed.chars().take(max_chars).collect();
        cut.push('…');
        cut
    }
}
