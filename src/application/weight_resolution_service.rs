//! Weight resolution use case
//!
//! One state machine drives every lookup:
//!
//! ```text
//! Start -> [LocalCatalog] -> VendorLookup -> Found | NotFound
//! Found -> ExtractFromRecord -> Resolved | TryScrapeOrInference
//! TryScrapeOrInference -> Resolved | Unresolved
//! ```
//!
//! Measured data always outranks estimates: vendor fields, then vendor
//! attributes, then the product page, and only then the package table.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use super::WeightError;
use crate::domain::part_query::PartQuery;
use crate::domain::resolution::{
    PartMetadata, ResolutionDiagnostic, ResolutionOutcome, ResolutionResult, ResolutionStage,
};
use crate::domain::services::{PackageInference, PageFetcher, UnitNormalizer, VendorSearch};
use crate::domain::vendor_record::VendorRecord;
use crate::domain::weight::{RawWeightExpression, WeightProvenance};
use crate::infrastructure::config::{AppConfig, CatalogEntry, defaults};
use crate::infrastructure::http_client::{HttpClient, HttpClientConfig};
use crate::infrastructure::parsing::{HtmlWeightScraper, VendorRecordExtractor};
use crate::infrastructure::vendor_client::MouserClient;

/// Pipeline states
#[derive(Debug)]
enum ResolutionState {
    Start,
    VendorLookup,
    Found(Vec<VendorRecord>),
    ExtractFromRecord(VendorRecord),
    TryScrapeOrInference(VendorRecord),
    Done(ResolutionResult),
}

/// Per-resolution bookkeeping
#[derive(Debug, Default)]
struct Attempts {
    stages: Vec<ResolutionStage>,
    /// First expression that was found but could not be normalized
    rejected: Option<RawWeightExpression>,
}

impl Attempts {
    fn tried(&mut self, stage: ResolutionStage) {
        if !self.stages.contains(&stage) {
            self.stages.push(stage);
        }
    }

    fn diagnostic(&self, accepted: Option<&RawWeightExpression>) -> ResolutionDiagnostic {
        let expression = accepted.or(self.rejected.as_ref());
        ResolutionDiagnostic {
            raw_expression: expression.map(|e| e.text.clone()),
            parsed_from: expression.map(|e| e.provenance.to_string()),
            attempted_stages: self.stages.clone(),
        }
    }
}

/// Resolves part weights through the fallback chain
pub struct WeightResolutionService {
    vendor: Arc<dyn VendorSearch>,
    page_fetcher: Option<Arc<dyn PageFetcher>>,
    extractor: VendorRecordExtractor,
    scraper: HtmlWeightScraper,
    normalizer: UnitNormalizer,
    packages: PackageInference,
    /// Lowercased part number -> weight expression
    catalog: HashMap<String, String>,
}

impl WeightResolutionService {
    /// Create a service from its collaborators. Without a page fetcher the
    /// scrape stage is skipped.
    #[must_use]
    pub fn new(
        vendor: Arc<dyn VendorSearch>,
        page_fetcher: Option<Arc<dyn PageFetcher>>,
        scraper: HtmlWeightScraper,
    ) -> Self {
        Self {
            vendor,
            page_fetcher,
            extractor: VendorRecordExtractor::new(),
            scraper,
            normalizer: UnitNormalizer::new(),
            packages: PackageInference::new(),
            catalog: HashMap::new(),
        }
    }

    /// Add operator-maintained weights consulted before the vendor
    #[must_use]
    pub fn with_catalog(mut self, entries: &[CatalogEntry]) -> Self {
        self.catalog = entries
            .iter()
            .map(|e| (e.part.trim().to_lowercase(), e.weight.clone()))
            .collect();
        self
    }

    /// Wire the production collaborators from configuration
    pub fn from_config(config: &AppConfig) -> Result<Self, WeightError> {
        let api_key = config
            .vendor
            .api_key()
            .ok_or_else(|| WeightError::Configuration {
                message: format!("{} is not set", defaults::API_KEY_ENV),
            })?;

        let vendor = MouserClient::new(&config.vendor, api_key).map_err(|e| {
            WeightError::Configuration {
                message: format!("vendor client: {e}"),
            }
        })?;

        let page_fetcher: Option<Arc<dyn PageFetcher>> = if config.page_fetch.enabled {
            let client =
                HttpClient::new(HttpClientConfig::from_page_fetch_config(&config.page_fetch))
                    .map_err(|e| WeightError::Configuration {
                        message: format!("page fetch client: {e:#}"),
                    })?;
            Some(Arc::new(client))
        } else {
            None
        };

        let scraper =
            HtmlWeightScraper::with_config(&config.scraper).map_err(|e| WeightError::Configuration {
                message: e.to_string(),
            })?;

        Ok(Self::new(Arc::new(vendor), page_fetcher, scraper).with_catalog(&config.catalog))
    }

    /// Run the pipeline for one query
    pub async fn resolve(&self, query: &PartQuery) -> Result<ResolutionResult, WeightError> {
        let mut attempts = Attempts::default();
        let mut state = ResolutionState::Start;

        loop {
            debug!("Resolution state for {}: {}", query.identifier(), state_name(&state));
            state = match state {
                ResolutionState::Start => self.start(query, &mut attempts),
                ResolutionState::VendorLookup => self.vendor_lookup(query, &attempts).await?,
                ResolutionState::Found(records) => {
                    ResolutionState::ExtractFromRecord(select_record(records, query.identifier()))
                }
                ResolutionState::ExtractFromRecord(record) => {
                    self.extract_from_record(query, record, &mut attempts)
                }
                ResolutionState::TryScrapeOrInference(record) => {
                    self.scrape_or_infer(query, record, &mut attempts).await
                }
                ResolutionState::Done(result) => {
                    info!(
                        "Resolved {} x{} via {} ({:?})",
                        query.identifier(),
                        query.quantity(),
                        result.stage,
                        result.weight().map(|w| w.pounds())
                    );
                    return Ok(result);
                }
            };
        }
    }

    fn start(&self, query: &PartQuery, attempts: &mut Attempts) -> ResolutionState {
        let Some(text) = self.catalog.get(&query.identifier().to_lowercase()) else {
            return ResolutionState::VendorLookup;
        };

        attempts.tried(ResolutionStage::LocalCatalog);
        let expression = RawWeightExpression::new(text.clone(), WeightProvenance::LocalCatalog);
        let stage = ResolutionStage::LocalCatalog;
        match self.accept(query, expression, stage, PartMetadata::default(), attempts) {
            Some(result) => ResolutionState::Done(result),
            None => {
                warn!("Catalog weight for {} is not parsable: '{}'", query.identifier(), text);
                ResolutionState::VendorLookup
            }
        }
    }

    async fn vendor_lookup(
        &self,
        query: &PartQuery,
        attempts: &Attempts,
    ) -> Result<ResolutionState, WeightError> {
        let records = self.vendor.search_part(query.identifier()).await?;

        if records.is_empty() {
            info!("{} has no record for {}", self.vendor.vendor_name(), query.identifier());
            return Ok(ResolutionState::Done(ResolutionResult::unresolved(
                query.quantity(),
                ResolutionOutcome::NotFound,
                PartMetadata::default(),
                attempts.diagnostic(None),
            )));
        }
        Ok(ResolutionState::Found(records))
    }

    fn extract_from_record(
        &self,
        query: &PartQuery,
        record: VendorRecord,
        attempts: &mut Attempts,
    ) -> ResolutionState {
        attempts.tried(ResolutionStage::VendorField);
        if let Some(expression) = self.extractor.extract_direct_field(&record) {
            if let Some(result) = self.accept(
                query,
                expression,
                ResolutionStage::VendorField,
                record.metadata.clone(),
                attempts,
            ) {
                return ResolutionState::Done(result);
            }
        }

        attempts.tried(ResolutionStage::VendorAttribute);
        if let Some(expression) = self.extractor.extract_named_attribute(&record) {
            if let Some(result) = self.accept(
                query,
                expression,
                ResolutionStage::VendorAttribute,
                record.metadata.clone(),
                attempts,
            ) {
                return ResolutionState::Done(result);
            }
        }

        ResolutionState::TryScrapeOrInference(record)
    }

    async fn scrape_or_infer(
        &self,
        query: &PartQuery,
        record: VendorRecord,
        attempts: &mut Attempts,
    ) -> ResolutionState {
        let metadata = record.metadata.clone();

        if let (Some(fetcher), Some(url)) = (&self.page_fetcher, metadata.product_url.as_deref()) {
            attempts.tried(ResolutionStage::HtmlScrape);
            if let Some(expression) = self.scraper.scrape(fetcher.as_ref(), url).await {
                if let Some(result) = self.accept(
                    query,
                    expression,
                    ResolutionStage::HtmlScrape,
                    metadata.clone(),
                    attempts,
                ) {
                    return ResolutionState::Done(result);
                }
            }
        }

        attempts.tried(ResolutionStage::PackageInference);
        let text = record.inference_text(query.identifier());
        if let Some(found) = self.packages.detect(&text) {
            debug!("Detected package {} (bounded: {}) in '{}'", found.code, found.bounded, text);
            if let Some(result) = self.accept(
                query,
                found.to_expression(),
                ResolutionStage::PackageInference,
                metadata.clone(),
                attempts,
            ) {
                return ResolutionState::Done(result);
            }
        }

        ResolutionState::Done(ResolutionResult::unresolved(
            query.quantity(),
            ResolutionOutcome::WeightUnresolved,
            metadata,
            attempts.diagnostic(None),
        ))
    }

    /// Normalize a stage's expression; `None` lets the chain advance
    fn accept(
        &self,
        query: &PartQuery,
        expression: RawWeightExpression,
        stage: ResolutionStage,
        metadata: PartMetadata,
        attempts: &mut Attempts,
    ) -> Option<ResolutionResult> {
        let Some(unit_weight) = self.normalizer.normalize(&expression) else {
            debug!("Unparsable weight '{}' from {}", expression.text, expression.provenance);
            attempts.rejected.get_or_insert(expression);
            return None;
        };

        let source = self.source_label(&expression.provenance);
        let diagnostic = attempts.diagnostic(Some(&expression));
        Some(ResolutionResult::resolved(
            query.quantity(),
            unit_weight,
            stage,
            source,
            metadata,
            diagnostic,
        ))
    }

    fn source_label(&self, provenance: &WeightProvenance) -> String {
        let vendor = self.vendor.vendor_name();
        match provenance {
            WeightProvenance::LocalCatalog => "Local catalog".to_string(),
            WeightProvenance::DirectField { field } => format!("{vendor} API field ({field})"),
            WeightProvenance::NamedAttribute { name } => format!("{vendor} API attribute ({name})"),
            WeightProvenance::HtmlScrape { pattern } => format!("{vendor} product page ({pattern})"),
            WeightProvenance::PackageInference { code } => {
                format!("Estimated from {code} package size")
            }
        }
    }
}

/// Exact manufacturer part number match, else the vendor's first record
fn select_record(records: Vec<VendorRecord>, identifier: &str) -> VendorRecord {
    let exact = records
        .iter()
        .position(|r| r.matches_manufacturer_part(identifier))
        .unwrap_or(0);
    records.into_iter().nth(exact).unwrap_or_default()
}

const fn state_name(state: &ResolutionState) -> &'static str {
    match state {
        ResolutionState::Start => "Start",
        ResolutionState::VendorLookup => "VendorLookup",
        ResolutionState::Found(_) => "Found",
        ResolutionState::ExtractFromRecord(_) => "ExtractFromRecord",
        ResolutionState::TryScrapeOrInference(_) => "TryScrapeOrInference",
        ResolutionState::Done(_) => "Done",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_select_record_prefers_exact_mpn() {
        let records = vec![
            VendorRecord::from_json(&json!({ "ManufacturerPartNumber": "ABC-1" })),
            VendorRecord::from_json(&json!({ "ManufacturerPartNumber": "abc" })),
        ];
        let chosen = select_record(records, "ABC");
        assert_eq!(chosen.metadata.manufacturer_part_number.as_deref(), Some("abc"));
    }

    #[test]
    fn test_select_record_falls_back_to_first() {
        let records = vec![
            VendorRecord::from_json(&json!({ "ManufacturerPartNumber": "X1" })),
            VendorRecord::from_json(&json!({ "ManufacturerPartNumber": "X2" })),
        ];
        let chosen = select_record(records, "ABC");
        assert_eq!(chosen.metadata.manufacturer_part_number.as_deref(), Some("X1"));
    }

    #[test]
    fn test_from_config_requires_api_key() {
        let config = AppConfig::default();
        let err = WeightResolutionService::from_config(&config).err().unwrap();
        assert_eq!(
            err,
            WeightError::Configuration {
                message: "MOUSER_API_KEY is not set".to_string()
            }
        );
    }

    #[test]
    fn test_attempts_deduplicate() {
        let mut attempts = Attempts::default();
        attempts.tried(ResolutionStage::VendorField);
        attempts.tried(ResolutionStage::VendorField);
        assert_eq!(attempts.diagnostic(None).attempted_stages, vec![ResolutionStage::VendorField]);
    }
}
