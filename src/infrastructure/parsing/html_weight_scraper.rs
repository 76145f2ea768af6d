//! Product page weight scraper
//!
//! Best-effort extraction of a unit weight from vendor product pages. Page
//! layouts are outside our control, so every strategy may simply find
//! nothing; fetch errors, blocked requests and odd markup all end in `None`.

#![allow(clippy::uninlined_format_args)]

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, warn};

use super::config::WeightScraperConfig;
use super::error::{ParsingError, ParsingResult};
use crate::domain::services::PageFetcher;
use crate::domain::weight::{RawWeightExpression, WeightProvenance};

/// `1,234` style separators between digit groups
static THOUSANDS_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d),(\d{3})").expect("separator pattern is a valid regex"));

/// Extraction strategies, most specific first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrapePattern {
    UnitWeightTable,
    NetWeightTable,
    PlainText,
    StructuredData,
}

impl ScrapePattern {
    pub const ORDER: [Self; 4] = [
        Self::UnitWeightTable,
        Self::NetWeightTable,
        Self::PlainText,
        Self::StructuredData,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::UnitWeightTable => "Unit Weight table",
            Self::NetWeightTable => "Net Weight table",
            Self::PlainText => "Unit Weight text",
            Self::StructuredData => "structured data",
        }
    }
}

/// Scraper with pre-compiled selectors and patterns
#[derive(Debug)]
pub struct HtmlWeightScraper {
    row_selector: Selector,
    cell_selector: Selector,
    unit_weight_labels: Vec<String>,
    net_weight_labels: Vec<String>,
    plain_text_pattern: Regex,
    structured_data_pattern: Regex,
}

impl HtmlWeightScraper {
    /// Create a scraper with the default configuration
    pub fn new() -> ParsingResult<Self> {
        Self::with_config(&WeightScraperConfig::default())
    }

    /// Create a scraper with custom labels and selectors
    pub fn with_config(config: &WeightScraperConfig) -> ParsingResult<Self> {
        let plain_labels = alternation("unit_weight_labels", &config.unit_weight_labels)?;
        let plain_text_pattern = Regex::new(&format!(
            r"(?i)(?:{plain_labels})\s*:\s*(-?[0-9][0-9.,]*(?:e[+-]?[0-9]+)?\s*[a-z]+)"
        ))
        .map_err(|e| ParsingError::invalid_pattern("plain_text", e))?;

        let keys = alternation("structured_data_keys", &config.structured_data_keys)?;
        let structured_data_pattern =
            Regex::new(&format!(r#"(?i)"(?:{keys})"\s*:\s*"([^"]{{1,64}})""#))
                .map_err(|e| ParsingError::invalid_pattern("structured_data", e))?;

        Ok(Self {
            row_selector: compile_selector(&config.row_selector)?,
            cell_selector: compile_selector(&config.cell_selector)?,
            unit_weight_labels: normalize_labels(&config.unit_weight_labels),
            net_weight_labels: normalize_labels(&config.net_weight_labels),
            plain_text_pattern,
            structured_data_pattern,
        })
    }

    /// Fetch `url` and extract a weight. Never fails: problems yield `None`.
    pub async fn scrape(&self, fetcher: &dyn PageFetcher, url: &str) -> Option<RawWeightExpression> {
        if let Err(e) = validate_url(url) {
            warn!("Skipping product page scrape: {}", e);
            return None;
        }

        let html = match fetcher.fetch_page(url).await {
            Ok(html) => html,
            Err(e) => {
                let err = ParsingError::PageFetchFailed {
                    url: url.to_string(),
                    message: format!("{e:#}"),
                };
                warn!("{}", err);
                return None;
            }
        };

        match self.extract(&html) {
            Ok(expression) => Some(expression),
            Err(e) => {
                debug!("{} at {}", e, url);
                None
            }
        }
    }

    /// Run every strategy over the page until one matches
    pub fn extract(&self, html: &str) -> ParsingResult<RawWeightExpression> {
        let document = Html::parse_document(html);

        for pattern in ScrapePattern::ORDER {
            let found = match pattern {
                ScrapePattern::UnitWeightTable => {
                    self.extract_from_tables(&document, &self.unit_weight_labels)
                }
                ScrapePattern::NetWeightTable => {
                    self.extract_from_tables(&document, &self.net_weight_labels)
                }
                ScrapePattern::PlainText => self.extract_from_text(&document),
                ScrapePattern::StructuredData => self.extract_from_structured_data(html),
            };

            if let Some(text) = found.as_deref().and_then(clean_value) {
                debug!("Scraped weight '{}' via {}", text, pattern.label());
                return Ok(RawWeightExpression::new(
                    text,
                    WeightProvenance::HtmlScrape {
                        pattern: pattern.label().to_string(),
                    },
                ));
            }
        }

        Err(ParsingError::WeightNotFound {
            tried_patterns: ScrapePattern::ORDER
                .iter()
                .map(|p| p.label().to_string())
                .collect(),
        })
    }

    /// Label cell followed by a value cell in the same row
    fn extract_from_tables(&self, document: &Html, labels: &[String]) -> Option<String> {
        for row in document.select(&self.row_selector) {
            let cells: Vec<ElementRef<'_>> = row.select(&self.cell_selector).collect();
            for pair in cells.windows(2) {
                let label = normalize_label(&element_text(pair[0]));
                if labels.contains(&label) {
                    let value = element_text(pair[1]);
                    if !value.trim().is_empty() {
                        return Some(value);
                    }
                }
            }
        }
        None
    }

    /// "Unit Weight: 5.5 mg" in the visible text
    fn extract_from_text(&self, document: &Html) -> Option<String> {
        let text = document.root_element().text().collect::<Vec<_>>().join(" ");
        self.plain_text_pattern
            .captures(&text)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }

    /// `"unitWeight": "5.5 mg"` inside scripts or data attributes
    fn extract_from_structured_data(&self, html: &str) -> Option<String> {
        self.structured_data_pattern
            .captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    }
}

fn compile_selector(selector: &str) -> ParsingResult<Selector> {
    Selector::parse(selector).map_err(|e| ParsingError::invalid_selector(selector, e))
}

fn validate_url(url: &str) -> ParsingResult<()> {
    let parsed = url::Url::parse(url).map_err(|e| ParsingError::UnsupportedUrl {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ParsingError::UnsupportedUrl {
            url: url.to_string(),
            reason: format!("scheme '{other}' is not fetched"),
        }),
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

/// Lowercase, single-spaced, without a trailing colon
fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .trim_end_matches(':')
        .trim()
        .to_lowercase()
}

fn normalize_labels(labels: &[String]) -> Vec<String> {
    labels.iter().map(|l| normalize_label(l)).collect()
}

/// Regex alternation of literal labels; inner spaces match any whitespace.
/// An empty alternative would match every `: <value>` pair, so blanks are rejected.
fn alternation(name: &str, labels: &[String]) -> ParsingResult<String> {
    if labels.is_empty() || labels.iter().any(|l| l.trim().is_empty()) {
        return Err(ParsingError::invalid_pattern(name, "label list is empty or has a blank entry"));
    }
    Ok(labels
        .iter()
        .map(|l| {
            l.split_whitespace()
                .map(regex::escape)
                .collect::<Vec<_>>()
                .join(r"\s*")
        })
        .collect::<Vec<_>>()
        .join("|"))
}

/// Strip thousands separators and surrounding whitespace
fn clean_value(raw: &str) -> Option<String> {
    let mut text = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    loop {
        let stripped = THOUSANDS_SEPARATOR.replace_all(&text, "$1$2").into_owned();
        if stripped == text {
            break;
        }
        text = stripped;
    }
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scraper() -> HtmlWeightScraper {
        HtmlWeightScraper::new().unwrap()
    }

    #[test]
    fn test_unit_weight_table() {
        let html = r#"
            <table class="specs">
              <tr><th>Packaging</th><td>Reel</td></tr>
              <tr><th>Unit Weight:</th><td>&nbsp;1,234.5 mg </td></tr>
            </table>"#;
        let found = scraper().extract(html).unwrap();
        assert_eq!(found.text, "1234.5 mg");
        assert_eq!(
            found.provenance,
            WeightProvenance::HtmlScrape { pattern: "Unit Weight table".into() }
        );
    }

    #[test]
    fn test_unit_weight_outranks_net_weight() {
        let html = r"
            <table>
              <tr><td>Net Weight</td><td>9 g</td></tr>
              <tr><td>Unit Weight</td><td>7 g</td></tr>
            </table>";
        assert_eq!(scraper().extract(html).unwrap().text, "7 g");
    }

    #[test]
    fn test_net_weight_table() {
        let html = "<table><tr><td>Net  weight</td><td>0.5 oz</td></tr></table>";
        let found = scraper().extract(html).unwrap();
        assert_eq!(found.text, "0.5 oz");
        assert_eq!(
            found.provenance,
            WeightProvenance::HtmlScrape { pattern: "Net Weight table".into() }
        );
    }

    #[test]
    fn test_plain_text() {
        let html = "<div><p>Specifications</p><span>Unit Weight: 2,500 mg</span></div>";
        assert_eq!(scraper().extract(html).unwrap().text, "2500 mg");
    }

    #[test]
    fn test_plain_text_exponent() {
        let html = "<span>Unit Weight: 5.5e-3 g</span>";
        assert_eq!(scraper().extract(html).unwrap().text, "5.5e-3 g");
    }

    #[test]
    fn test_structured_data() {
        let html = r#"<script>window.__DATA__ = {"sku":"x","unitWeight": "0.035274 oz"};</script>"#;
        let found = scraper().extract(html).unwrap();
        assert_eq!(found.text, "0.035274 oz");
        assert_eq!(
            found.provenance,
            WeightProvenance::HtmlScrape { pattern: "structured data".into() }
        );
    }

    #[test]
    fn test_malformed_html_is_not_an_error_source() {
        let html = "<table><tr><td>Unit Weight<td><td></table></div></span><<<>>";
        assert!(matches!(
            scraper().extract(html),
            Err(ParsingError::WeightNotFound { .. })
        ));
    }

    #[test]
    fn test_clean_value() {
        assert_eq!(clean_value(" 1,234,567 mg ").as_deref(), Some("1234567 mg"));
        assert_eq!(clean_value("   ").as_deref(), None);
    }

    #[test]
    fn test_invalid_selector_config() {
        let config = WeightScraperConfig {
            row_selector: "tr[[".to_string(),
            ..Default::default()
        };
        let err = HtmlWeightScraper::with_config(&config).unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_empty_label_lists_are_rejected() {
        let config = WeightScraperConfig {
            unit_weight_labels: Vec::new(),
            ..Default::default()
        };
        let err = HtmlWeightScraper::with_config(&config).unwrap_err();
        assert!(err.is_configuration_error());

        let config = WeightScraperConfig {
            structured_data_keys: vec![" ".to_string()],
            ..Default::default()
        };
        assert!(HtmlWeightScraper::with_config(&config).is_err());
    }

    struct FixedPage(Option<&'static str>);

    #[async_trait::async_trait]
    impl PageFetcher for FixedPage {
        async fn fetch_page(&self, url: &str) -> anyhow::Result<String> {
            self.0
                .map(ToString::to_string)
                .ok_or_else(|| anyhow::anyhow!("HTTP request failed with status 403 Forbidden: {url}"))
        }
    }

    #[test]
    fn test_scrape_swallows_fetch_failures() {
        let found = tokio_test::block_on(
            scraper().scrape(&FixedPage(None), "https://www.mouser.com/ProductDetail/x"),
        );
        assert!(found.is_none());
    }

    #[test]
    fn test_scrape_fetched_page() {
        let page = FixedPage(Some("<p>Unit Weight: 12 g</p>"));
        let found =
            tokio_test::block_on(scraper().scrape(&page, "https://www.mouser.com/ProductDetail/x"));
        assert_eq!(found.map(|e| e.text).as_deref(), Some("12 g"));
    }

    #[test]
    fn test_scrape_skips_unsupported_scheme() {
        let page = FixedPage(Some("<p>Unit Weight: 12 g</p>"));
        assert!(tokio_test::block_on(scraper().scrape(&page, "ftp://example.com/x")).is_none());
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("https://www.mouser.com/ProductDetail/x").is_ok());
        assert!(validate_url("file:///etc/passwd").is_err());
        assert!(validate_url("not a url").is_err());
    }
}
