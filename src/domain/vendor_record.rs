//! Vendor search record
//!
//! A single candidate part returned by the vendor search. The payload is
//! untrusted and its shape varies between API revisions, so the record keeps
//! the raw fields for the weight extractor and normalizes the attribute
//! collection exactly once, at construction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::resolution::PartMetadata;

/// Key holding the named attribute collection
const ATTRIBUTES_KEY: &str = "ProductAttributes";

/// Placeholder values that vendors use for "no data"
const EMPTY_MARKERS: [&str; 4] = ["-", "n/a", "na", "tbd"];

/// One name/value attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub name: String,
    pub value: String,
}

/// Candidate part entry from the vendor search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub metadata: PartMetadata,
    pub attributes: Vec<ProductAttribute>,
    fields: Map<String, Value>,
}

impl VendorRecord {
    /// Build a record from one entry of the vendor's part list.
    /// Non-object entries yield an empty record.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        let Some(fields) = value.as_object() else {
            return Self::default();
        };

        let text = |key: &str| fields.get(key).and_then(value_text);
        let metadata = PartMetadata {
            description: text("Description"),
            manufacturer: text("Manufacturer"),
            manufacturer_part_number: text("ManufacturerPartNumber"),
            vendor_part_number: text("MouserPartNumber"),
            product_url: text("ProductDetailUrl"),
            datasheet_url: text("DataSheetUrl"),
        };

        let attributes = fields
            .get(ATTRIBUTES_KEY)
            .map(normalize_attributes)
            .unwrap_or_default();

        Self {
            metadata,
            attributes,
            fields: fields.clone(),
        }
    }

    /// Raw field access for extractors that know specific field names
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Text form of a scalar field; empty strings and placeholders yield `None`
    #[must_use]
    pub fn field_text(&self, name: &str) -> Option<String> {
        self.field(name).and_then(value_text)
    }

    /// Whether the manufacturer part number equals `identifier`, ignoring case
    #[must_use]
    pub fn matches_manufacturer_part(&self, identifier: &str) -> bool {
        self.metadata
            .manufacturer_part_number
            .as_deref()
            .is_some_and(|mpn| mpn.trim().eq_ignore_ascii_case(identifier.trim()))
    }

    /// Text used for package-size detection
    #[must_use]
    pub fn inference_text(&self, identifier: &str) -> String {
        [
            Some(identifier),
            self.metadata.manufacturer_part_number.as_deref(),
            self.metadata.vendor_part_number.as_deref(),
            self.metadata.description.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
    }
}

/// Text of a scalar JSON value, skipping empty and placeholder values
pub(crate) fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => clean_text(s),
        // f64 Display never switches to exponent form
        Value::Number(n) if n.is_f64() => n.as_f64().map(|f| f.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Trimmed text, or `None` for empty strings and placeholders
pub(crate) fn clean_text(text: &str) -> Option<String> {
    let text = text.trim();
    if text.is_empty() || EMPTY_MARKERS.contains(&text.to_ascii_lowercase().as_str()) {
        None
    } else {
        Some(text.to_string())
    }
}

/// Flatten the attribute collection.
///
/// Accepted shapes: `[ {..}, {..} ]` or `{ "<Wrapper>": [ {..} ] }`.
fn normalize_attributes(collection: &Value) -> Vec<ProductAttribute> {
    let entries = match collection {
        Value::Array(items) => items.as_slice(),
        Value::Object(wrapper) => wrapper
            .values()
            .find_map(Value::as_array)
            .map_or(&[][..], Vec::as_slice),
        _ => &[],
    };

    entries.iter().filter_map(parse_attribute).collect()
}

fn parse_attribute(entry: &Value) -> Option<ProductAttribute> {
    let obj = entry.as_object()?;
    let pick = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| obj.get(*k))
            .and_then(Value::as_str)
            .map(str::trim)
            .map(ToString::to_string)
    };
    let name = pick(&["AttributeName", "Name", "name"])?;
    let value = pick(&["AttributeValue", "Value", "value"]).unwrap_or_default();
    if name.is_empty() {
        return None;
    }
    Some(ProductAttribute { name, value })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_extraction() {
        let record = VendorRecord::from_json(&json!({
            "Description": "Thick Film Resistors - SMD 1K 1% 0805",
            "Manufacturer": "Vishay",
            "ManufacturerPartNumber": "CRCW08051K00FKEA",
            "MouserPartNumber": "71-CRCW0805-1.0K",
            "ProductDetailUrl": "https://www.mouser.com/ProductDetail/71-CRCW0805-1.0K",
            "DataSheetUrl": ""
        }));
        assert_eq!(record.metadata.manufacturer.as_deref(), Some("Vishay"));
        assert_eq!(record.metadata.vendor_part_number.as_deref(), Some("71-CRCW0805-1.0K"));
        assert_eq!(record.metadata.datasheet_url, None);
        assert!(record.matches_manufacturer_part("crcw08051k00fkea"));
    }

    #[test]
    fn test_flat_and_wrapped_attributes_normalize_identically() {
        let attrs = json!([
            { "AttributeName": "Packaging", "AttributeValue": "Reel" },
            { "AttributeName": "Unit Weight", "AttributeValue": "5.500 mg" }
        ]);
        let flat = VendorRecord::from_json(&json!({ "ProductAttributes": attrs.clone() }));
        let wrapped = VendorRecord::from_json(&json!({
            "ProductAttributes": { "ProductAttribute": attrs }
        }));
        assert_eq!(flat.attributes.len(), 2);
        assert_eq!(flat.attributes, wrapped.attributes);
        assert_eq!(flat.attributes[1].value, "5.500 mg");
    }

    #[test]
    fn test_small_numbers_are_plain_decimals() {
        let record = VendorRecord::from_json(&json!({ "UnitWeight": 0.0000055, "Weight": 12 }));
        assert_eq!(record.field_text("UnitWeight").as_deref(), Some("0.0000055"));
        assert_eq!(record.field_text("Weight").as_deref(), Some("12"));
    }

    #[test]
    fn test_placeholders_are_empty() {
        let record = VendorRecord::from_json(&json!({ "UnitWeight": "N/A", "Weight": 3 }));
        assert_eq!(record.field_text("UnitWeight"), None);
        assert_eq!(record.field_text("Weight").as_deref(), Some("3"));
    }

    #[test]
    fn test_non_object_record() {
        let record = VendorRecord::from_json(&json!("garbage"));
        assert!(record.attributes.is_empty());
        assert!(record.metadata.product_url.is_none());
    }
}
