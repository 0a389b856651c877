//! The untrusted structure returned by the extraction service

use crate::ImportError;
use serde_json::{Map, Value};

/// Fields read from the recovered JSON object
///
/// Every field is optional. Text fields accept strings or numbers; blank
/// strings count as absent. Items stay untyped until the item normalizer
/// coerces them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawExtraction {
    /// Administrative process number
    pub process_number: Option<String>,

    /// Bidding modality
    pub modality: Option<String>,

    /// Procurement object
    pub object: Option<String>,

    /// Reference year
    pub year: Option<String>,

    /// Supplier name as written in the document
    pub supplier_name: Option<String>,

    /// Supplier tax id as written in the document
    pub supplier_identifier: Option<String>,

    /// Raw items
    pub items: Vec<Value>,
}

impl RawExtraction {
    /// Read the known fields of a recovered root object
    ///
    /// # Errors
    ///
    /// `UnparsableResponse` if the root is not a JSON object.
    pub fn from_value(value: &Value) -> Result<Self, ImportError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ImportError::UnparsableResponse {
                preview: value.to_string().chars().take(500).collect(),
            })?;

        let supplier_identifier = ["supplierIdentifier", "supplierCNPJ", "supplierCnpj"]
            .iter()
            .find_map(|key| text_field(obj, key));

        Ok(Self {
            process_number: text_field(obj, "processNumber"),
            modality: text_field(obj, "modality"),
            object: text_field(obj, "object"),
            year: text_field(obj, "year"),
            supplier_name: text_field(obj, "supplierName"),
            supplier_identifier,
            items: obj
                .get("items")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        })
    }
}

/// A trimmed, non-blank string or number field
pub(crate) fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
