//! Coercion of raw items into canonical line items

use crate::raw::text_field;
use licita_domain::{IdGenerator, ItemId, LineItem};
use serde_json::Value;
use tracing::warn;

/// Turns raw item objects into [`LineItem`]s
///
/// Never fails: missing or unparsable numbers become zero and a raw item that
/// is not an object becomes a zero-valued item with the placeholder labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemNormalizer {
    default_lot: String,
    default_unit: String,
}

impl ItemNormalizer {
    /// Create a normalizer with the given placeholder labels
    pub fn new(default_lot: impl Into<String>, default_unit: impl Into<String>) -> Self {
        Self {
            default_lot: default_lot.into(),
            default_unit: default_unit.into(),
        }
    }

    /// Normalize every raw item, in order
    pub fn normalize_all(&self, raw_items: &[Value], ids: &dyn IdGenerator) -> Vec<LineItem> {
        raw_items
            .iter()
            .map(|raw| self.normalize(raw, ids))
            .collect()
    }

    /// Normalize one raw item
    ///
    /// # Examples
    ///
    /// ```
    /// use licita_domain::SequentialIdGenerator;
    /// use licita_extractor::ItemNormalizer;
    /// use serde_json::json;
    ///
    /// let normalizer = ItemNormalizer::new("Lote Único", "UND");
    /// let item = normalizer.normalize(
    ///     &json!({"description": "Caneta", "quantity": "10", "unitPrice": "R$ 1,50"}),
    ///     &SequentialIdGenerator::new(),
    /// );
    /// assert_eq!(item.lot, "Lote Único");
    /// assert_eq!(item.total_price(), 15.0);
    /// ```
    pub fn normalize(&self, raw: &Value, ids: &dyn IdGenerator) -> LineItem {
        let id = ItemId::generate(ids);

        let Some(obj) = raw.as_object() else {
            warn!(raw = %raw, "Raw item is not an object; keeping an empty item");
            return LineItem::new(id, 0.0, 0.0)
                .with_lot(self.default_lot.as_str())
                .with_unit(self.default_unit.as_str());
        };

        let number = |key: &str| obj.get(key).and_then(coerce_number);

        let item = LineItem::new(
            id,
            number("quantity").unwrap_or(0.0),
            number("unitPrice").unwrap_or(0.0),
        )
        .with_lot(
            text_field(obj, "lote")
                .or_else(|| text_field(obj, "lot"))
                .unwrap_or_else(|| self.default_lot.clone()),
        )
        .with_item_number(number("itemNumber").map_or(0, to_item_number))
        .with_description(text_field(obj, "description").unwrap_or_default())
        .with_brand(text_field(obj, "brand").unwrap_or_default())
        .with_unit(text_field(obj, "unit").unwrap_or_else(|| self.default_unit.clone()));

        match number("totalPrice") {
            Some(total) => item.with_explicit_total(total),
            None => item,
        }
    }
}

fn to_item_number(value: f64) -> u32 {
    if value.is_finite() && value > 0.0 {
        // Saturating cast; fractions are truncated
        value as u32
    } else {
        0
    }
}

/// Read a JSON number or numeric string
///
/// Strings may carry a currency prefix (`R$`) and Brazilian formatting
/// (`1.050,50`).
pub fn coerce_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_numeric_text(s),
        _ => None,
    };
    number.filter(|n| n.is_finite())
}

fn parse_numeric_text(text: &str) -> Option<f64> {
    let text = text.trim();
    let currency = text.strip_prefix("R$").or_else(|| text.strip_prefix("r$"));
    let is_currency = currency.is_some();
    let text = currency.unwrap_or(text);
    let compact: String = text
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();
    if compact.is_empty() {
        return None;
    }

    let normalized = match (compact.rfind(','), compact.rfind('.')) {
        // 1.050,50 (decimal comma after thousands dots)
        (Some(comma), Some(dot)) if comma > dot => compact.replace('.', "").replace(',', "."),
        // 1,050.50
        (Some(_), Some(_)) => compact.replace(',', ""),
        // 1,5
        (Some(_), None) => compact.replace(',', "."),
        // 1.050.000
        (None, Some(_)) if compact.matches('.').count() > 1 => compact.replace('.', ""),
        // R$ 1.050 (a currency amount with three digits after a single dot)
        (None, Some(dot)) if is_currency && is_thousands_group(&compact[dot + 1..]) => {
            compact.replace('.', "")
        }
        _ => compact,
    };

    normalized.parse::<f64>().ok()
}

fn is_thousands_group(digits: &str) -> bool {
    digits.len() == 3 && digits.bytes().all(|b| b.is_ascii_digit())
}
