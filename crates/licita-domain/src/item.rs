//! Line items - the priced rows of a procurement record

use crate::id::ItemId;
use serde::{Deserialize, Serialize};

/// A canonical line item
///
/// Labels are plain public fields; the amounts are private so the total can
/// only change through [`LineItem::with_quantity`] and
/// [`LineItem::with_unit_price`], which recompute it.
///
/// The total equals `quantity * unit_price` unless the item was created with
/// an explicit non-zero total that has not been edited since. Deserialized
/// items go through the same constructor, so a stored total is only kept when
/// it is flagged explicit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredLineItem")]
pub struct LineItem {
    id: ItemId,

    /// Lot label grouping items of the same bidding batch
    pub lot: String,

    /// Sequence number within the document
    pub item_number: u32,

    /// Free-text description
    pub description: String,

    /// Brand offered by the supplier
    pub brand: String,

    /// Unit label (UND, CX, KG, ...)
    pub unit: String,

    quantity: f64,
    unit_price: f64,
    total_price: f64,

    #[serde(default)]
    explicit_total: bool,
}

impl LineItem {
    /// Create an item with empty labels and a computed total
    ///
    /// Negative or non-finite amounts become zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use licita_domain::{ItemId, LineItem};
    ///
    /// let item = LineItem::new(ItemId::from_value(1), 2.0, 10.0).with_description("Pens");
    /// assert_eq!(item.total_price(), 20.0);
    /// ```
    pub fn new(id: ItemId, quantity: f64, unit_price: f64) -> Self {
        let quantity = sanitize_amount(quantity);
        let unit_price = sanitize_amount(unit_price);
        Self {
            id,
            lot: String::new(),
            item_number: 0,
            description: String::new(),
            brand: String::new(),
            unit: String::new(),
            quantity,
            unit_price,
            total_price: quantity * unit_price,
            explicit_total: false,
        }
    }

    /// Trust an explicit total supplied at creation
    ///
    /// Zero, negative and non-finite totals are ignored and the computed total
    /// is kept.
    pub fn with_explicit_total(mut self, total: f64) -> Self {
        if total.is_finite() && total > 0.0 {
            self.total_price = total;
            self.explicit_total = true;
        }
        self
    }

    /// Set the lot label
    pub fn with_lot(mut self, lot: impl Into<String>) -> Self {
        self.lot = lot.into();
        self
    }

    /// Set the sequence number
    pub fn with_item_number(mut self, item_number: u32) -> Self {
        self.item_number = item_number;
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the brand
    pub fn with_brand(mut self, brand: impl Into<String>) -> Self {
        self.brand = brand.into();
        self
    }

    /// Set the unit label
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    /// Edit the quantity; the total is recomputed
    pub fn with_quantity(mut self, quantity: f64) -> Self {
        self.quantity = sanitize_amount(quantity);
        self.recompute_total();
        self
    }

    /// Edit the unit price; the total is recomputed
    pub fn with_unit_price(mut self, unit_price: f64) -> Self {
        self.unit_price = sanitize_amount(unit_price);
        self.recompute_total();
        self
    }

    /// The item id
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Quantity (never negative)
    pub fn quantity(&self) -> f64 {
        self.quantity
    }

    /// Unit price (never negative)
    pub fn unit_price(&self) -> f64 {
        self.unit_price
    }

    /// Total price of the row
    pub fn total_price(&self) -> f64 {
        self.total_price
    }

    /// Whether the total was supplied explicitly and never edited since
    pub fn has_explicit_total(&self) -> bool {
        self.explicit_total
    }

    fn recompute_total(&mut self) {
        self.total_price = self.quantity * self.unit_price;
        self.explicit_total = false;
    }
}

/// Persisted form of a line item, before its amounts are re-derived
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredLineItem {
    id: ItemId,
    #[serde(default)]
    lot: String,
    #[serde(default)]
    item_number: u32,
    #[serde(default)]
    description: String,
    #[serde(default)]
    brand: String,
    #[serde(default)]
    unit: String,
    #[serde(default)]
    quantity: f64,
    #[serde(default)]
    unit_price: f64,
    #[serde(default)]
    total_price: f64,
    #[serde(default)]
    explicit_total: bool,
}

impl From<StoredLineItem> for LineItem {
    fn from(stored: StoredLineItem) -> Self {
        let item = LineItem::new(stored.id, stored.quantity, stored.unit_price)
            .with_lot(stored.lot)
            .with_item_number(stored.item_number)
            .with_description(stored.description)
            .with_brand(stored.brand)
            .with_unit(stored.unit);

        if stored.explicit_total {
            item.with_explicit_total(stored.total_price)
        } else {
            item
        }
    }
}

fn sanitize_amount(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(quantity: f64, unit_price: f64) -> LineItem {
        LineItem::new(ItemId::from_value(1), quantity, unit_price)
    }

    #[test]
    fn test_total_is_computed() {
        assert_eq!(item(3.0, 2.5).total_price(), 7.5);
    }

    #[test]
    fn test_negative_amounts_become_zero() {
        let item = item(-1.0, f64::NAN);
        assert_eq!(item.quantity(), 0.0);
        assert_eq!(item.unit_price(), 0.0);
        assert_eq!(item.total_price(), 0.0);
    }

    #[test]
    fn test_explicit_total_is_trusted() {
        let item = item(3.0, 3.33).with_explicit_total(10.0);
        assert_eq!(item.total_price(), 10.0);
        assert!(item.has_explicit_total());
    }

    #[test]
    fn test_zero_explicit_total_is_ignored() {
        let item = item(2.0, 5.0).with_explicit_total(0.0);
        assert_eq!(item.total_price(), 10.0);
        assert!(!item.has_explicit_total());
    }

    #[test]
    fn test_edit_clears_explicit_total() {
        let item = item(3.0, 3.33).with_explicit_total(10.0).with_quantity(4.0);
        assert_eq!(item.total_price(), 4.0 * 3.33);
        assert!(!item.has_explicit_total());

        let item = item.with_explicit_total(99.0).with_unit_price(2.0);
        assert_eq!(item.total_price(), 8.0);
        assert!(!item.has_explicit_total());
    }

    #[test]
    fn test_label_edits_keep_total() {
        let item = item(1.0, 1.0)
            .with_explicit_total(5.0)
            .with_description("Paper")
            .with_lot("Lote 2")
            .with_unit("CX");
        assert_eq!(item.total_price(), 5.0);
        assert!(item.has_explicit_total());
    }

    #[test]
    fn test_stored_total_is_rederived_unless_explicit() {
        let stored = serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000001",
            "description": "Pens",
            "quantity": 2.0,
            "unitPrice": 10.0,
            "totalPrice": 999.0,
            "explicitTotal": false
        });
        let item: LineItem = serde_json::from_value(stored.clone()).unwrap();
        assert_eq!(item.total_price(), 20.0);
        assert!(!item.has_explicit_total());
        assert_eq!(item.description, "Pens");

        let mut explicit = stored;
        explicit["explicitTotal"] = serde_json::json!(true);
        let item: LineItem = serde_json::from_value(explicit).unwrap();
        assert_eq!(item.total_price(), 999.0);
        assert!(item.has_explicit_total());
    }

    #[test]
    fn test_stored_negative_amounts_become_zero() {
        let stored = serde_json::json!({
            "id": "00000000-0000-0000-0000-000000000002",
            "quantity": -3.0,
            "unitPrice": 10.0,
            "totalPrice": -30.0,
            "explicitTotal": true
        });
        let item: LineItem = serde_json::from_value(stored).unwrap();
        assert_eq!(item.quantity(), 0.0);
        assert_eq!(item.total_price(), 0.0);
        assert!(!item.has_explicit_total());
    }

    #[test]
    fn test_serialized_item_loads_unchanged() {
        let original = item(3.0, 3.33).with_explicit_total(10.0).with_unit("CX");
        let json = serde_json::to_value(&original).unwrap();
        let loaded: LineItem = serde_json::from_value(json).unwrap();
        assert_eq!(loaded, original);
    }
}
