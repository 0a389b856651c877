//! The procurement record aggregate
//!
//! A [`ProcurementRecord`] owns its line items and distribution ledger. It is
//! immutable: every update returns a new record, and the total value is never
//! cached outside the ledger's copy, which is re-derived from the items on
//! every item change.

use crate::{DistributionLedger, LedgerError};
use licita_domain::{
    DistributionShare, IdGenerator, ItemId, LineItem, RecordHeader, RecordId, ShareId, SupplierId,
};
use serde::{Deserialize, Serialize};

/// Lot label given to manually added items
pub const MANUAL_ITEM_LOT: &str = "Lote 1";

/// Unit label given to manually added items
pub const MANUAL_ITEM_UNIT: &str = "UND";

/// A single-field edit of a line item
#[derive(Debug, Clone, PartialEq)]
pub enum ItemEdit {
    /// New quantity; recomputes the total
    Quantity(f64),
    /// New unit price; recomputes the total
    UnitPrice(f64),
    /// New lot label
    Lot(String),
    /// New sequence number
    ItemNumber(u32),
    /// New description
    Description(String),
    /// New brand
    Brand(String),
    /// New unit label
    Unit(String),
}

impl ItemEdit {
    fn apply(self, item: &LineItem) -> Result<LineItem, LedgerError> {
        let item = item.clone();
        Ok(match self {
            ItemEdit::Quantity(value) => item.with_quantity(checked_amount("quantity", value)?),
            ItemEdit::UnitPrice(value) => {
                item.with_unit_price(checked_amount("unit price", value)?)
            }
            ItemEdit::Lot(lot) => item.with_lot(lot),
            ItemEdit::ItemNumber(number) => item.with_item_number(number),
            ItemEdit::Description(description) => item.with_description(description),
            ItemEdit::Brand(brand) => item.with_brand(brand),
            ItemEdit::Unit(unit) => item.with_unit(unit),
        })
    }
}

fn checked_amount(field: &'static str, value: f64) -> Result<f64, LedgerError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(LedgerError::InvalidAmount { field, value })
    }
}

/// A procurement record: header, supplier, line items and distribution
///
/// # Examples
///
/// ```
/// use licita_domain::SequentialIdGenerator;
/// use licita_ledger::{ItemEdit, ProcurementRecord};
///
/// let ids = SequentialIdGenerator::new();
/// let record = ProcurementRecord::new().with_manual_item(&ids);
/// let item = record.items()[0].id();
///
/// let record = record
///     .with_item_edited(item, ItemEdit::Quantity(4.0))
///     .and_then(|r| r.with_item_edited(item, ItemEdit::UnitPrice(25.0)))
///     .and_then(|r| r.with_share_added("Health", 50.0, &ids))
///     .unwrap();
///
/// assert_eq!(record.total_value(), 100.0);
/// assert_eq!(record.reserved_value(), 50.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(into = "RecordSnapshot", try_from = "RecordSnapshot")]
pub struct ProcurementRecord {
    id: Option<RecordId>,
    header: RecordHeader,
    supplier: Option<SupplierId>,
    items: Vec<LineItem>,
    ledger: DistributionLedger,
    created_at: Option<u64>,
}

impl ProcurementRecord {
    /// An empty, unsaved draft
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the header
    pub fn with_header(&self, header: RecordHeader) -> Self {
        Self {
            header,
            ..self.clone()
        }
    }

    /// Select a supplier, or clear the selection with `None`
    pub fn with_supplier(&self, supplier: Option<SupplierId>) -> Self {
        Self {
            supplier,
            ..self.clone()
        }
    }

    /// Replace every item; shares are kept and recomputed
    pub fn with_items(&self, items: Vec<LineItem>) -> Self {
        self.rederive(items)
    }

    /// Append an item
    pub fn with_item_added(&self, item: LineItem) -> Self {
        let mut items = self.items.clone();
        items.push(item);
        self.rederive(items)
    }

    /// Append an empty item for manual entry
    ///
    /// It gets lot [`MANUAL_ITEM_LOT`], the next sequence number, unit
    /// [`MANUAL_ITEM_UNIT`] and zero amounts.
    pub fn with_manual_item(&self, ids: &dyn IdGenerator) -> Self {
        let next_number = u32::try_from(self.items.len() + 1).unwrap_or(u32::MAX);
        let item = LineItem::new(ItemId::generate(ids), 0.0, 0.0)
            .with_lot(MANUAL_ITEM_LOT)
            .with_item_number(next_number)
            .with_unit(MANUAL_ITEM_UNIT);
        self.with_item_added(item)
    }

    /// Apply one edit to an item
    ///
    /// # Errors
    ///
    /// - `ItemNotFound` if no item has this id
    /// - `InvalidAmount` for a negative or non-finite quantity or price
    pub fn with_item_edited(&self, id: ItemId, edit: ItemEdit) -> Result<Self, LedgerError> {
        let position = self.item_position(id)?;
        let mut items = self.items.clone();
        items[position] = edit.apply(&items[position])?;
        Ok(self.rederive(items))
    }

    /// Remove an item
    ///
    /// # Errors
    ///
    /// `ItemNotFound` if no item has this id.
    pub fn without_item(&self, id: ItemId) -> Result<Self, LedgerError> {
        let position = self.item_position(id)?;
        let mut items = self.items.clone();
        items.remove(position);
        Ok(self.rederive(items))
    }

    /// Allocate a share of the total value
    ///
    /// # Errors
    ///
    /// See [`DistributionLedger::add_share`].
    pub fn with_share_added(
        &self,
        consumer: &str,
        percentage: f64,
        ids: &dyn IdGenerator,
    ) -> Result<Self, LedgerError> {
        Ok(Self {
            ledger: self.ledger.add_share(consumer, percentage, ids)?,
            ..self.clone()
        })
    }

    /// Remove a share
    ///
    /// # Errors
    ///
    /// `ShareNotFound` if no share has this id.
    pub fn without_share(&self, id: ShareId) -> Result<Self, LedgerError> {
        Ok(Self {
            ledger: self.ledger.remove_share(id)?,
            ..self.clone()
        })
    }

    /// Mark the record as saved
    pub(crate) fn committed(&self, id: RecordId, created_at: u64) -> Self {
        Self {
            id: Some(id),
            created_at: Some(self.created_at.unwrap_or(created_at)),
            ..self.clone()
        }
    }

    /// Id assigned on first save
    pub fn id(&self) -> Option<RecordId> {
        self.id
    }

    /// Header fields
    pub fn header(&self) -> &RecordHeader {
        &self.header
    }

    /// Selected supplier
    pub fn supplier(&self) -> Option<&SupplierId> {
        self.supplier.as_ref()
    }

    /// Line items in entry order
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Look up an item
    pub fn item(&self, id: ItemId) -> Option<&LineItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Distribution shares in allocation order
    pub fn shares(&self) -> &[DistributionShare] {
        self.ledger.shares()
    }

    /// The distribution ledger
    pub fn ledger(&self) -> &DistributionLedger {
        &self.ledger
    }

    /// Creation time, seconds since the Unix epoch
    pub fn created_at(&self) -> Option<u64> {
        self.created_at
    }

    /// Sum of item totals
    pub fn total_value(&self) -> f64 {
        self.ledger.total_value()
    }

    /// Sum of share percentages
    pub fn allocated_percentage(&self) -> f64 {
        self.ledger.allocated_percentage()
    }

    /// Unallocated percentage
    pub fn reserved_percentage(&self) -> f64 {
        self.ledger.reserved_percentage()
    }

    /// Value of the unallocated percentage
    pub fn reserved_value(&self) -> f64 {
        self.ledger.reserved_value()
    }

    fn item_position(&self, id: ItemId) -> Result<usize, LedgerError> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or(LedgerError::ItemNotFound(id))
    }

    fn rederive(&self, items: Vec<LineItem>) -> Self {
        let total = items_total(&items);
        Self {
            ledger: self.ledger.recompute_all(total),
            items,
            ..self.clone()
        }
    }
}

fn items_total(items: &[LineItem]) -> f64 {
    items.iter().map(LineItem::total_price).sum()
}

/// Persisted form of a record
///
/// `totalValue` and `reservedPercentage` are written for readers of the file
/// and ignored on load.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RecordSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<RecordId>,
    #[serde(default)]
    header: RecordHeader,
    #[serde(default)]
    supplier_id: Option<SupplierId>,
    #[serde(default)]
    items: Vec<LineItem>,
    #[serde(default)]
    distributions: Vec<DistributionShare>,
    #[serde(default)]
    total_value: f64,
    #[serde(default)]
    reserved_percentage: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<u64>,
}

impl From<ProcurementRecord> for RecordSnapshot {
    fn from(record: ProcurementRecord) -> Self {
        Self {
            total_value: record.total_value(),
            reserved_percentage: record.reserved_percentage(),
            id: record.id,
            header: record.header,
            supplier_id: record.supplier,
            items: record.items,
            distributions: record.ledger.shares().to_vec(),
            created_at: record.created_at,
        }
    }
}

impl TryFrom<RecordSnapshot> for ProcurementRecord {
    type Error = LedgerError;

    fn try_from(snapshot: RecordSnapshot) -> Result<Self, Self::Error> {
        let total = items_total(&snapshot.items);
        let ledger = DistributionLedger::from_shares(snapshot.distributions, total)?;
        Ok(Self {
            id: snapshot.id,
            header: snapshot.header,
            supplier: snapshot.supplier_id,
            items: snapshot.items,
            ledger,
            created_at: snapshot.created_at,
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use licita_domain::SequentialIdGenerator;
    use proptest::prelude::*;

    proptest! {
        /// After quantity and price edits the total is quantity times price
        #[test]
        fn test_edited_total_is_product(
            explicit in 1.0f64..1e6,
            quantity in 0.0f64..1e4,
            price in 0.0f64..1e4,
        ) {
            let ids = SequentialIdGenerator::new();
            let record = ProcurementRecord::new().with_item_added(
                LineItem::new(ItemId::generate(&ids), 1.0, 1.0).with_explicit_total(explicit),
            );
            let id = record.items()[0].id();

            let record = record.with_item_edited(id, ItemEdit::Quantity(quantity)).unwrap();
            let record = record.with_item_edited(id, ItemEdit::UnitPrice(price)).unwrap();
            let item = &record.items()[0];
            prop_assert_eq!(item.total_price(), item.quantity() * item.unit_price());
            prop_assert_eq!(record.total_value(), item.total_price());
        }
    }
}
