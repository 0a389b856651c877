//! Licita Ledger
//!
//! The procurement record aggregate and its distribution ledger.
//!
//! The ledger provides:
//! - Percentage shares of the record total, never exceeding 100% in sum
//! - Re-derivation of totals and allocations on every item change
//! - Save validation in front of a [`RecordStore`]
//!
//! # Examples
//!
//! ```
//! use licita_domain::{ItemId, LineItem, RecordHeader, SequentialIdGenerator, SupplierId};
//! use licita_ledger::{InMemoryRecordStore, ProcurementRecord, RecordValidator};
//!
//! let ids = SequentialIdGenerator::new();
//! let record = ProcurementRecord::new()
//!     .with_header(RecordHeader {
//!         process_number: "068/2023".to_string(),
//!         ..RecordHeader::default()
//!     })
//!     .with_supplier(Some(SupplierId::new("s-1")))
//!     .with_item_added(LineItem::new(ItemId::generate(&ids), 2.0, 10.0));
//!
//! let mut store = InMemoryRecordStore::new();
//! let saved = RecordValidator::default_config()
//!     .commit(&record, &mut store, &ids)
//!     .unwrap();
//! assert!(saved.id().is_some());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod ledger;
mod record;
mod store;
mod validator;

pub use config::ValidationConfig;
pub use error::LedgerError;
pub use ledger::DistributionLedger;
pub use record::{ItemEdit, ProcurementRecord, MANUAL_ITEM_LOT, MANUAL_ITEM_UNIT};
pub use store::{InMemoryRecordStore, RecordStore};
pub use validator::{RecordValidator, ValidationIssue, ValidationResult, ValidationStatus};
