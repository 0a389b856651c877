//! Licita Domain Layer
//!
//! Value types shared by every other crate in the workspace. This crate holds
//! no I/O and depends only on `uuid` (identifiers) and `serde` (persisted
//! drafts).
//!
//! ## Key Concepts
//!
//! - **Line item**: a priced row of a procurement record; its total follows
//!   quantity and unit price unless an explicit total was supplied
//! - **Distribution share**: a consumer's percentage of the record's total value
//! - **Supplier**: an entry of the external, read-only supplier registry
//! - **Id generation**: injected, so id assignment is deterministic in tests

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod header;
pub mod id;
pub mod item;
pub mod share;
pub mod supplier;
pub mod traits;

// Re-exports for convenience
pub use header::RecordHeader;
pub use id::{IdGenerator, ItemId, RecordId, SequentialIdGenerator, ShareId, UuidV7Generator};
pub use item::LineItem;
pub use share::DistributionShare;
pub use supplier::{Supplier, SupplierId};
pub use traits::SupplierRegistry;
