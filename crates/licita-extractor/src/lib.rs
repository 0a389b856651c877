//! Licita Extractor
//!
//! Turns an uploaded procurement document (a price registration record as a
//! PDF, or an item spreadsheet) into a structured, reconciled draft.
//!
//! # Architecture
//!
//! ```text
//! Upload → Content Normalizer → Extraction Client → Repair Parser
//!        → Item Normalizer → Entity Resolver → ImportOutcome → ProcurementRecord
//! ```
//!
//! # Key Features
//!
//! - **Content normalization**: sheets become marked CSV blocks, pages are
//!   joined under page markers, all within a character budget
//! - **Single extraction call**: one request per upload, never retried
//! - **Response repair**: truncated JSON is salvaged up to the last complete item
//! - **Item coercion**: lenient numbers, placeholder labels, explicit totals
//! - **Supplier resolution**: tax-id digits first, then name
//!
//! # Example Usage
//!
//! ```no_run
//! use licita_domain::Supplier;
//! use licita_extractor::{Importer, ImporterConfig, NoProgress, Sheet, Upload};
//! use licita_ledger::ProcurementRecord;
//! use licita_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = MockProvider::new(r#"{"items":[{"description":"Caneta","quantity":10,"unitPrice":1.5}]}"#);
//! let registry = vec![Supplier::new("s-1", "ACME LTDA", "12345678000190")];
//! let importer = Importer::new(provider, registry, ImporterConfig::default())?;
//!
//! let upload = Upload::spreadsheet(
//!     "itens.xlsx",
//!     vec![Sheet::new("Lote 1", vec![vec!["Caneta".into(), "10".into(), "1,50".into()]])],
//! );
//! let outcome = importer.import(&upload, &NoProgress).await?;
//!
//! let draft = outcome.apply_to(&ProcurementRecord::new());
//! println!("{} items, total {:.2}", draft.items().len(), draft.total_value());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod content;
mod error;
mod importer;
mod items;
mod progress;
mod prompt;
mod raw;
mod repair;
mod resolver;


pub use config::ImporterConfig;
pub use content::{
    normalize_pages, normalize_sheets, truncate_chars, NormalizedContent, Sheet, SourceKind,
    Upload, UploadContent,
};
pub use error::ImportError;
pub use importer::{ImportMetadata, ImportOutcome, ImportWarning, Importer};
pub use items::{coerce_number, ItemNormalizer};
pub use progress::{ImportStage, NoProgress, ProgressSink};
pub use prompt::PromptBuilder;
pub use raw::RawExtraction;
pub use repair::{repair, RepairStep, Repaired};
pub use resolver::{resolve_in, resolve_supplier, MatchKind, SupplierResolution};
