//! Save validation and commit

use crate::{LedgerError, ProcurementRecord, RecordStore, ValidationConfig};
use licita_domain::{IdGenerator, RecordId};
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};

/// Result of record validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the record may be saved
    pub status: ValidationStatus,

    /// Every missing requirement
    pub issues: Vec<ValidationIssue>,
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Record may be saved
    Accepted,

    /// Record is missing required data
    Rejected,
}

/// A requirement the record does not meet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationIssue {
    /// Blank process number
    MissingProcessNumber,
    /// No supplier selected
    MissingSupplier,
    /// No line items
    NoItems,
    /// Blank modality (strict only)
    MissingModality,
    /// Blank object (strict only)
    MissingObject,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ValidationIssue::MissingProcessNumber => "process number is required",
            ValidationIssue::MissingSupplier => "a supplier must be selected",
            ValidationIssue::NoItems => "at least one item is required",
            ValidationIssue::MissingModality => "modality is required",
            ValidationIssue::MissingObject => "object is required",
        };
        f.write_str(text)
    }
}

/// Checks records before they reach a [`RecordStore`]
pub struct RecordValidator {
    config: ValidationConfig,
}

impl RecordValidator {
    /// Create a validator with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Create a validator with default configuration
    pub fn default_config() -> Self {
        Self::new(ValidationConfig::default())
    }

    /// Report every missing requirement at once
    pub fn validate(&self, record: &ProcurementRecord) -> ValidationResult {
        let header = record.header();
        let mut issues = Vec::new();

        if header.process_number.trim().is_empty() {
            issues.push(ValidationIssue::MissingProcessNumber);
        }
        if record.supplier().map_or(true, |s| s.as_str().trim().is_empty()) {
            issues.push(ValidationIssue::MissingSupplier);
        }
        if record.items().is_empty() {
            issues.push(ValidationIssue::NoItems);
        }
        if self.config.require_modality && header.modality.trim().is_empty() {
            issues.push(ValidationIssue::MissingModality);
        }
        if self.config.require_object && header.object.trim().is_empty() {
            issues.push(ValidationIssue::MissingObject);
        }

        let status = if issues.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };

        ValidationResult { status, issues }
    }

    /// Validate, then save through `store`
    ///
    /// A first save assigns the record id and creation time; a re-save keeps
    /// both. The store is not called when validation fails.
    ///
    /// # Errors
    ///
    /// - `ValidationFailure` listing every missing requirement
    /// - `Store` if the store rejects the record
    pub fn commit<S: RecordStore>(
        &self,
        record: &ProcurementRecord,
        store: &mut S,
        ids: &dyn IdGenerator,
    ) -> Result<ProcurementRecord, LedgerError>
    where
        S::Error: fmt::Display,
    {
        let result = self.validate(record);
        if result.status == ValidationStatus::Rejected {
            warn!(issues = result.issues.len(), "Save blocked by validation");
            return Err(LedgerError::ValidationFailure(result.issues));
        }

        let id = record.id().unwrap_or_else(|| RecordId::generate(ids));
        let committed = record.committed(id, now_secs());

        store
            .save(&committed)
            .map_err(|e| LedgerError::Store(format!("Failed to save record {}: {}", id, e)))?;

        info!(
            record = %id,
            items = committed.items().len(),
            total = committed.total_value(),
            "Record saved"
        );
        Ok(committed)
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
