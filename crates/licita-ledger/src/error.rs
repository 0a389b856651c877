//! Ledger error types

use crate::validator::ValidationIssue;
use licita_domain::{ItemId, ShareId};
use thiserror::Error;

/// Errors raised by record and ledger operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LedgerError {
    /// The new share does not fit in the unallocated remainder
    #[error("Distribution exceeds the unallocated remainder: requested {requested}%, only {available}% available")]
    DistributionOverflow {
        /// Percentage asked for
        requested: f64,
        /// Percentage still unallocated
        available: f64,
    },

    /// Percentage outside (0, 100]
    #[error("Invalid percentage: {0} (must be greater than 0 and at most 100)")]
    InvalidPercentage(f64),

    /// Share without a consumer name
    #[error("Consumer name is required")]
    MissingConsumer,

    /// No share with this id
    #[error("Share not found: {0}")]
    ShareNotFound(ShareId),

    /// No item with this id
    #[error("Item not found: {0}")]
    ItemNotFound(ItemId),

    /// Negative or non-finite quantity or price
    #[error("Invalid {field}: {value}")]
    InvalidAmount {
        /// Edited field
        field: &'static str,
        /// Rejected value
        value: f64,
    },

    /// Persisted record violates an invariant
    #[error("Corrupt record snapshot: {0}")]
    CorruptSnapshot(String),

    /// Save blocked by missing required data
    #[error("Record cannot be saved: {}", describe_issues(.0))]
    ValidationFailure(Vec<ValidationIssue>),

    /// Record store error
    #[error("Store error: {0}")]
    Store(String),
}

fn describe_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
