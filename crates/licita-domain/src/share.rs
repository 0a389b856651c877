//! Distribution shares - a consumer's slice of a record's total value

use crate::id::ShareId;
use serde::{Deserialize, Serialize};

/// A percentage of a record's total value allocated to one consumer
///
/// The allocated value is a pure function of the percentage and the total it
/// was last computed against; there is no setter for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionShare {
    id: ShareId,
    consumer: String,
    percentage: f64,
    allocated_value: f64,
}

impl DistributionShare {
    /// Allocate `percentage` of `total_value` to `consumer`
    ///
    /// Range checks on the percentage belong to the ledger that owns the share.
    pub fn allocate(
        id: ShareId,
        consumer: impl Into<String>,
        percentage: f64,
        total_value: f64,
    ) -> Self {
        Self {
            id,
            consumer: consumer.into(),
            percentage,
            allocated_value: allocated(percentage, total_value),
        }
    }

    /// The same share recomputed against a new total
    pub fn reallocate(&self, total_value: f64) -> Self {
        Self {
            allocated_value: allocated(self.percentage, total_value),
            ..self.clone()
        }
    }

    /// Share id
    pub fn id(&self) -> ShareId {
        self.id
    }

    /// Consumer (department, secretariat, ...) receiving the share
    pub fn consumer(&self) -> &str {
        &self.consumer
    }

    /// Percentage in (0, 100]
    pub fn percentage(&self) -> f64 {
        self.percentage
    }

    /// `percentage / 100 * total`
    pub fn allocated_value(&self) -> f64 {
        self.allocated_value
    }
}

fn allocated(percentage: f64, total_value: f64) -> f64 {
    percentage / 100.0 * total_value
}
