//! Percentage-based distribution of a record's total value

use crate::LedgerError;
use licita_domain::{DistributionShare, IdGenerator, ShareId};
use tracing::debug;

/// Percentages are held in millionths of a percent so sums are exact
const UNITS_PER_PERCENT: f64 = 1_000_000.0;

/// 100% in millionths
const FULL_UNITS: u64 = 100_000_000;

/// Allocation of a total value across named consumers
///
/// The ledger is an immutable value: every operation returns a new ledger and
/// leaves `self` untouched. Invariants held by every ledger value:
///
/// - the sum of share percentages never exceeds 100; percentages are
///   rounded to six decimal places on entry and summed as integers
/// - each share's allocated value is `percentage / 100 * total_value`
/// - shares are only ever added or removed explicitly, never rebalanced
///
/// # Examples
///
/// ```
/// use licita_domain::SequentialIdGenerator;
/// use licita_ledger::{DistributionLedger, LedgerError};
///
/// let ids = SequentialIdGenerator::new();
/// let ledger = DistributionLedger::new(1000.0)
///     .add_share("Health", 60.0, &ids)
///     .unwrap();
///
/// let rejected = ledger.add_share("Education", 50.0, &ids);
/// assert!(matches!(rejected, Err(LedgerError::DistributionOverflow { .. })));
/// assert_eq!(ledger.reserved_percentage(), 40.0);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DistributionLedger {
    shares: Vec<DistributionShare>,
    total_value: f64,
}

impl DistributionLedger {
    /// An empty ledger over `total_value`
    pub fn new(total_value: f64) -> Self {
        Self {
            shares: Vec::new(),
            total_value: sanitize_total(total_value),
        }
    }

    /// Rebuild a ledger from persisted shares
    ///
    /// Percentages are rounded to six decimal places and allocated values
    /// are recomputed against `total_value`; stored values are ignored.
    ///
    /// # Errors
    ///
    /// `CorruptSnapshot` if a percentage is outside (0, 100] or the sum
    /// exceeds 100.
    pub fn from_shares(
        shares: Vec<DistributionShare>,
        total_value: f64,
    ) -> Result<Self, LedgerError> {
        let total_value = sanitize_total(total_value);
        let mut sum = 0u64;
        let mut rebuilt = Vec::with_capacity(shares.len());

        for share in shares {
            let units = percentage_units(share.percentage()).ok_or_else(|| {
                LedgerError::CorruptSnapshot(format!(
                    "share '{}' has percentage {}",
                    share.consumer(),
                    share.percentage()
                ))
            })?;
            sum += units;
            rebuilt.push(DistributionShare::allocate(
                share.id(),
                share.consumer(),
                units_to_percentage(units),
                total_value,
            ));
        }
        if sum > FULL_UNITS {
            return Err(LedgerError::CorruptSnapshot(format!(
                "shares add up to {}%",
                units_to_percentage(sum)
            )));
        }

        Ok(Self {
            shares: rebuilt,
            total_value,
        })
    }

    /// Allocate `percentage` of the total to `consumer`
    ///
    /// # Errors
    ///
    /// - `MissingConsumer` for a blank consumer name
    /// - `InvalidPercentage` unless the percentage is in (0, 100] once rounded
    ///   to six decimal places
    /// - `DistributionOverflow` if it exceeds the unallocated remainder; the
    ///   error reports the remainder and nothing is clipped
    pub fn add_share(
        &self,
        consumer: &str,
        percentage: f64,
        ids: &dyn IdGenerator,
    ) -> Result<Self, LedgerError> {
        let consumer = consumer.trim();
        if consumer.is_empty() {
            return Err(LedgerError::MissingConsumer);
        }
        let units =
            percentage_units(percentage).ok_or(LedgerError::InvalidPercentage(percentage))?;

        if units > self.available_units() {
            return Err(LedgerError::DistributionOverflow {
                requested: percentage,
                available: self.available_percentage(),
            });
        }

        let share = DistributionShare::allocate(
            ShareId::generate(ids),
            consumer,
            units_to_percentage(units),
            self.total_value,
        );
        debug!(
            consumer,
            percentage,
            allocated = share.allocated_value(),
            "Share added"
        );

        let mut shares = self.shares.clone();
        shares.push(share);
        Ok(Self {
            shares,
            total_value: self.total_value,
        })
    }

    /// Remove a share; its percentage returns to the reserve
    ///
    /// # Errors
    ///
    /// `ShareNotFound` if no share has this id.
    pub fn remove_share(&self, id: ShareId) -> Result<Self, LedgerError> {
        if self.share(id).is_none() {
            return Err(LedgerError::ShareNotFound(id));
        }

        Ok(Self {
            shares: self
                .shares
                .iter()
                .filter(|share| share.id() != id)
                .cloned()
                .collect(),
            total_value: self.total_value,
        })
    }

    /// Recompute every allocation against a new total
    ///
    /// Negative or non-finite totals are treated as zero.
    pub fn recompute_all(&self, total_value: f64) -> Self {
        let total_value = sanitize_total(total_value);
        Self {
            shares: self
                .shares
                .iter()
                .map(|share| share.reallocate(total_value))
                .collect(),
            total_value,
        }
    }

    /// Shares in allocation order
    pub fn shares(&self) -> &[DistributionShare] {
        &self.shares
    }

    /// Look up a share
    pub fn share(&self, id: ShareId) -> Option<&DistributionShare> {
        self.shares.iter().find(|share| share.id() == id)
    }

    /// Total value the allocations were computed against
    pub fn total_value(&self) -> f64 {
        self.total_value
    }

    /// Sum of share percentages
    pub fn allocated_percentage(&self) -> f64 {
        units_to_percentage(self.allocated_units())
    }

    /// Percentage still free for new shares
    pub fn available_percentage(&self) -> f64 {
        units_to_percentage(self.available_units())
    }

    /// Unallocated percentage (the technical reserve)
    pub fn reserved_percentage(&self) -> f64 {
        self.available_percentage()
    }

    /// `(100 - allocated) / 100 * total_value`
    pub fn reserved_value(&self) -> f64 {
        self.reserved_percentage() / 100.0 * self.total_value
    }

    fn allocated_units(&self) -> u64 {
        self.shares
            .iter()
            .filter_map(|share| percentage_units(share.percentage()))
            .sum()
    }

    fn available_units(&self) -> u64 {
        FULL_UNITS.saturating_sub(self.allocated_units())
    }
}

/// A percentage in (0, 100] as millionths, or `None` when out of range
fn percentage_units(percentage: f64) -> Option<u64> {
    if !percentage.is_finite() || percentage <= 0.0 || percentage > 100.0 {
        return None;
    }
    let units = (percentage * UNITS_PER_PERCENT).round() as u64;
    (units > 0).then_some(units)
}

fn units_to_percentage(units: u64) -> f64 {
    units as f64 / UNITS_PER_PERCENT
}

fn sanitize_total(total_value: f64) -> f64 {
    if total_value.is_finite() && total_value > 0.0 {
        total_value
    } else {
        0.0
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use licita_domain::SequentialIdGenerator;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum Op {
        Add(f64),
        Remove(usize),
        Recompute(f64),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (-10.0f64..120.0).prop_map(Op::Add),
            (0usize..8).prop_map(Op::Remove),
            (0.0f64..1e7).prop_map(Op::Recompute),
        ]
    }

    proptest! {
        /// The percentage sum never exceeds 100, whatever the sequence of operations
        #[test]
        fn test_sum_never_exceeds_100(ops in proptest::collection::vec(op(), 0..40)) {
            let ids = SequentialIdGenerator::new();
            let mut ledger = DistributionLedger::new(1000.0);

            for op in ops {
                ledger = match op {
                    Op::Add(pct) => ledger.add_share("consumer", pct, &ids).unwrap_or(ledger),
                    Op::Remove(index) => match ledger.shares().get(index).map(|s| s.id()) {
                        Some(id) => ledger.remove_share(id).unwrap(),
                        None => ledger,
                    },
                    Op::Recompute(total) => ledger.recompute_all(total),
                };
                prop_assert!(ledger.allocated_percentage() <= 100.0);
                let stored: u64 = ledger
                    .shares()
                    .iter()
                    .map(|share| (share.percentage() * UNITS_PER_PERCENT).round() as u64)
                    .sum();
                prop_assert!(stored <= FULL_UNITS);
            }
        }

        /// Allocations are a pure function of percentage and total
        #[test]
        fn test_recompute_matches_formula(
            pcts in proptest::collection::vec(1.0f64..20.0, 0..5),
            total in 0.0f64..1e9,
        ) {
            let ids = SequentialIdGenerator::new();
            let mut ledger = DistributionLedger::new(1.0);
            for pct in pcts {
                ledger = ledger.add_share("consumer", pct, &ids).unwrap();
            }

            let ledger = ledger.recompute_all(total);
            for share in ledger.shares() {
                prop_assert_eq!(share.allocated_value(), share.percentage() / 100.0 * total);
            }
            let reserved = (100.0 - ledger.allocated_percentage()) / 100.0 * total;
            prop_assert!((ledger.reserved_value() - reserved).abs() <= 1e-9 * total.max(1.0));
        }
    }
}
