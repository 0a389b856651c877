//! Share command implementation.

use crate::cli::{ShareAction, ShareArgs};
use crate::draft::{load_draft, require_draft, save_draft};
use crate::error::{CliError, Result};
use crate::output::{format_money, Formatter};
use licita_domain::{IdGenerator, ShareId, UuidV7Generator};
use licita_ledger::ProcurementRecord;

/// Execute the share command.
pub fn execute_share(args: ShareArgs, formatter: &Formatter) -> Result<()> {
    let path = require_draft(args.draft.as_deref())?;
    let record = load_draft(path)?;

    let updated = apply_share_action(&record, args.action, &UuidV7Generator)?;

    save_draft(path, &updated)?;
    println!(
        "{}",
        formatter.success(&format!(
            "Shares updated: {:.2}% allocated, {:.2}% reserved ({})",
            updated.allocated_percentage(),
            updated.reserved_percentage(),
            format_money(updated.reserved_value())
        ))
    );
    Ok(())
}

/// Apply one share action
pub fn apply_share_action(
    record: &ProcurementRecord,
    action: ShareAction,
    ids: &dyn IdGenerator,
) -> Result<ProcurementRecord> {
    match action {
        ShareAction::Add { consumer, percentage } => Ok(record.with_share_added(&consumer, percentage, ids)?),
        ShareAction::Remove { id } => {
            let share_id = ShareId::from_string(&id).map_err(CliError::InvalidInput)?;
            Ok(record.without_share(share_id)?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use licita_domain::{ItemId, LineItem, SequentialIdGenerator};
    use licita_ledger::LedgerError;

    fn add(consumer: &str, percentage: f64) -> ShareAction {
        ShareAction::Add {
            consumer: consumer.to_string(),
            percentage,
        }
    }

    #[test]
    fn test_overflow_reports_remainder() {
        let ids = SequentialIdGenerator::new();
        let record = ProcurementRecord::new().with_item_added(LineItem::new(ItemId::generate(&ids), 1.0, 1000.0));

        let record = apply_share_action(&record, add("Health", 60.0), &ids).unwrap();
        let result = apply_share_action(&record, add("Education", 50.0), &ids);

        match result {
            Err(CliError::Ledger(LedgerError::DistributionOverflow { requested, available })) => {
                assert_eq!(requested, 50.0);
                assert!((available - 40.0).abs() < 1e-9);
            }
            other => panic!("Expected DistributionOverflow, got {:?}", other),
        }
        assert_eq!(record.shares().len(), 1);
        assert_eq!(record.reserved_value(), 400.0);
    }

    #[test]
    fn test_remove_share() {
        let ids = SequentialIdGenerator::new();
        let record = apply_share_action(&ProcurementRecord::new(), add("Health", 30.0), &ids).unwrap();
        let id = record.shares()[0].id();

        let record = apply_share_action(&record, ShareAction::Remove { id: id.to_string() }, &ids).unwrap();
        assert!(record.shares().is_empty());
        assert_eq!(record.reserved_percentage(), 100.0);
    }

    #[test]
    fn test_invalid_share_id() {
        let ids = SequentialIdGenerator::new();
        let result = apply_share_action(
            &ProcurementRecord::new(),
            ShareAction::Remove { id: "x".to_string() },
            &ids,
        );
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }
}
