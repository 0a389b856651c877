//! Item command implementation.

use crate::cli::{ItemAction, ItemArgs};
use crate::draft::{load_draft, require_draft, save_draft};
use crate::error::{CliError, Result};
use crate::output::{format_money, Formatter};
use licita_domain::{IdGenerator, ItemId, UuidV7Generator};
use licita_ledger::{ItemEdit, ProcurementRecord};

/// Execute the item command.
pub fn execute_item(args: ItemArgs, formatter: &Formatter) -> Result<()> {
    let path = require_draft(args.draft.as_deref())?;
    let record = load_draft(path)?;

    let (updated, message) = apply_item_action(&record, args.action, &UuidV7Generator)?;

    save_draft(path, &updated)?;
    println!("{}", formatter.success(&message));
    Ok(())
}

/// Apply one item action, returning the new record and a summary
pub fn apply_item_action(
    record: &ProcurementRecord,
    action: ItemAction,
    ids: &dyn IdGenerator,
) -> Result<(ProcurementRecord, String)> {
    match action {
        ItemAction::Add => {
            let updated = record.with_manual_item(ids);
            let id = updated
                .items()
                .last()
                .map(|item| item.id().to_string())
                .unwrap_or_default();
            Ok((updated, format!("Item added: {}", id)))
        }
        ItemAction::Edit {
            id,
            lot,
            number,
            description,
            brand,
            unit,
            quantity,
            unit_price,
        } => {
            let item_id = parse_item_id(&id)?;

            let edits: Vec<ItemEdit> = [
                lot.map(ItemEdit::Lot),
                number.map(ItemEdit::ItemNumber),
                description.map(ItemEdit::Description),
                brand.map(ItemEdit::Brand),
                unit.map(ItemEdit::Unit),
                quantity.map(ItemEdit::Quantity),
                unit_price.map(ItemEdit::UnitPrice),
            ]
            .into_iter()
            .flatten()
            .collect();

            if edits.is_empty() {
                return Err(CliError::InvalidInput("nothing to edit".to_string()));
            }

            let updated = edits
                .into_iter()
                .try_fold(record.clone(), |current, edit| current.with_item_edited(item_id, edit))?;

            let total = updated
                .item(item_id)
                .map(|item| item.total_price())
                .unwrap_or_default();
            let message = format!(
                "Item {} updated (item total {}, record total {})",
                item_id,
                format_money(total),
                format_money(updated.total_value())
            );
            Ok((updated, message))
        }
        ItemAction::Remove { id } => {
            let item_id = parse_item_id(&id)?;
            let updated = record.without_item(item_id)?;
            let message = format!(
                "Item {} removed (record total {})",
                item_id,
                format_money(updated.total_value())
            );
            Ok((updated, message))
        }
    }
}

fn parse_item_id(id: &str) -> Result<ItemId> {
    ItemId::from_string(id).map_err(CliError::InvalidInput)
}
