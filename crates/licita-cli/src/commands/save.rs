//! Save command implementation.

use crate::cli::SaveArgs;
use crate::draft::{load_draft, save_draft};
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::store::JsonDirStore;
use licita_domain::UuidV7Generator;
use licita_ledger::{RecordValidator, ValidationConfig, ValidationStatus};

/// Execute the save command.
pub fn execute_save(args: SaveArgs, formatter: &Formatter) -> Result<()> {
    let record = load_draft(&args.draft)?;

    let validator = if args.strict {
        RecordValidator::new(ValidationConfig::strict())
    } else {
        RecordValidator::default_config()
    };

    let result = validator.validate(&record);
    if result.status == ValidationStatus::Rejected {
        eprintln!("{}", formatter.validation_issues(&result.issues));
        return Err(CliError::InvalidInput("record not saved".to_string()));
    }

    let mut store = JsonDirStore::new(&args.store);
    let saved = validator.commit(&record, &mut store, &UuidV7Generator)?;

    // Keep the assigned id so the next save replaces the same record
    save_draft(&args.draft, &saved)?;

    if let Some(id) = saved.id() {
        println!(
            "{}",
            formatter.success(&format!(
                "Record {} saved to {}",
                id,
                store.record_path(id).display()
            ))
        );
    }
    Ok(())
}
