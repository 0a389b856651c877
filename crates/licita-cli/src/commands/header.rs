//! Header command implementation.

use crate::cli::HeaderArgs;
use crate::draft::{load_or_new, save_draft};
use crate::error::Result;
use crate::output::Formatter;
use licita_domain::SupplierId;
use licita_ledger::ProcurementRecord;

/// Execute the header command.
pub fn execute_header(args: HeaderArgs, formatter: &Formatter) -> Result<()> {
    let record = load_or_new(&args.draft)?;
    let updated = apply_header(&record, &args);
    save_draft(&args.draft, &updated)?;
    println!("{}", formatter.success("Header updated"));
    Ok(())
}

/// Overwrite the header fields that were given
pub fn apply_header(record: &ProcurementRecord, args: &HeaderArgs) -> ProcurementRecord {
    let mut header = record.header().clone();
    let fields = [
        (&mut header.process_number, &args.process_number),
        (&mut header.modality, &args.modality),
        (&mut header.object, &args.object),
        (&mut header.year, &args.year),
    ];
    for (field, value) in fields {
        if let Some(value) = value {
            *field = value.trim().to_string();
        }
    }

    let updated = record.with_header(header);
    match &args.supplier {
        Some(id) if id.trim().is_empty() => updated.with_supplier(None),
        Some(id) => updated.with_supplier(Some(SupplierId::new(id.trim()))),
        None => updated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args() -> HeaderArgs {
        HeaderArgs {
            draft: PathBuf::from("d.json"),
            process_number: None,
            modality: None,
            object: None,
            year: None,
            supplier: None,
        }
    }

    #[test]
    fn test_only_given_fields_change() {
        let record = apply_header(
            &ProcurementRecord::new(),
            &HeaderArgs {
                process_number: Some(" 068/2023 ".to_string()),
                year: Some("2023".to_string()),
                supplier: Some("s-1".to_string()),
                ..args()
            },
        );
        let record = apply_header(
            &record,
            &HeaderArgs {
                modality: Some("Pregão".to_string()),
                ..args()
            },
        );

        assert_eq!(record.header().process_number, "068/2023");
        assert_eq!(record.header().modality, "Pregão");
        assert_eq!(record.header().year, "2023");
        assert_eq!(record.supplier().map(|s| s.as_str()), Some("s-1"));
    }

    #[test]
    fn test_blank_supplier_clears_selection() {
        let record = ProcurementRecord::new().with_supplier(Some(SupplierId::new("s-1")));
        let record = apply_header(
            &record,
            &HeaderArgs {
                supplier: Some(String::new()),
                ..args()
            },
        );
        assert!(record.supplier().is_none());
    }
}
