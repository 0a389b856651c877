//! Import command implementation.

use crate::cli::ImportArgs;
use crate::config::Config;
use crate::draft::{load_or_new, save_draft};
use crate::error::Result;
use crate::loader::{load_upload, FileSupplierRegistry};
use crate::output::Formatter;
use licita_extractor::{ImportOutcome, Importer, ImporterConfig};
use licita_ledger::ProcurementRecord;
use licita_llm::ExtractionProvider;
use std::path::Path;

/// Execute the import command.
pub async fn execute_import(args: ImportArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let mut importer_config = config.importer.clone();
    if args.text_only {
        importer_config.send_original_documents = false;
    }

    let registry = match args.suppliers.as_ref().or(config.suppliers_file.as_ref()) {
        Some(path) => FileSupplierRegistry::new(path),
        None => FileSupplierRegistry::empty(),
    };

    let draft = match &args.draft {
        Some(path) => load_or_new(path)?,
        None => ProcurementRecord::new(),
    };

    let provider = config.provider()?;
    let (outcome, merged) = import_into(&args.file, &draft, provider, registry, importer_config, formatter).await?;

    println!("{}", formatter.format_import(&outcome)?);

    match args.out.as_ref().or(args.draft.as_ref()) {
        Some(destination) => {
            save_draft(destination, &merged)?;
            eprintln!(
                "{}",
                formatter.info(&format!("Draft written to {}", destination.display()))
            );
        }
        None => println!("{}", formatter.format_record(&merged)?),
    }

    Ok(())
}

/// Import `file` and merge the result into `draft`
///
/// Progress labels go to stderr. Nothing is written to disk.
pub async fn import_into<P: ExtractionProvider>(
    file: &Path,
    draft: &ProcurementRecord,
    provider: P,
    registry: FileSupplierRegistry,
    importer_config: ImporterConfig,
    formatter: &Formatter,
) -> Result<(ImportOutcome, ProcurementRecord)> {
    let upload = load_upload(file)?;
    let importer = Importer::new(provider, registry, importer_config)?;

    let progress = |label: &str| eprintln!("{}", formatter.info(label));
    let outcome = importer.import(&upload, &progress).await?;

    let merged = outcome.apply_to(draft);
    Ok((outcome, merged))
}
