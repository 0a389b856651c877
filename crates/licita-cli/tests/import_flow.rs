//! End-to-end flow: import a file into a draft, distribute, save.

use licita_cli::commands::import_into;
use licita_cli::config::OutputFormat;
use licita_cli::draft::{load_draft, save_draft};
use licita_cli::loader::FileSupplierRegistry;
use licita_cli::store::JsonDirStore;
use licita_cli::{CliError, Formatter};
use licita_domain::{RecordHeader, SequentialIdGenerator};
use licita_extractor::{ImportError, ImportWarning, ImporterConfig};
use licita_ledger::{ProcurementRecord, RecordStore, RecordValidator};
use licita_llm::MockProvider;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const SUPPLIERS: &str = r#"
[[suppliers]]
id = "s-1"
name = "ACME Comercio Ltda"
identifier = "12345678000190"
"#;

fn formatter() -> Formatter {
    Formatter::new(OutputFormat::Table, false)
}

fn write(dir: &TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_spreadsheet_import_distribute_and_save() {
    let dir = TempDir::new().unwrap();
    let csv = write(&dir, "itens.csv", b"Item,Descricao,Qtd,Valor\n1,Caneta,10,\"1,50\"\n2,Papel,5,20\n");
    let suppliers = write(&dir, "suppliers.toml", SUPPLIERS.as_bytes());

    let provider = MockProvider::new(
        r#"{"processNumber":"068/2023","supplierName":"ACME","supplierIdentifier":"12.345.678/0001-90",
            "items":[{"lote":"Lote 1","itemNumber":1,"description":"Caneta","quantity":10,"unitPrice":1.5},
                     {"lote":"Lote 1","itemNumber":2,"description":"Papel","quantity":5,"unitPrice":20}]}"#,
    );

    let (outcome, merged) = import_into(
        &csv,
        &ProcurementRecord::new(),
        provider.clone(),
        FileSupplierRegistry::new(suppliers),
        ImporterConfig::default(),
        &formatter(),
    )
    .await
    .unwrap();

    assert_eq!(provider.call_count(), 1);
    assert!(provider.requests()[0].prompt.contains("--- SHEET: itens ---"));
    assert!(outcome.warning.is_none());
    assert_eq!(merged.items().len(), 2);
    assert_eq!(merged.total_value(), 115.0);
    assert_eq!(merged.supplier().map(|s| s.as_str()), Some("s-1"));
    assert_eq!(merged.header().process_number, "068/2023");
    assert!(!merged.header().year.is_empty());

    // Persist the draft, distribute, and save
    let draft_path = dir.path().join("draft.json");
    save_draft(&draft_path, &merged).unwrap();

    let ids = SequentialIdGenerator::new();
    let draft = load_draft(&draft_path)
        .unwrap()
        .with_share_added("Saúde", 60.0, &ids)
        .unwrap();
    assert!((draft.shares()[0].allocated_value() - 69.0).abs() < 1e-9);

    let mut store = JsonDirStore::new(dir.path().join("records"));
    let saved = RecordValidator::default_config()
        .commit(&draft, &mut store, &ids)
        .unwrap();
    let loaded = store.load(saved.id().unwrap()).unwrap().unwrap();
    assert_eq!(loaded, saved);
}

#[tokio::test]
async fn test_pdf_is_sent_as_attachment_and_keeps_shares() {
    let dir = TempDir::new().unwrap();
    let pdf = write(&dir, "ata.pdf", b"%PDF-1.7 bytes");

    let ids = SequentialIdGenerator::starting_after(100);
    let draft = ProcurementRecord::new()
        .with_header(RecordHeader {
            object: "typed by hand".to_string(),
            ..RecordHeader::default()
        })
        .with_share_added("Educação", 25.0, &ids)
        .unwrap();

    let provider = MockProvider::default();
    provider.push_response_with_reason(
        r#"{"processNumber":"9/2024","year":"2024","items":[{"description":"A","quantity":4,"unitPrice":500},{"description":"B","quan"#,
        "MAX_TOKENS",
    );

    let (outcome, merged) = import_into(
        &pdf,
        &draft,
        provider.clone(),
        FileSupplierRegistry::empty(),
        ImporterConfig::default(),
        &formatter(),
    )
    .await
    .unwrap();

    let request = &provider.requests()[0];
    let attachment = request.attachment.as_ref().unwrap();
    assert_eq!(attachment.mime_type, "application/pdf");
    assert_eq!(attachment.data, b"%PDF-1.7 bytes");

    assert_eq!(outcome.warning, Some(ImportWarning::PossiblyIncomplete));
    assert_eq!(merged.items().len(), 1);
    assert_eq!(merged.header().year, "2024");
    // The header is replaced by the extraction
    assert_eq!(merged.header().object, "");
    assert!(merged.supplier().is_none());
    assert_eq!(merged.shares().len(), 1);
    assert_eq!(merged.shares()[0].allocated_value(), 500.0);
}

#[tokio::test]
async fn test_pdf_without_text_in_text_only_mode() {
    let dir = TempDir::new().unwrap();
    let pdf = write(&dir, "ata.pdf", b"%PDF-1.7 bytes");
    let provider = MockProvider::default();

    let result = import_into(
        &pdf,
        &ProcurementRecord::new(),
        provider.clone(),
        FileSupplierRegistry::empty(),
        ImporterConfig::text_only(),
        &formatter(),
    )
    .await;

    assert!(matches!(result, Err(CliError::Import(ImportError::EmptyDocument(_)))));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_unsupported_file_makes_no_request() {
    let dir = TempDir::new().unwrap();
    let image = write(&dir, "scan.png", b"\x89PNG");
    let provider = MockProvider::default();

    let result = import_into(
        &image,
        &ProcurementRecord::new(),
        provider.clone(),
        FileSupplierRegistry::empty(),
        ImporterConfig::default(),
        &formatter(),
    )
    .await;

    assert!(matches!(result, Err(CliError::Import(ImportError::UnsupportedInput(_)))));
    assert_eq!(provider.call_count(), 0);
}

#[tokio::test]
async fn test_unreadable_registry_leaves_supplier_unresolved() {
    let dir = TempDir::new().unwrap();
    let text = write(&dir, "ata.txt", "Ata de registro\x0cItem 1 Caneta".as_bytes());
    let provider = MockProvider::new(r#"{"supplierName":"ACME","items":[]}"#);

    let (outcome, merged) = import_into(
        &text,
        &ProcurementRecord::new(),
        provider,
        FileSupplierRegistry::new(dir.path().join("missing.toml")),
        ImporterConfig::default(),
        &formatter(),
    )
    .await
    .unwrap();

    assert!(outcome.supplier.supplier.is_none());
    assert!(merged.items().is_empty());
}
