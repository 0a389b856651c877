//! Reading uploads and supplier registries from disk.
//!
//! Spreadsheets are decoded with `calamine` (xlsx, xls, xlsb, ods) or `csv`;
//! every cell becomes text. PDFs are passed through as original bytes with no
//! page text, so they can only be imported with original documents enabled.
//! Plain text files are split into pages on form feeds.

use crate::error::{CliError, Result};
use calamine::{open_workbook_auto, Data, Reader};
use licita_domain::{Supplier, SupplierRegistry};
use licita_extractor::{ImportError, Sheet, Upload};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Page separator in plain text exports
const FORM_FEED: char = '\x0c';

/// Workbook formats decoded with calamine
const WORKBOOK_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Read a file into an [`Upload`]
///
/// # Errors
///
/// - `Import(UnsupportedInput)` for an unrecognized extension
/// - `Io` / `Spreadsheet` when the file cannot be read
pub fn load_upload(path: &Path) -> Result<Upload> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let extension = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    let upload = match extension.as_str() {
        "pdf" => {
            let bytes = fs::read(path)?;
            debug!(file = %file_name, bytes = bytes.len(), "Read PDF");
            Upload::document(file_name, Vec::new())
                .with_mime_type("application/pdf")
                .with_original(bytes)
        }
        "txt" => {
            let text = fs::read_to_string(path)?;
            let pages: Vec<String> = text.split(FORM_FEED).map(str::to_string).collect();
            debug!(file = %file_name, pages = pages.len(), "Read text document");
            Upload::document(file_name, pages).with_mime_type("text/plain")
        }
        "csv" => {
            let sheet = read_csv(path)?;
            Upload::spreadsheet(file_name, vec![sheet]).with_mime_type("text/csv")
        }
        ext if WORKBOOK_EXTENSIONS.contains(&ext) => {
            let sheets = read_workbook(path)?;
            Upload::spreadsheet(file_name, sheets)
        }
        _ => return Err(ImportError::UnsupportedInput(file_name).into()),
    };

    Ok(upload)
}

fn read_csv(path: &Path) -> Result<Sheet> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| CliError::Spreadsheet(format!("{}: {}", path.display(), e)))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| CliError::Spreadsheet(format!("{}: {}", path.display(), e)))?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    debug!(sheet = %name, rows = rows.len(), "Read CSV");
    Ok(Sheet::new(name, rows))
}

fn read_workbook(path: &Path) -> Result<Vec<Sheet>> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| CliError::Spreadsheet(format!("Failed to open {}: {}", path.display(), e)))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in &sheet_names {
        let range = workbook
            .worksheet_range(sheet_name)
            .map_err(|e| CliError::Spreadsheet(format!("Failed to read sheet '{}': {}", sheet_name, e)))?;

        let rows: Vec<Vec<String>> = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();
        debug!(sheet = %sheet_name, rows = rows.len(), "Read sheet");
        sheets.push(Sheet::new(sheet_name.as_str(), rows));
    }

    Ok(sheets)
}

/// Render a cell as the text a user would see
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        // Integers without decimals
        Data::Float(n) if n.fract() == 0.0 && n.abs() < 1e15 => format!("{}", *n as i64),
        Data::Float(n) => format!("{}", n),
        Data::Int(n) => format!("{}", n),
        Data::Bool(b) => String::from(if *b { "TRUE" } else { "FALSE" }),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
    }
}

/// Supplier registry read from a TOML or JSON file on every lookup
///
/// `.json` files hold an array of suppliers; anything else is read as TOML
/// with a `[[suppliers]]` table array. A registry without a file is empty.
#[derive(Debug, Clone, Default)]
pub struct FileSupplierRegistry {
    path: Option<PathBuf>,
}

#[derive(Deserialize)]
struct SupplierFile {
    #[serde(default)]
    suppliers: Vec<Supplier>,
}

impl FileSupplierRegistry {
    /// Registry backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Registry with no entries
    pub fn empty() -> Self {
        Self::default()
    }

    /// The backing file, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl SupplierRegistry for FileSupplierRegistry {
    type Error = CliError;

    fn suppliers(&self) -> Result<Vec<Supplier>> {
        let Some(path) = &self.path else {
            return Ok(Vec::new());
        };

        let contents = fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        if is_json {
            Ok(serde_json::from_str(&contents)?)
        } else {
            let file: SupplierFile = toml::from_str(&contents)?;
            Ok(file.suppliers)
        }
    }
}
