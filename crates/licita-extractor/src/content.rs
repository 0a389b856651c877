//! Upload content and its normalization to a single text blob

use crate::ImportError;
use tracing::debug;

/// Kind of uploaded source, decided from media type and file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceKind {
    /// Page-ordered document (PDF, plain text)
    Document,
    /// Workbook of named sheets (XLSX, XLSM, XLSB, XLS, ODS, CSV)
    Spreadsheet,
}

impl SourceKind {
    /// Detect the kind of an upload
    ///
    /// # Errors
    ///
    /// `UnsupportedInput` when neither the media type nor the extension is
    /// recognized.
    pub fn detect(file_name: &str, mime_type: Option<&str>) -> Result<Self, ImportError> {
        let name = file_name.to_lowercase();
        let mime = mime_type.unwrap_or_default().to_lowercase();

        if mime == "application/pdf" || name.ends_with(".pdf") {
            return Ok(SourceKind::Document);
        }
        if mime.contains("sheet")
            || mime.contains("excel")
            || mime == "text/csv"
            || [".xlsx", ".xlsm", ".xlsb", ".xls", ".ods", ".csv"]
                .iter()
                .any(|ext| name.ends_with(ext))
        {
            return Ok(SourceKind::Spreadsheet);
        }
        if mime == "text/plain" || name.ends_with(".txt") {
            return Ok(SourceKind::Document);
        }

        Err(ImportError::UnsupportedInput(file_name.to_string()))
    }

    /// Label used in logs and metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Document => "document",
            SourceKind::Spreadsheet => "spreadsheet",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named sheet of cells rendered as text
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Sheet {
    /// Sheet (tab) name
    pub name: String,

    /// Rows of cells
    pub rows: Vec<Vec<String>>,
}

impl Sheet {
    /// Create a sheet
    pub fn new(name: impl Into<String>, rows: Vec<Vec<String>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }
}

/// Decoded content of an upload
#[derive(Debug, Clone, PartialEq)]
pub enum UploadContent {
    /// Page-ordered text, optionally with the original file bytes
    Pages {
        /// Text of each page, in order
        pages: Vec<String>,
        /// Original file, sent as-is when allowed
        original: Option<Vec<u8>>,
    },
    /// Named sheets, in workbook order
    Sheets(Vec<Sheet>),
}

/// A file handed to the importer
#[derive(Debug, Clone, PartialEq)]
pub struct Upload {
    /// File name as uploaded
    pub file_name: String,

    /// Declared media type, if known
    pub mime_type: Option<String>,

    /// Decoded content
    pub content: UploadContent,
}

impl Upload {
    /// A paged document
    pub fn document(file_name: impl Into<String>, pages: Vec<String>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            content: UploadContent::Pages {
                pages,
                original: None,
            },
        }
    }

    /// A workbook
    pub fn spreadsheet(file_name: impl Into<String>, sheets: Vec<Sheet>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: None,
            content: UploadContent::Sheets(sheets),
        }
    }

    /// Set the declared media type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    /// Keep the original bytes of a paged document
    pub fn with_original(mut self, bytes: Vec<u8>) -> Self {
        if let UploadContent::Pages { original, .. } = &mut self.content {
            *original = Some(bytes);
        }
        self
    }

    /// Detect the source kind from name and media type
    pub fn kind(&self) -> Result<SourceKind, ImportError> {
        SourceKind::detect(&self.file_name, self.mime_type.as_deref())
    }

    /// Media type to declare when sending the original bytes
    pub fn original_mime_type(&self) -> String {
        match &self.mime_type {
            Some(mime) if !mime.trim().is_empty() => mime.clone(),
            _ if self.file_name.to_lowercase().ends_with(".pdf") => "application/pdf".to_string(),
            _ => "application/octet-stream".to_string(),
        }
    }
}

/// Normalized text plus whether the budget cut it short
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContent {
    /// Text sent to the extraction service
    pub text: String,

    /// Whether the text was truncated to the budget
    pub truncated: bool,
}

impl NormalizedContent {
    /// Number of characters in the text
    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }
}

/// Serialize sheets as marked CSV blocks, within `max_chars`
///
/// Blank rows are dropped and sheets left with no rows are skipped.
///
/// # Examples
///
/// ```
/// use licita_extractor::{normalize_sheets, Sheet};
///
/// let sheet = Sheet::new("Lote 1", vec![vec!["Item".into(), "Qtd".into()]]);
/// let content = normalize_sheets(&[sheet], 1000).unwrap();
/// assert_eq!(content.text, "--- SHEET: Lote 1 ---\nItem,Qtd\n");
/// ```
pub fn normalize_sheets(sheets: &[Sheet], max_chars: usize) -> Result<NormalizedContent, ImportError> {
    let mut blocks = Vec::new();

    for sheet in sheets {
        let csv = sheet_to_csv(sheet)?;
        if csv.trim().is_empty() {
            debug!(sheet = %sheet.name, "Skipping empty sheet");
            continue;
        }
        blocks.push(format!("--- SHEET: {} ---\n{}", sheet.name, csv));
    }

    Ok(truncate_chars(blocks.join("\n"), max_chars))
}

/// Join non-blank pages under page markers, within `max_chars`
pub fn normalize_pages(pages: &[String], max_chars: usize) -> NormalizedContent {
    let blocks: Vec<String> = pages
        .iter()
        .enumerate()
        .filter(|(_, page)| !page.trim().is_empty())
        .map(|(index, page)| format!("--- PAGE {} ---\n{}", index + 1, page.trim_end()))
        .collect();

    truncate_chars(blocks.join("\n"), max_chars)
}

fn sheet_to_csv(sheet: &Sheet) -> Result<String, ImportError> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in sheet.rows.iter().filter(|row| !is_blank_row(row)) {
        writer
            .write_record(row)
            .map_err(|e| sheet_error(sheet, e))?;
    }

    let bytes = writer.into_inner().map_err(|e| sheet_error(sheet, e))?;
    String::from_utf8(bytes).map_err(|e| sheet_error(sheet, e))
}

fn sheet_error(sheet: &Sheet, cause: impl std::fmt::Display) -> ImportError {
    ImportError::SheetEncoding {
        sheet: sheet.name.clone(),
        message: cause.to_string(),
    }
}

fn is_blank_row(row: &[String]) -> bool {
    row.iter().all(|cell| cell.trim().is_empty())
}

/// Cut `text` to at most `max_chars` characters, never inside a UTF-8 sequence
pub fn truncate_chars(text: String, max_chars: usize) -> NormalizedContent {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => NormalizedContent {
            text: text[..byte_index].to_string(),
            truncated: true,
        },
        None => NormalizedContent {
            text,
            truncated: false,
        },
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Truncated text never exceeds the budget and is a prefix of the input
        #[test]
        fn test_truncation_within_budget(text in "\\PC{0,200}", budget in 0usize..150) {
            let content = truncate_chars(text.clone(), budget);
            prop_assert!(content.char_count() <= budget);
            prop_assert!(text.starts_with(&content.text));
            prop_assert_eq!(content.truncated, text.chars().count() > budget);
        }
    }
}
