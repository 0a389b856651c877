//! Error types for the importer

use licita_llm::LlmError;
use thiserror::Error;

/// Errors that abort an import
///
/// None of them touch the draft record; the caller keeps whatever was entered
/// manually and may retry.
#[derive(Error, Debug)]
pub enum ImportError {
    /// File kind not recognized; rejected before any network call
    #[error("Unsupported file: {0} (send a PDF, a spreadsheet or a text file)")]
    UnsupportedInput(String),

    /// Nothing to extract from
    #[error("The file is empty or could not be read: {0}")]
    EmptyDocument(String),

    /// A sheet could not be rendered as CSV text
    #[error("Failed to read sheet '{sheet}': {message}")]
    SheetEncoding {
        /// Sheet (tab) name
        sheet: String,
        /// Underlying writer or encoding error
        message: String,
    },

    /// Transport or service failure, including timeouts
    #[error("Extraction service error: {0}")]
    ExtractionService(String),

    /// The service answered without text
    #[error("The service returned no text{}", describe_reason(.finish_reason))]
    EmptyOrBlocked {
        /// Stop or block reason, if the service gave one
        finish_reason: Option<String>,
    },

    /// Every repair step failed
    #[error("The service response could not be read as structured data")]
    UnparsableResponse {
        /// First characters of the raw response, for logs only
        preview: String,
    },

    /// Another import is still running on this importer
    #[error("An import is already in progress")]
    ImportInProgress,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_reason(reason: &Option<String>) -> String {
    match reason {
        Some(reason) => format!(" (stop reason: {})", reason),
        None => String::new(),
    }
}

impl From<LlmError> for ImportError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::EmptyResponse { finish_reason } => ImportError::EmptyOrBlocked { finish_reason },
            LlmError::Config(msg) => ImportError::Config(msg),
            other => ImportError::ExtractionService(other.to_string()),
        }
    }
}
