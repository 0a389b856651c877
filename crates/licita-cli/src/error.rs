//! Error types for the CLI application.

use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Import error
    #[error(transparent)]
    Import(#[from] licita_extractor::ImportError),

    /// Record or ledger error
    #[error(transparent)]
    Ledger(#[from] licita_ledger::LedgerError),

    /// Extraction client error
    #[error(transparent)]
    Llm(#[from] licita_llm::LlmError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Spreadsheet could not be read
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
