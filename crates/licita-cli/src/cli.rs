//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Licita CLI - Import procurement records and distribute their value.
#[derive(Debug, Parser)]
#[command(name = "licita")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import a document or spreadsheet into a draft record
    Import(ImportArgs),

    /// Edit the header and supplier of a draft
    Header(HeaderArgs),

    /// Manage the line items of a draft
    Item(ItemArgs),

    /// Manage the distribution shares of a draft
    Share(ShareArgs),

    /// Show a draft
    Show(ShowArgs),

    /// Validate a draft and save it to a record store
    Save(SaveArgs),
}

/// Arguments for the import command.
#[derive(Debug, Parser)]
pub struct ImportArgs {
    /// File to import (.pdf, .txt, .csv, .xlsx, .xls, .ods)
    pub file: PathBuf,

    /// Draft to merge into (created when missing)
    #[arg(short, long)]
    pub draft: Option<PathBuf>,

    /// Supplier registry (TOML `[[suppliers]]` or JSON array)
    #[arg(short, long)]
    pub suppliers: Option<PathBuf>,

    /// Where to write the merged draft (defaults to --draft)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Send documents as extracted text, never as the original file
    #[arg(long)]
    pub text_only: bool,
}

/// Arguments for the header command.
#[derive(Debug, Parser)]
pub struct HeaderArgs {
    /// Draft file
    #[arg(short, long)]
    pub draft: PathBuf,

    /// Administrative process number
    #[arg(long)]
    pub process_number: Option<String>,

    /// Bidding modality
    #[arg(long)]
    pub modality: Option<String>,

    /// Procurement object
    #[arg(long)]
    pub object: Option<String>,

    /// Reference year
    #[arg(long)]
    pub year: Option<String>,

    /// Supplier registry id (empty string clears the selection)
    #[arg(long)]
    pub supplier: Option<String>,
}

/// Arguments for item management.
#[derive(Debug, Parser)]
pub struct ItemArgs {
    /// Draft file
    #[arg(short, long, global = true)]
    pub draft: Option<PathBuf>,

    #[command(subcommand)]
    pub action: ItemAction,
}

/// Item management actions.
#[derive(Debug, Subcommand)]
pub enum ItemAction {
    /// Append an empty item for manual entry
    Add,

    /// Edit fields of an item
    Edit {
        /// Item id
        id: String,
        /// Lot label
        #[arg(long)]
        lot: Option<String>,
        /// Item number within the lot
        #[arg(long)]
        number: Option<u32>,
        /// Description
        #[arg(long)]
        description: Option<String>,
        /// Brand
        #[arg(long)]
        brand: Option<String>,
        /// Unit of measure
        #[arg(long)]
        unit: Option<String>,
        /// Quantity
        #[arg(long)]
        quantity: Option<f64>,
        /// Unit price
        #[arg(long)]
        unit_price: Option<f64>,
    },

    /// Remove an item
    Remove {
        /// Item id
        id: String,
    },
}

/// Arguments for share management.
#[derive(Debug, Parser)]
pub struct ShareArgs {
    /// Draft file
    #[arg(short, long, global = true)]
    pub draft: Option<PathBuf>,

    #[command(subcommand)]
    pub action: ShareAction,
}

/// Share management actions.
#[derive(Debug, Subcommand)]
pub enum ShareAction {
    /// Allocate a percentage of the total value to a consumer
    Add {
        /// Consumer (department, secretariat, ...)
        consumer: String,
        /// Percentage in (0, 100]
        percentage: f64,
    },

    /// Remove a share
    Remove {
        /// Share id
        id: String,
    },
}

/// Arguments for the show command.
#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Draft file
    #[arg(short, long)]
    pub draft: PathBuf,
}

/// Arguments for the save command.
#[derive(Debug, Parser)]
pub struct SaveArgs {
    /// Draft file; rewritten with the assigned id after a save
    #[arg(short, long)]
    pub draft: PathBuf,

    /// Record store directory
    #[arg(short, long)]
    pub store: PathBuf,

    /// Also require modality and object
    #[arg(long)]
    pub strict: bool,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
        }
    }
}
