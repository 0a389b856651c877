//! Licita CLI library.
//!
//! This library provides the core functionality for the Licita command-line interface,
//! including configuration management, file loading, draft persistence, command
//! execution, and output formatting.

pub mod cli;
pub mod commands;
pub mod config;
pub mod draft;
pub mod error;
pub mod loader;
pub mod output;
pub mod store;

pub use cli::{Cli, Command};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;
