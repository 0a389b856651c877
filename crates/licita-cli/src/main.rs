//! Licita CLI - Command-line interface for the procurement import engine.

use clap::Parser;
use licita_cli::commands;
use licita_cli::{Cli, Command, Config, Formatter};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> licita_cli::Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    // Load config (missing file means defaults)
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    // Determine output format
    let format = cli
        .format
        .map(Into::into)
        .unwrap_or(config.settings.format);

    // Determine color setting
    let color_enabled = !cli.no_color && config.settings.color;

    // Create formatter
    let formatter = Formatter::new(format, color_enabled);

    match cli.command {
        Command::Import(args) => commands::execute_import(args, &config, &formatter).await?,
        Command::Header(args) => commands::execute_header(args, &formatter)?,
        Command::Item(args) => commands::execute_item(args, &formatter)?,
        Command::Share(args) => commands::execute_share(args, &formatter)?,
        Command::Show(args) => commands::execute_show(args, &formatter)?,
        Command::Save(args) => commands::execute_save(args, &formatter)?,
    }

    Ok(())
}

/// Log to stderr; `RUST_LOG` wins over the verbosity flag
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
