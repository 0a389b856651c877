//! Show command implementation.

use crate::cli::ShowArgs;
use crate::draft::load_draft;
use crate::error::Result;
use crate::output::Formatter;

/// Execute the show command.
pub fn execute_show(args: ShowArgs, formatter: &Formatter) -> Result<()> {
    let record = load_draft(&args.draft)?;
    println!("{}", formatter.format_record(&record)?);
    Ok(())
}
