//! App types command implementation

use crate::cli::OutputFormat;
use crate::error::Result;
use crate::models::AppTypeDisplay;
use crate::output::{self, json};

/// List the supported app types
pub fn run(format: OutputFormat) -> Result<()> {
    let rows = AppTypeDisplay::all();
    match format {
        OutputFormat::Json => println!("{}", json::format_json(&rows)?),
        OutputFormat::Pretty | OutputFormat::Table => output::print_rows(&rows, format)?,
    }
    Ok(())
}
