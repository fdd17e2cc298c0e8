//! Output formatting for CLI results

use serde::Serialize;
use tabled::Tabled;

use crate::cli::OutputFormat;
use crate::error::Result;

pub mod json;
pub mod table;

/// Print rows as a table, or wrapped as JSON.
///
/// `pretty` is rendered by the caller; here it falls back to the table.
pub fn print_rows<T: Tabled + Serialize>(rows: &[T], format: OutputFormat) -> Result<()> {
    let output = match format {
        OutputFormat::Json => json::format_json(rows)?,
        OutputFormat::Pretty | OutputFormat::Table => table::format_table(rows),
    };
    println!("{}", output);
    Ok(())
}
