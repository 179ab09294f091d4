//! Handler for the `export` command

use super::common::HandlerContext;
use crate::cli::OutputFormatter;
use crate::error::Result;
use crate::export::ExportFormat;
use std::fs;
use std::path::Path;

/// Handler for the `export` command
///
/// Writes every ticket in storage order, to `output_path` when given and
/// to stdout otherwise.
///
/// # Errors
///
/// Returns an error if the format is unknown, rendering fails, or the
/// output file cannot be written
pub fn handle_export_command(
    format: &str,
    output_path: Option<&Path>,
    ctx: &mut HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    let format = format.parse::<ExportFormat>()?;
    let tickets = ctx.store.all_tickets();
    let rendered = format.render(&tickets)?;

    match output_path {
        Some(path) => {
            fs::write(path, rendered)?;
            output.success(&format!(
                "Exported {} ticket(s) to {}",
                tickets.len(),
                path.display()
            ));
        },
        None => print!("{rendered}"),
    }
    Ok(())
}
