//! Handler for the `show` command

use super::common::{HandlerContext, colored_priority, colored_status, resolve_ticket_ref};
use crate::cli::OutputFormatter;
use crate::core::Ticket;
use crate::error::{DeskError, Result};
use crate::store::SYSTEM_AUTHOR;
use colored::Colorize;

/// Handler for the `show` command
///
/// # Errors
///
/// Returns an error if the ticket does not exist
pub fn handle_show_command(
    ticket_ref: &str,
    ctx: &mut HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    let id = resolve_ticket_ref(ticket_ref);
    let ticket = ctx
        .store
        .ticket(&id)
        .ok_or_else(|| DeskError::ticket_not_found(&id))?;

    if output.is_json() {
        output.print_json(&ticket)
    } else {
        print_ticket(&ticket, output);
        Ok(())
    }
}

fn print_ticket(ticket: &Ticket, output: &OutputFormatter) {
    output.line(&format!("{} {}", ticket.id.as_str().bold(), ticket.title.bold()));
    output.line("");
    output.line(&format!("Status:      {}", colored_status(ticket.status)));
    output.line(&format!("Priority:    {}", colored_priority(ticket.priority)));
    output.line(&format!("Service:     {}", ticket.gcp_service));
    output.line(&format!("Reported by: {}", ticket.created_by));
    output.line(&format!(
        "Assigned to: {}",
        ticket.assigned_to.as_deref().unwrap_or("-")
    ));
    output.line(&format!(
        "Created:     {}",
        ticket.created_at.format("%Y-%m-%d %H:%M UTC")
    ));
    output.line(&format!(
        "Updated:     {}",
        ticket.updated_at.format("%Y-%m-%d %H:%M UTC")
    ));

    if !ticket.description.is_empty() {
        output.line("");
        for line in ticket.description.lines() {
            output.line(&format!("  {line}"));
        }
    }

    if ticket.comments.is_empty() {
        return;
    }

    output.line("");
    output.line(&format!("Comments ({}):", ticket.comments.len()).bold().to_string());
    for comment in &ticket.comments {
        let author = if comment.author == SYSTEM_AUTHOR {
            comment.author.dimmed()
        } else {
            comment.author.cyan()
        };
        output.line(&format!(
            "  [{}] {} {}",
            comment.created_at.format("%Y-%m-%d %H:%M"),
            author,
            comment.id.as_str().dimmed()
        ));
        for line in comment.content.lines() {
            output.line(&format!("    {line}"));
        }
    }
}
