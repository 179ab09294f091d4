//! Handlers for the `board`, `stats` and `services` commands
//!
//! These are the dashboard views: tickets in status columns, summary
//! counts, and the suggestion lists a reporter picks from.

use super::common::{HandlerContext, colored_priority, colored_status, truncate};
use crate::cli::OutputFormatter;
use crate::error::Result;
use crate::store::{Board, TicketStats};
use colored::Colorize;

const COLUMN_WIDTH: usize = 24;

/// Handler for the `board` command
///
/// Displays tickets in one column per status.
///
/// # Arguments
///
/// * `compact` - Use compact view with less spacing
/// * `ctx` - Handler context holding the store
/// * `output` - Output formatter for displaying results
pub fn handle_board_command(
    compact: bool,
    ctx: &mut HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    let board = ctx.store.board();

    if output.is_json() {
        output_json(&board, output)
    } else {
        output_text(&board, compact, output);
        Ok(())
    }
}

fn output_json(board: &Board, output: &OutputFormatter) -> Result<()> {
    let columns: serde_json::Map<String, serde_json::Value> = board
        .columns
        .iter()
        .map(|(status, tickets)| {
            let cards: Vec<_> = tickets
                .iter()
                .map(|t| {
                    serde_json::json!({
                        "id": t.id,
                        "title": t.title,
                        "priority": t.priority,
                        "gcpService": t.gcp_service,
                        "assignedTo": t.assigned_to,
                        "comments": t.comments.len(),
                    })
                })
                .collect();
            (status.to_string(), serde_json::Value::Array(cards))
        })
        .collect();

    output.print_json(&columns)
}

fn output_text(board: &Board, compact: bool, output: &OutputFormatter) {
    let separator = "+".to_string()
        + &vec!["-".repeat(COLUMN_WIDTH + 2); board.columns.len()].join("+")
        + "+";

    output.line(&separator);
    let header_cells: Vec<String> = board
        .columns
        .iter()
        .map(|(status, tickets)| {
            let label = format!("{} ({})", status.as_str(), tickets.len());
            let styled = format!(
                "{} ({})",
                colored_status(*status).bold(),
                tickets.len()
            );
            pad(&styled, &label, COLUMN_WIDTH)
        })
        .collect();
    output.line(&format!("| {} |", header_cells.join(" | ")));
    output.line(&separator);

    let depth = board
        .columns
        .iter()
        .map(|(_, tickets)| tickets.len())
        .max()
        .unwrap_or(0);

    for row in 0..depth {
        let mut id_cells = Vec::new();
        let mut title_cells = Vec::new();
        for (_, tickets) in &board.columns {
            match tickets.get(row) {
                Some(ticket) => {
                    let plain = format!("{} {}", ticket.id, ticket.priority);
                    let styled = format!("{} {}", ticket.id, colored_priority(ticket.priority));
                    id_cells.push(pad(&styled, &plain, COLUMN_WIDTH));
                    title_cells.push(pad_plain(&truncate(&ticket.title, COLUMN_WIDTH)));
                },
                None => {
                    id_cells.push(pad_plain(""));
                    title_cells.push(pad_plain(""));
                },
            }
        }
        output.line(&format!("| {} |", id_cells.join(" | ")));
        output.line(&format!("| {} |", title_cells.join(" | ")));
        if !compact && row + 1 < depth {
            output.line(&format!(
                "| {} |",
                vec![pad_plain(""); board.columns.len()].join(" | ")
            ));
        }
    }

    output.line(&separator);
}

/// Pad `styled` to `width` visible characters, measuring with `plain`
fn pad(styled: &str, plain: &str, width: usize) -> String {
    let visible = plain.chars().count();
    format!("{styled}{}", " ".repeat(width.saturating_sub(visible)))
}

fn pad_plain(text: &str) -> String {
    pad(text, text, COLUMN_WIDTH)
}

/// Handler for the `stats` command
pub fn handle_stats_command(ctx: &mut HandlerContext, output: &OutputFormatter) -> Result<()> {
    let stats = ctx.store.stats();

    if output.is_json() {
        return output.print_json(&stats);
    }

    print_stats(&stats, output);
    Ok(())
}

fn print_stats(stats: &TicketStats, output: &OutputFormatter) {
    output.line(&"Ticket Overview".bold().to_string());
    output.line(&format!("  Total:               {}", stats.total));
    output.line(&format!("  Open:                {}", stats.open));
    output.line(&format!("  In progress:         {}", stats.in_progress));
    output.line(&format!("  Resolved:            {}", stats.resolved));
    output.line(&format!("  Closed:              {}", stats.closed));
    output.line(&format!(
        "  Critical / high:     {} / {}",
        stats.critical.to_string().red(),
        stats.high.to_string().yellow()
    ));
    output.line(&format!("  Awaiting assignment: {}", stats.awaiting_assignment));
    output.line(&format!("  Comments:            {}", stats.comments));

    if stats.by_service.is_empty() {
        return;
    }

    output.line("");
    output.line(&"By service".bold().to_string());
    for (service, count) in &stats.by_service {
        output.line(&format!("  {service:<24} {count}"));
    }
}

/// Handler for the `services` command
///
/// Lists the service labels and team addresses offered as suggestions.
pub fn handle_services_command(ctx: &HandlerContext, output: &OutputFormatter) -> Result<()> {
    let desk = &ctx.config.desk;

    if output.is_json() {
        return output.print_json(&serde_json::json!({
            "services": desk.services,
            "team": desk.team,
        }));
    }

    output.line(&"Services".bold().to_string());
    for service in &desk.services {
        output.line(&format!("  {service}"));
    }
    output.line("");
    output.line(&"Team".bold().to_string());
    for member in &desk.team {
        output.line(&format!("  {member}"));
    }
    Ok(())
}
