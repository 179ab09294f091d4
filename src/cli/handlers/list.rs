//! Handlers for the `list` and `search` commands

use super::common::{HandlerContext, ticket_row};
use crate::cli::OutputFormatter;
use crate::core::Ticket;
use crate::error::Result;
use crate::store::{SortBy, TicketFilter, sort_tickets};
use colored::Colorize;

/// Parameters for the list command
pub struct ListParams {
    pub status: Option<String>,
    pub priority: Option<String>,
    pub service: Option<String>,
    pub sort: String,
    pub reverse: bool,
    pub limit: Option<usize>,
}

/// Parameters for the search command
pub struct SearchParams {
    pub query: String,
    pub regex: bool,
    pub creator: bool,
}

/// Handler for the `list` command
///
/// Filters are comma-separated lists; a ticket is shown when it matches
/// every list given.
///
/// # Errors
///
/// Returns an error if a filter value or the sort key is not recognized
pub fn handle_list_command(
    params: ListParams,
    ctx: &mut HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    let filter = TicketFilter::from_lists(
        params.status.as_deref(),
        params.priority.as_deref(),
        params.service.as_deref(),
    )?;
    let sort_by = params.sort.parse::<SortBy>()?;

    let mut tickets = ctx.store.filter(&filter);
    sort_tickets(&mut tickets, sort_by, params.reverse);
    if let Some(limit) = params.limit {
        tickets.truncate(limit);
    }

    print_tickets(&tickets, output)
}

/// Handler for the `search` command
///
/// # Errors
///
/// Returns an error if `--regex` is given and the pattern does not compile
pub fn handle_search_command(
    params: SearchParams,
    ctx: &mut HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    let tickets = if params.regex {
        ctx.store.search_regex(&params.query)?
    } else if params.creator {
        ctx.store.search_with_creator(&params.query)
    } else {
        ctx.store.search(&params.query)
    };

    tracing::debug!(query = %params.query, hits = tickets.len(), "search finished");
    print_tickets(&tickets, output)
}

fn print_tickets(tickets: &[Ticket], output: &OutputFormatter) -> Result<()> {
    if output.is_json() {
        return output.print_json(tickets);
    }

    if tickets.is_empty() {
        output.info("No tickets found");
        return Ok(());
    }

    output.line(
        &format!(
            "{:<8} {:<11} {:<8} {:<18} {}",
            "ID", "STATUS", "PRIORITY", "SERVICE", "TITLE"
        )
        .bold()
        .to_string(),
    );
    for ticket in tickets {
        output.line(&ticket_row(ticket));
    }
    output.info(&format!("\n{} ticket(s)", tickets.len()));
    Ok(())
}
