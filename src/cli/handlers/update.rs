//! Handlers for commands that change an existing ticket

use super::common::{HandlerContext, colored_status, resolve_ticket_ref};
use crate::cli::OutputFormatter;
use crate::core::{Priority, Status, Ticket, TicketUpdate, is_known_service};
use crate::error::{DeskError, Result};

/// Parameters for the edit command
pub struct EditParams {
    pub ticket: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub service: Option<String>,
}

/// Handler for the `edit` command
///
/// # Errors
///
/// Returns an error if no field is given, a priority is not recognized,
/// or the ticket does not exist
pub fn handle_edit_command(
    params: EditParams,
    ctx: &mut HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    let update = TicketUpdate {
        title: params.title,
        description: params.description,
        priority: params
            .priority
            .as_deref()
            .map(str::parse::<Priority>)
            .transpose()?,
        gcp_service: params.service,
        ..TicketUpdate::default()
    };
    if update.is_empty() {
        return Err(DeskError::InvalidInput(
            "Nothing to change; pass at least one of --title, --description, --priority, --service"
                .to_string(),
        ));
    }
    if let Some(service) = &update.gcp_service {
        if !is_known_service(&ctx.config.desk.services, service) {
            output.warning(&format!("'{service}' is not a listed service"));
        }
    }

    let id = resolve_ticket_ref(&params.ticket);
    let ticket = ctx.store.update_ticket(&id, update)?;
    ctx.warn_if_unsaved(output);
    report(&ticket, &format!("Updated ticket {}", ticket.id), output)
}

/// Handler for the `status` command
///
/// # Errors
///
/// Returns an error if the status is not recognized or the ticket does
/// not exist
pub fn handle_status_command(
    ticket_ref: &str,
    status: &str,
    ctx: &mut HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    let status = status.parse::<Status>()?;
    let id = resolve_ticket_ref(ticket_ref);
    let ticket = ctx.store.set_status(&id, status)?;
    ctx.warn_if_unsaved(output);
    report(
        &ticket,
        &format!("{} is now {}", ticket.id, colored_status(ticket.status)),
        output,
    )
}

/// Handler for the `assign` command
///
/// # Errors
///
/// Returns an error if the assignee is not an email address or the ticket
/// does not exist
pub fn handle_assign_command(
    ticket_ref: &str,
    assignee: Option<&str>,
    ctx: &mut HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    if let Some(email) = assignee {
        if !ctx.config.desk.team.iter().any(|member| member == email) {
            tracing::debug!(assignee = email, "assignee is not on the configured team");
        }
    }

    let id = resolve_ticket_ref(ticket_ref);
    let ticket = ctx.store.assign(&id, assignee)?;
    ctx.warn_if_unsaved(output);

    let message = match &ticket.assigned_to {
        Some(email) => format!("Assigned {} to {email}", ticket.id),
        None => format!("Cleared assignee of {}", ticket.id),
    };
    report(&ticket, &message, output)
}

/// Handler for the `comment` command
///
/// # Errors
///
/// Returns an error if the comment is empty or the ticket does not exist
pub fn handle_comment_command(
    ticket_ref: &str,
    content: &str,
    author: &str,
    ctx: &mut HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    if content.trim().is_empty() {
        return Err(DeskError::InvalidInput("Comment text is empty".to_string()));
    }

    let id = resolve_ticket_ref(ticket_ref);
    let comment = ctx.store.add_comment(&id, content, author)?;
    ctx.warn_if_unsaved(output);

    if output.is_json() {
        output.print_json(&comment)
    } else {
        output.success(&format!("Added {} to {}", comment.id, comment.ticket_id));
        Ok(())
    }
}

fn report(ticket: &Ticket, message: &str, output: &OutputFormatter) -> Result<()> {
    if output.is_json() {
        output.print_json(ticket)
    } else {
        output.success(message);
        Ok(())
    }
}
