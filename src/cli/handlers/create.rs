//! Handler for the `new` command

use super::common::{HandlerContext, colored_priority};
use crate::cli::OutputFormatter;
use crate::core::{NewTicket, Priority, is_known_service};
use crate::error::{DeskError, Result};
use dialoguer::{Input, Select, theme::ColorfulTheme};

/// Parameters for opening a ticket
pub struct NewParams {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: String,
    pub service: Option<String>,
    pub email: Option<String>,
    pub interactive: bool,
}

/// Handler for the `new` command
///
/// Fields missing from the command line are prompted for in interactive
/// mode and rejected otherwise.
///
/// # Errors
///
/// Returns an error if a required field is missing, the priority is
/// not recognized, or no ticket number is left
pub fn handle_new_command(
    params: NewParams,
    ctx: &mut HandlerContext,
    output: &OutputFormatter,
) -> Result<()> {
    let new = if params.interactive {
        prompt_missing(params, ctx)?
    } else {
        from_arguments(params)?
    };

    if !is_known_service(&ctx.config.desk.services, &new.gcp_service) {
        output.warning(&format!(
            "'{}' is not a listed service; run `support-desk services` for suggestions",
            new.gcp_service
        ));
    }

    let ticket = ctx.store.create_ticket(new)?;
    ctx.warn_if_unsaved(output);

    if output.is_json() {
        output.print_json(&ticket)?;
    } else {
        output.success(&format!(
            "Created ticket {} ({})",
            ticket.id,
            colored_priority(ticket.priority)
        ));
        output.line(&ticket.id.to_string());
    }
    Ok(())
}

fn from_arguments(params: NewParams) -> Result<NewTicket> {
    let priority = params.priority.parse::<Priority>()?;
    Ok(NewTicket {
        title: required("title", params.title)?,
        description: params.description.unwrap_or_default(),
        priority,
        gcp_service: required("service", params.service)?,
        created_by: required("email", params.email)?,
        status: Default::default(),
    })
}

fn required(field: &str, value: Option<String>) -> Result<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| {
            DeskError::InvalidInput(format!(
                "Missing --{field}; pass it on the command line or use --interactive"
            ))
        })
}

fn prompt_missing(params: NewParams, ctx: &HandlerContext) -> Result<NewTicket> {
    let theme = ColorfulTheme::default();

    let title = match params.title {
        Some(title) => title,
        None => Input::with_theme(&theme)
            .with_prompt("Title")
            .interact_text()?,
    };

    let description = match params.description {
        Some(description) => description,
        None => Input::with_theme(&theme)
            .with_prompt("Description")
            .allow_empty(true)
            .interact_text()?,
    };

    let default_priority = params.priority.parse::<Priority>().unwrap_or_default();
    let priority_index = Priority::ALL
        .iter()
        .position(|p| *p == default_priority)
        .unwrap_or(1);
    let priorities: Vec<&str> = Priority::ALL.iter().map(Priority::as_str).collect();
    let priority = Priority::ALL[Select::with_theme(&theme)
        .with_prompt("Priority")
        .items(&priorities)
        .default(priority_index)
        .interact()?];

    let gcp_service = match params.service {
        Some(service) => service,
        None => {
            let services = &ctx.config.desk.services;
            if services.is_empty() {
                Input::with_theme(&theme)
                    .with_prompt("Service")
                    .interact_text()?
            } else {
                let index = Select::with_theme(&theme)
                    .with_prompt("Service")
                    .items(services)
                    .default(0)
                    .interact()?;
                services[index].clone()
            }
        },
    };

    let created_by = match params.email {
        Some(email) => email,
        None => Input::with_theme(&theme)
            .with_prompt("Your email")
            .validate_with(|input: &String| {
                if input.contains('@') {
                    Ok(())
                } else {
                    Err("enter an email address")
                }
            })
            .interact_text()?,
    };

    Ok(NewTicket {
        title: required("title", Some(title))?,
        description,
        priority,
        gcp_service: required("service", Some(gcp_service))?,
        created_by: required("email", Some(created_by))?,
        status: Default::default(),
    })
}
