//! Rendering of the ticket collection for export

use crate::core::Ticket;
use crate::error::{DeskError, Result};
use std::fmt::Write;
use std::str::FromStr;

/// Supported export formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Yaml,
    Csv,
    Markdown,
}

impl ExportFormat {
    /// Get file extension for the format
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Csv => "csv",
            Self::Markdown => "md",
        }
    }

    /// Render tickets in this format
    pub fn render(&self, tickets: &[Ticket]) -> Result<String> {
        match self {
            Self::Json => export_json(tickets),
            Self::Yaml => export_yaml(tickets),
            Self::Csv => export_csv(tickets),
            Self::Markdown => export_markdown(tickets).map_err(|e| {
                DeskError::SerializationError(format!("Failed to render Markdown: {e}"))
            }),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = DeskError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "yaml" | "yml" => Ok(Self::Yaml),
            "csv" => Ok(Self::Csv),
            "markdown" | "md" => Ok(Self::Markdown),
            _ => Err(DeskError::InvalidInput(format!(
                "Invalid export format: {s}. Must be one of: json, yaml, csv, markdown"
            ))),
        }
    }
}

fn export_json(tickets: &[Ticket]) -> Result<String> {
    serde_json::to_string_pretty(tickets).map_err(|e| {
        DeskError::SerializationError(format!("Failed to serialize to JSON: {e}"))
    })
}

fn export_yaml(tickets: &[Ticket]) -> Result<String> {
    serde_yaml::to_string(tickets).map_err(|e| {
        DeskError::SerializationError(format!("Failed to serialize to YAML: {e}"))
    })
}

fn export_csv(tickets: &[Ticket]) -> Result<String> {
    let csv_error =
        |e: csv::Error| DeskError::SerializationError(format!("Failed to write CSV: {e}"));
    let mut writer = csv::Writer::from_writer(vec![]);

    writer
        .write_record([
            "id",
            "title",
            "description",
            "status",
            "priority",
            "gcp_service",
            "created_by",
            "assigned_to",
            "created_at",
            "updated_at",
            "comments",
        ])
        .map_err(csv_error)?;

    for ticket in tickets {
        writer
            .write_record([
                ticket.id.to_string(),
                ticket.title.clone(),
                ticket.description.clone(),
                ticket.status.to_string(),
                ticket.priority.to_string(),
                ticket.gcp_service.clone(),
                ticket.created_by.clone(),
                ticket.assigned_to.clone().unwrap_or_default(),
                ticket.created_at.to_rfc3339(),
                ticket.updated_at.to_rfc3339(),
                ticket.comments.len().to_string(),
            ])
            .map_err(csv_error)?;
    }

    let bytes = writer.into_inner().map_err(|e| {
        DeskError::SerializationError(format!("Failed to flush CSV: {}", e.error()))
    })?;
    String::from_utf8(bytes)
        .map_err(|e| DeskError::SerializationError(format!("Invalid UTF-8 in CSV: {e}")))
}

fn export_markdown(tickets: &[Ticket]) -> std::result::Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "# Support Tickets\n")?;
    writeln!(
        output,
        "Generated: {}\n",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    for ticket in tickets {
        writeln!(output, "## {} - {}\n", ticket.id, ticket.title)?;
        writeln!(output, "- **Status**: {}", ticket.status)?;
        writeln!(output, "- **Priority**: {}", ticket.priority)?;
        writeln!(output, "- **Service**: {}", ticket.gcp_service)?;
        writeln!(output, "- **Reported by**: {}", ticket.created_by)?;
        if let Some(assignee) = &ticket.assigned_to {
            writeln!(output, "- **Assigned to**: {assignee}")?;
        }

        if !ticket.description.is_empty() {
            writeln!(output, "\n{}\n", ticket.description)?;
        }

        if !ticket.comments.is_empty() {
            writeln!(output, "### Comments\n")?;
            for comment in &ticket.comments {
                writeln!(
                    output,
                    "- **{}** ({}): {}",
                    comment.author,
                    comment.created_at.format("%Y-%m-%d %H:%M"),
                    comment.content
                )?;
            }
            writeln!(output)?;
        }

        writeln!(output, "---\n")?;
    }

    Ok(output)
}
