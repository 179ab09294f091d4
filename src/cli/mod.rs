//! Command-line interface for support-desk

pub mod handlers;
mod output;

pub use output::OutputFormatter;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Support ticket desk for cloud platform requests
#[derive(Parser, Debug)]
#[command(name = "support-desk", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory holding the ticket store
    #[arg(long, global = true, env = "SUPPORT_DESK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Configuration file to use instead of the default location
    #[arg(long, global = true, env = "SUPPORT_DESK_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Open a new ticket
    New {
        /// Short summary of the problem
        #[arg(short, long)]
        title: Option<String>,

        /// Full description
        #[arg(short, long)]
        description: Option<String>,

        /// Priority (low, medium, high, critical)
        #[arg(short, long, default_value = "medium")]
        priority: String,

        /// Affected service, e.g. "BigQuery"
        #[arg(short, long)]
        service: Option<String>,

        /// Reporter's email address
        #[arg(short, long, env = "SUPPORT_DESK_EMAIL")]
        email: Option<String>,

        /// Prompt for any field not given on the command line
        #[arg(short, long)]
        interactive: bool,
    },

    /// List tickets, optionally filtered
    List {
        /// Comma-separated statuses to include
        #[arg(long)]
        status: Option<String>,

        /// Comma-separated priorities to include
        #[arg(long)]
        priority: Option<String>,

        /// Comma-separated service labels to include
        #[arg(long)]
        service: Option<String>,

        /// Sort by (stored, created, updated, priority, status, title)
        #[arg(long, default_value = "stored")]
        sort: String,

        /// Reverse the order
        #[arg(short, long)]
        reverse: bool,

        /// Show at most this many tickets
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show a ticket and its comments
    Show {
        /// Ticket id, e.g. T-1001 or 1001
        ticket: String,
    },

    /// Search tickets by text
    Search {
        /// Text to look for in title, description, service and id
        query: String,

        /// Treat the query as a regular expression
        #[arg(long)]
        regex: bool,

        /// Also match the reporter's email address
        #[arg(long, conflicts_with = "regex")]
        creator: bool,
    },

    /// Change a ticket's fields
    Edit {
        ticket: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        #[arg(long)]
        service: Option<String>,
    },

    /// Set a ticket's status
    Status {
        ticket: String,

        /// New status (open, in-progress, resolved, closed)
        status: String,
    },

    /// Assign a ticket to someone, or clear its assignee
    Assign {
        ticket: String,

        /// Assignee email address
        #[arg(required_unless_present = "unassign")]
        assignee: Option<String>,

        /// Remove the current assignee
        #[arg(long, conflicts_with = "assignee")]
        unassign: bool,
    },

    /// Add a comment to a ticket
    Comment {
        ticket: String,

        /// Comment text
        content: String,

        /// Comment author
        #[arg(short, long, env = "SUPPORT_DESK_EMAIL")]
        author: String,
    },

    /// Show tickets in columns by status
    Board {
        /// Use compact view with less spacing
        #[arg(long)]
        compact: bool,
    },

    /// Show dashboard counts
    Stats,

    /// List suggested service labels and team members
    Services,

    /// Export all tickets
    Export {
        /// Format (json, yaml, csv, markdown)
        #[arg(short, long, default_value = "json")]
        format: String,

        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the configuration file location
    Path,

    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}
