//! support-desk - Support ticket desk for cloud platform requests
//!
//! This is the main entry point for the support-desk CLI application.
//! It handles command-line argument parsing and dispatches to the appropriate
//! command handlers.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use support_desk::cli::handlers::{
    EditParams, HandlerContext, ListParams, NewParams, SearchParams, handle_assign_command,
    handle_board_command, handle_comment_command, handle_config_command, handle_edit_command,
    handle_export_command, handle_list_command, handle_new_command, handle_search_command,
    handle_services_command, handle_show_command, handle_stats_command, handle_status_command,
};
use support_desk::cli::{Cli, Commands, OutputFormatter};
use support_desk::config::Config;
use support_desk::error::{DeskError, Result};
use tracing_subscriber::EnvFilter;

/// Environment variable holding a log filter, e.g. `support_desk=debug`
const LOG_ENV: &str = "SUPPORT_DESK_LOG";

/// Main entry point for the support-desk CLI
///
/// Parses command-line arguments and executes the requested command.
/// Handles errors gracefully and provides helpful error messages to users.
fn main() {
    let cli = Cli::parse();

    let formatter = OutputFormatter::new(cli.json, cli.no_color);

    if let Err(e) = run(cli, &formatter) {
        handle_error(&e, &formatter);
        process::exit(1);
    }
}

/// Run the CLI application with the parsed arguments
///
/// # Errors
///
/// Returns any error that occurs while loading configuration or running
/// the command
fn run(cli: Cli, formatter: &OutputFormatter) -> Result<()> {
    init_logging(cli.verbose);

    // `config init --config <FILE>` runs before the file exists
    let config_file = cli
        .config
        .as_deref()
        .filter(|path| path.exists() || !matches!(cli.command, Commands::Config { .. }));
    let mut config = Config::load(config_file)?;
    if let Some(data_dir) = cli.data_dir {
        config.storage.data_dir = Some(data_dir);
    }

    dispatch_command(cli.command, config, cli.config, formatter)
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn dispatch_command(
    command: Commands,
    config: Config,
    config_path: Option<PathBuf>,
    formatter: &OutputFormatter,
) -> Result<()> {
    let mut ctx = HandlerContext::new(config)?;
    match command {
        Commands::New { title, description, priority, service, email, interactive } =>
            handle_new_command(
                NewParams { title, description, priority, service, email, interactive },
                &mut ctx,
                formatter,
            ),
        Commands::List { status, priority, service, sort, reverse, limit } =>
            handle_list_command(
                ListParams { status, priority, service, sort, reverse, limit },
                &mut ctx,
                formatter,
            ),
        Commands::Show { ticket } => handle_show_command(&ticket, &mut ctx, formatter),
        Commands::Search { query, regex, creator } =>
            handle_search_command(SearchParams { query, regex, creator }, &mut ctx, formatter),
        Commands::Edit { ticket, title, description, priority, service } =>
            handle_edit_command(
                EditParams { ticket, title, description, priority, service },
                &mut ctx,
                formatter,
            ),
        Commands::Status { ticket, status } =>
            handle_status_command(&ticket, &status, &mut ctx, formatter),
        Commands::Assign { ticket, assignee, unassign } => {
            let assignee = if unassign { None } else { assignee };
            handle_assign_command(&ticket, assignee.as_deref(), &mut ctx, formatter)
        },
        Commands::Comment { ticket, content, author } =>
            handle_comment_command(&ticket, &content, &author, &mut ctx, formatter),
        Commands::Board { compact } => handle_board_command(compact, &mut ctx, formatter),
        Commands::Stats => handle_stats_command(&mut ctx, formatter),
        Commands::Services => handle_services_command(&ctx, formatter),
        Commands::Export { format, output } =>
            handle_export_command(&format, output.as_deref(), &mut ctx, formatter),
        Commands::Config { command } =>
            handle_config_command(command, &ctx.config, config_path.as_deref(), formatter),
    }
}

/// Print an error with its suggestions, and as JSON in JSON mode
fn handle_error(error: &DeskError, formatter: &OutputFormatter) {
    formatter.error(&error.user_message());

    let suggestions = error.suggestions();
    if !suggestions.is_empty() {
        formatter.info("\nSuggestions:");
        for suggestion in &suggestions {
            formatter.info(&format!("  • {suggestion}"));
        }
    }

    if formatter.is_json() {
        let _ = formatter.print_json(&serde_json::json!({
            "status": "error",
            "error": error.to_string(),
            "error_type": format!("{:?}", error),
            "suggestions": suggestions,
            "recoverable": error.is_recoverable(),
            "is_config_error": error.is_config_error(),
        }));
    }

    if tracing::enabled!(tracing::Level::DEBUG) {
        eprintln!("\nDebug information:");
        eprintln!("{error:?}");
    }
}
