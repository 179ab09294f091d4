//! Handler for the `config` subcommands

use crate::cli::{ConfigCommands, OutputFormatter};
use crate::config::Config;
use crate::error::{DeskError, Result};
use std::path::{Path, PathBuf};

/// Handler for the `config` command
///
/// `config` is the effective configuration and `path` the file it was
/// read from (`--config` or the platform default).
///
/// # Errors
///
/// Returns an error if no configuration location is available, or the
/// file exists and `--force` was not given
pub fn handle_config_command(
    command: ConfigCommands,
    config: &Config,
    path: Option<&Path>,
    output: &OutputFormatter,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            if output.is_json() {
                output.print_json(config)
            } else {
                output.line(config.to_yaml()?.trim_end());
                Ok(())
            }
        },
        ConfigCommands::Path => {
            let path = config_path(path)?;
            if output.is_json() {
                output.print_json(&serde_json::json!({
                    "path": path,
                    "exists": path.exists(),
                }))
            } else {
                output.line(&path.display().to_string());
                Ok(())
            }
        },
        ConfigCommands::Init { force } => {
            let path = config_path(path)?;
            if path.exists() && !force {
                return Err(DeskError::InvalidInput(format!(
                    "{} already exists; use --force to overwrite it",
                    path.display()
                )));
            }
            Config::default().save(&path)?;
            output.success(&format!("Wrote default configuration to {}", path.display()));
            Ok(())
        },
    }
}

fn config_path(path: Option<&Path>) -> Result<PathBuf> {
    path.map(Path::to_path_buf)
        .or_else(Config::default_path)
        .ok_or_else(|| {
            DeskError::custom("No configuration directory is available; pass --config <FILE>")
        })
}
