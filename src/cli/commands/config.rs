//! Config file commands.

use crate::cli::args::{ConfigCommands, OutputFormat};
use crate::config::Config;
use crate::error::ReadtimeError;
use crate::output::to_json;

use super::Context;

/// Execute config subcommands
///
/// # Errors
///
/// Returns an error if the config file exists and `force` is not set, or if
/// it cannot be written.
pub fn config(ctx: &Context, cmd: ConfigCommands) -> Result<String, ReadtimeError> {
    match cmd {
        ConfigCommands::Show => match ctx.format {
            OutputFormat::Json => to_json(&ctx.config),
            OutputFormat::Pretty => Ok(ctx.config.to_yaml()?.trim_end().to_string()),
        },

        ConfigCommands::Path => Ok(ctx.paths.config_file.display().to_string()),

        ConfigCommands::Init { force } => {
            let path = &ctx.paths.config_file;
            if path.exists() && !force {
                return Err(ReadtimeError::Config(format!(
                    "{} already exists. Use --force to overwrite",
                    path.display()
                )));
            }

            ctx.paths.ensure_dirs()?;
            Config::default().save_to_path(path)?;
            Ok(format!("Wrote default config to {}", path.display()))
        }
    }
}
