use anyhow::Result;
use clap::Parser;
use colored::Colorize;

use readtime::cli::args::{Cli, Commands};
use readtime::cli::commands::{self, Context};
use readtime::config::{Config, Paths};
use readtime::error::ReadtimeError;
use readtime::logging;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<(), ReadtimeError> {
    let cli = Cli::parse();
    let paths = Paths::resolve(cli.home)?;
    let config = Config::load_from_path(&paths.config_file)?;
    config.general.color.apply();

    // The live view owns the terminal, so its logs go to a file
    if matches!(cli.command, Commands::Watch) {
        paths.ensure_dirs()?;
        logging::init_file(cli.verbose, &paths.log_file)?;
    } else {
        logging::init_stderr(cli.verbose)?;
    }

    let format = cli.output.unwrap_or(config.general.default_output);
    let ctx = Context {
        paths,
        config,
        format,
    };
    tracing::debug!(root = %ctx.paths.root.display(), ?format, "resolved context");

    let output = match cli.command {
        Commands::Start => commands::start(&ctx)?,
        Commands::Stop => commands::stop(&ctx)?,
        Commands::Break(args) => commands::break_command(&ctx, args.command)?,
        Commands::Status => commands::status(&ctx)?,
        Commands::History { date } => commands::history(&ctx, date.as_deref())?,
        Commands::Report { period, view } => commands::report(&ctx, period.as_deref(), view)?,
        Commands::Watch => {
            readtime::tui::run(&ctx)?;
            String::new()
        }
        Commands::Import { file, force } => commands::import(&ctx, &file, force)?,
        Commands::Export => commands::export(&ctx)?,
        Commands::Reset { force } => commands::reset(&ctx, force)?,
        Commands::Config(args) => commands::config(&ctx, args.command)?,
        Commands::Completions { shell, install } => commands::completions(&shell, install)?,
    };

    if !output.is_empty() {
        println!("{output}");
    }
    Ok(())
}
