use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};

use crate::features::report::ReportView;

#[derive(Parser)]
#[command(name = "readtime")]
#[command(about = "Track reading sessions and the breaks between them")]
#[command(long_about = "readtime - a reading and break time tracker

Start a timer when you sit down to read, stop it when you get up. When you
come back, tell readtime what you did on your break and it resumes the
reading timer. Totals reset every day; history is kept for reports.

QUICK START:
  readtime start                      Start reading
  readtime stop                       Stop and start the break clock
  readtime start                      Back from the break: asks what you did
  readtime break confirm -a walk,tea  Record the break and resume reading
  readtime watch                      Live timer in the terminal

OUTPUT FORMATS:
  --output pretty    Human-readable colored output (default)
  --output json      Machine-readable JSON for scripting

For more information on a specific command, run:
  readtime <command> --help")]
#[command(version, propagate_version = true)]
pub struct Cli {
    /// Output format for command results
    ///
    /// Use 'pretty' for human-readable colored output,
    /// or 'json' for machine-readable output suitable for scripting.
    /// Defaults to the config file's `general.default_output`.
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Data directory (database, config and log file)
    #[arg(long, global = true, env = "READTIME_HOME", value_name = "DIR")]
    pub home: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Output format for command results.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable colored output.
    #[default]
    Pretty,
    /// Machine-readable JSON output.
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start reading
    ///
    /// Starts the reading timer. If you stopped reading earlier today, the
    /// break has to be confirmed first: start reports how long you have
    /// been away and points at 'readtime break confirm'.
    ///
    /// The first start of a day never asks about a break.
    ///
    /// # Examples
    ///
    ///   readtime start
    ///   readtime s
    #[command(alias = "s")]
    Start,

    /// Stop reading
    ///
    /// Records the session, adds it to today's total and starts the
    /// break clock.
    #[command(alias = "x")]
    Stop,

    /// Confirm or dismiss the pending break
    Break(BreakArgs),

    /// Show the timer and today's totals
    #[command(alias = "st")]
    Status,

    /// Show a day's session history
    ///
    /// Lists reading sessions and confirmed breaks in the order they
    /// happened. Days are kept until the next daily reset.
    ///
    /// # Examples
    ///
    ///   readtime history
    ///   readtime history --date yesterday
    ///   readtime history --date 2024-06-10
    History {
        /// Day to show (today, yesterday, YYYY-MM-DD, "3 days ago", monday)
        #[arg(long, short = 'd')]
        date: Option<String>,
    },

    /// Charts of reading time and breaks
    ///
    /// # Examples
    ///
    ///   readtime report
    ///   readtime report --period month --view breaks
    ///   readtime report -o json
    Report {
        /// Period (week, month). Defaults to the config file's `report.default_period`.
        #[arg(long, short = 'p')]
        period: Option<String>,

        /// Which chart to show
        #[arg(long, value_enum, default_value = "all")]
        view: ReportViewArg,
    },

    /// Live timer view
    ///
    /// Keys: s start, x stop, q quit. When a break is pending, pick the
    /// activities with j/k and Space, Enter to confirm, Esc to dismiss.
    #[command(alias = "w")]
    Watch,

    /// Import a browser local-storage dump
    ///
    /// Reads the JSON produced by `JSON.stringify(localStorage)` on the
    /// browser tracker's page.
    Import {
        /// Path to the dump
        file: PathBuf,

        /// Replace existing tracker data
        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the stored record as JSON
    Export,

    /// Delete all tracker data
    Reset {
        /// Required confirmation
        #[arg(long)]
        force: bool,
    },

    /// Inspect or create the config file
    Config(ConfigArgs),

    /// Generate shell completions
    ///
    /// Example: readtime completions bash > ~/.bash_completion.d/readtime
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell, elvish)
        shell: String,

        /// Show installation instructions
        #[arg(long, short = 'i')]
        install: bool,
    },
}

#[derive(Args)]
pub struct BreakArgs {
    #[command(subcommand)]
    pub command: BreakCommands,
}

/// Break subcommands.
#[derive(Subcommand)]
pub enum BreakCommands {
    /// Record the pending break and resume reading
    ///
    /// Each selected activity is credited with the whole break.
    ///
    /// Examples:
    ///   readtime break confirm
    ///   readtime break confirm -a walk,snack
    ///   readtime break confirm -a walk -a "make tea"
    Confirm {
        /// Break activities (comma-separated or repeated)
        #[arg(long, short = 'a', value_delimiter = ',')]
        activities: Vec<String>,
    },

    /// Close the prompt without recording anything
    ///
    /// The break stays pending; the next start asks again.
    Dismiss,
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,
    /// Print the config file location
    Path,
    /// Write the default config file
    Init {
        /// Overwrite an existing file
        #[arg(long, short = 'f')]
        force: bool,
    },
}

/// Report chart selection.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReportViewArg {
    /// Every chart
    #[default]
    All,
    /// Reading minutes
    Reading,
    /// Break activities
    Breaks,
    /// Activity pattern
    Pattern,
    /// Hour-of-day heatmap
    Heatmap,
}

impl From<ReportViewArg> for ReportView {
    fn from(arg: ReportViewArg) -> Self {
        match arg {
            ReportViewArg::All => Self::All,
            ReportViewArg::Reading => Self::Reading,
            ReportViewArg::Breaks => Self::Breaks,
            ReportViewArg::Pattern => Self::Pattern,
            ReportViewArg::Heatmap => Self::Heatmap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_start_command() {
        let cli = Cli::try_parse_from(["readtime", "start"]).unwrap();
        assert!(matches!(cli.command, Commands::Start));
        assert_eq!(cli.output, None);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_cli_aliases() {
        let cli = Cli::try_parse_from(["readtime", "s"]).unwrap();
        assert!(matches!(cli.command, Commands::Start));
        let cli = Cli::try_parse_from(["readtime", "x"]).unwrap();
        assert!(matches!(cli.command, Commands::Stop));
    }

    #[test]
    fn test_cli_break_confirm_comma_list() {
        let cli = Cli::try_parse_from(["readtime", "break", "confirm", "-a", "walk,snack", "-a", "tea"])
            .unwrap();
        match cli.command {
            Commands::Break(args) => match args.command {
                BreakCommands::Confirm { activities } => {
                    assert_eq!(activities, vec!["walk", "snack", "tea"]);
                }
                BreakCommands::Dismiss => panic!("expected confirm"),
            },
            _ => panic!("expected break"),
        }
    }

    #[test]
    fn test_cli_break_confirm_without_activities() {
        let cli = Cli::try_parse_from(["readtime", "break", "confirm"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Break(BreakArgs {
                command: BreakCommands::Confirm { ref activities }
            }) if activities.is_empty()
        ));
    }

    #[test]
    fn test_cli_break_dismiss() {
        let cli = Cli::try_parse_from(["readtime", "break", "dismiss"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Break(BreakArgs {
                command: BreakCommands::Dismiss
            })
        ));
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "readtime", "status", "-o", "json", "--home", "/tmp/rt", "-vv",
        ])
        .unwrap();
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.home, Some(PathBuf::from("/tmp/rt")));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_report_options() {
        let cli = Cli::try_parse_from(["readtime", "report", "--period", "month", "--view", "heatmap"])
            .unwrap();
        match cli.command {
            Commands::Report { period, view } => {
                assert_eq!(period.as_deref(), Some("month"));
                assert_eq!(view, ReportViewArg::Heatmap);
                assert_eq!(ReportView::from(view), ReportView::Heatmap);
            }
            _ => panic!("expected report"),
        }
    }

    #[test]
    fn test_cli_history_date() {
        let cli = Cli::try_parse_from(["readtime", "history", "--date", "yesterday"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::History { date: Some(ref d) } if d == "yesterday"
        ));
    }

    #[test]
    fn test_cli_import_requires_file() {
        assert!(Cli::try_parse_from(["readtime", "import"]).is_err());
        let cli = Cli::try_parse_from(["readtime", "import", "dump.json", "--force"]).unwrap();
        assert!(matches!(cli.command, Commands::Import { force: true, .. }));
    }

    #[test]
    fn test_cli_config_init() {
        let cli = Cli::try_parse_from(["readtime", "config", "init", "--force"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Config(ConfigArgs {
                command: ConfigCommands::Init { force: true }
            })
        ));
    }

    #[test]
    fn test_cli_unknown_command() {
        assert!(Cli::try_parse_from(["readtime", "pause"]).is_err());
    }
}
