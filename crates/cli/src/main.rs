// timberline CLI - headless timber log tracking

mod exit_codes;
mod report;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "timberline")]
#[command(about = "Timber log tracking: filter, aggregate, age and route log shipments")]
#[command(version)]
struct Cli {
    /// Debug logging on stderr (overrides RUST_LOG)
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the full report from a .timber.toml config
    #[command(after_help = "\
Examples:
  timberline run weekly.timber.toml
  timberline run weekly.timber.toml --json
  timberline run weekly.timber.toml --output report.json --now 2025-08-05T08:00:00
  timberline run weekly.timber.toml --fail-on-overdue")]
    Run {
        /// Path to the .timber.toml config file
        config: PathBuf,

        /// Output JSON to stdout instead of only the human summary
        #[arg(long)]
        json: bool,

        /// Write JSON output to file
        #[arg(long)]
        output: Option<PathBuf>,

        /// Aging reference timestamp (defaults to aging.reference_now, then local now)
        #[arg(long, env = "TIMBERLINE_NOW")]
        now: Option<String>,

        /// Exit 62 when any at-camp log is overdue
        #[arg(long)]
        fail_on_overdue: bool,
    },

    /// Validate a config without loading data
    #[command(after_help = "\
Examples:
  timberline validate weekly.timber.toml")]
    Validate {
        /// Path to the .timber.toml config file
        config: PathBuf,
    },

    /// Quick filter + totals straight from a CSV, no config file
    #[command(after_help = "\
Examples:
  timberline summary logs.csv --region Kapit --region Sibu --date 2025-07-27
  timberline summary logs.csv --date 2025-07-27 --json")]
    Summary {
        /// CSV file with the standard Log_ID..Longitude headers
        csv: PathBuf,

        /// Region to include (repeatable). Defaults to every region in the file.
        #[arg(long = "region")]
        regions: Vec<String>,

        /// Calendar day to select (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Output JSON to stdout
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run { config, json, output, now, fail_on_overdue } => {
            report::cmd_run(config, json, output, now, fail_on_overdue)
        }
        Commands::Validate { config } => report::cmd_validate(config),
        Commands::Summary { csv, regions, date, json } => report::cmd_summary(csv, regions, date, json),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn usage(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
