//! Command-line front end for the occurrence engine.
//!
//! # Responsibility
//! - Verify `eventpulse_core` linkage without an embedding host.
//! - Offer quick manual checks of date resolution and upcoming queries.
//!
//! Without a subcommand the core version is printed. File logging is enabled
//! when `--log-dir` (or `EVENTPULSE_LOG_DIR`) names an absolute directory.

use chrono::Utc;
use clap::{Parser, Subcommand, ValueEnum};
use eventpulse_core::{
    core_version, init_logging_from_config, resolve_date_expression, DatePurpose, EngineConfig,
    InMemoryEventSource, SubscriptionTier, UpcomingService,
};
use log::info;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "eventpulse")]
#[command(about = "Command-line front end for the EventPulse occurrence engine")]
struct Cli {
    /// Absolute directory for rolling log files
    #[arg(long, env = "EVENTPULSE_LOG_DIR", global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the core crate version
    Version,

    /// Resolve a date expression to epoch milliseconds
    Resolve {
        /// Year policy to apply
        #[arg(value_enum)]
        purpose: PurposeArg,
        /// Date text, e.g. `03/18/2025` or `next tuesday`
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Print upcoming occurrences as a JSON response envelope
    Upcoming {
        /// Look-ahead in days (defaults to the configured value)
        #[arg(short, long)]
        days: Option<u32>,
        /// Subscription tier deciding the result ceiling
        #[arg(short, long, value_enum, default_value = "free")]
        tier: TierArg,
        /// Case-insensitive label filter
        #[arg(short, long)]
        search: Option<String>,
        /// JSON file with `recipients` and `custom_events`
        #[arg(short, long)]
        records: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PurposeArg {
    Birthday,
    #[value(alias = "future_event")]
    FutureEvent,
}

impl From<PurposeArg> for DatePurpose {
    fn from(value: PurposeArg) -> Self {
        match value {
            PurposeArg::Birthday => DatePurpose::Birthday,
            PurposeArg::FutureEvent => DatePurpose::FutureEvent,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum TierArg {
    Free,
    Premium,
}

impl From<TierArg> for SubscriptionTier {
    fn from(value: TierArg) -> Self {
        match value {
            TierArg::Free => SubscriptionTier::Free,
            TierArg::Premium => SubscriptionTier::Premium,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match EngineConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("config error: {err}");
            return ExitCode::from(2);
        }
    };
    if let Some(log_dir) = cli.log_dir.as_deref() {
        if let Err(err) = init_logging_from_config(&config, log_dir) {
            eprintln!("logging disabled: {err}");
        }
    }

    let result = match cli.command.unwrap_or(Command::Version) {
        Command::Version => {
            println!("eventpulse_core version={}", core_version());
            Ok(())
        }
        Command::Resolve { purpose, text } => run_resolve(purpose.into(), &text.join(" ")),
        Command::Upcoming {
            days,
            tier,
            search,
            records,
        } => run_upcoming(&config, days, tier.into(), search.as_deref(), records),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("{message}");
            ExitCode::FAILURE
        }
    }
}

fn run_resolve(purpose: DatePurpose, text: &str) -> Result<(), String> {
    let instant = resolve_date_expression(text, purpose, None).map_err(|err| err.to_string())?;
    info!(
        "event=cli_resolve module=cli status=ok purpose={}",
        purpose.as_str()
    );
    println!("{instant}");
    Ok(())
}

fn run_upcoming(
    config: &EngineConfig,
    days: Option<u32>,
    tier: SubscriptionTier,
    search: Option<&str>,
    records: Option<PathBuf>,
) -> Result<(), String> {
    let source = match records {
        Some(path) => load_records(&path)?,
        None => InMemoryEventSource::default(),
    };

    let service = UpcomingService::with_config(source, config);
    let now = Utc::now().timestamp_millis();
    let response = service.upcoming_events_response(days, tier, search, now);
    let rendered = serde_json::to_string_pretty(&response).map_err(|err| err.to_string())?;
    println!("{rendered}");
    if response.ok {
        Ok(())
    } else {
        Err(response.message)
    }
}

fn load_records(path: &Path) -> Result<InMemoryEventSource, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|err| format!("cannot read records `{}`: {err}", path.display()))?;
    serde_json::from_str(&raw)
        .map_err(|err| format!("invalid records `{}`: {err}", path.display()))
}
