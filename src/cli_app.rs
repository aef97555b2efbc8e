//! Command-line definition, configuration layering and report output.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::Parser;
use colored::{Colorize, control};
use serde_json::{Value, json};
use thiserror::Error;

use retention_sweeper::core::config::{Config, parse_toggle};
use retention_sweeper::core::errors::SweepError;
use retention_sweeper::logger::activity::ActivityLogger;
use retention_sweeper::sweeper::entry::{AgeSource, EntryKind};
use retention_sweeper::sweeper::events::{SweepEvent, SweepObserver};
use retention_sweeper::sweeper::orchestrator::{SweepOrchestrator, SweepOutcome, SweepRequest};

/// Remove files and folders older than a number of days from one directory.
///
/// Only direct children of PATH are considered. Meant to run once a day per
/// path, e.g. from cron.
#[derive(Debug, Parser)]
#[command(name = "sweep", author, version, long_about = None)]
pub struct Cli {
    /// Show what would be removed without removing it.
    #[arg(long, value_name = "Yes|No", num_args = 0..=1, require_equals = true,
          default_missing_value = "yes", value_parser = toggle)]
    dryrun: Option<bool>,
    /// Remove files. A bare flag enables it. [default: Yes]
    #[arg(long, value_name = "Yes|No", num_args = 0..=1, require_equals = true,
          default_missing_value = "yes", value_parser = toggle)]
    files: Option<bool>,
    /// Max age of files in days. [default: 30]
    #[arg(long = "files_after", value_name = "NUM", allow_negative_numbers = true)]
    files_after: Option<i64>,
    /// Remove folders. A bare flag enables it. [default: No]
    #[arg(long, value_name = "Yes|No", num_args = 0..=1, require_equals = true,
          default_missing_value = "yes", value_parser = toggle)]
    folders: Option<bool>,
    /// Max age of folders in days. [default: 10]
    #[arg(long = "folders_after", value_name = "NUM", allow_negative_numbers = true)]
    folders_after: Option<i64>,
    /// Timestamp used as an entry's age. [default: changed]
    #[arg(long, value_name = "changed|modified", value_parser = age_source)]
    age_source: Option<AgeSource>,
    /// Load base configuration from a TOML file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Append JSONL activity events to this file.
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
    /// Print the final report as one JSON line instead of the progress log.
    #[arg(long)]
    json: bool,
    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
    /// Only print errors.
    #[arg(short, long)]
    quiet: bool,
    /// Directory to clean; the last one given wins. [default: /tmp/]
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,
}

fn toggle(raw: &str) -> Result<bool, std::convert::Infallible> {
    Ok(parse_toggle(raw))
}

fn age_source(raw: &str) -> Result<AgeSource, SweepError> {
    raw.parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Human,
    Json,
}

/// CLI error type with explicit exit-code mapping.
#[derive(Debug, Error)]
pub enum CliError {
    /// Bad configuration or target path.
    #[error("{0}")]
    User(String),
    /// Filesystem failure during the run.
    #[error("{0}")]
    Runtime(String),
    /// Bug or unexpected internal state.
    #[error("internal error: {0}")]
    Internal(String),
    /// JSON serialization failed.
    #[error("failed to serialize output: {0}")]
    Json(#[from] serde_json::Error),
    /// Output write failed.
    #[error("failed to write output: {0}")]
    Io(#[from] io::Error),
}

impl CliError {
    /// Process exit code contract for the CLI.
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::User(_) => 1,
            Self::Runtime(_) | Self::Io(_) => 2,
            Self::Internal(_) | Self::Json(_) => 3,
        }
    }
}

impl From<SweepError> for CliError {
    fn from(error: SweepError) -> Self {
        match error {
            SweepError::Serialization { .. } => Self::Internal(error.to_string()),
            _ if error.is_user_error() => Self::User(error.to_string()),
            _ => Self::Runtime(error.to_string()),
        }
    }
}

/// Resolve configuration, run the sweep and report.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    if cli.no_color {
        control::set_override(false);
    }

    let config = resolve_config(cli)?;
    let request = config.request();
    let mode = output_mode(cli);

    let mut observer = RunObserver {
        console: ConsoleReporter {
            enabled: mode == OutputMode::Human && !cli.quiet,
        },
        activity: ActivityLogger::open(config.logging.jsonl_path.as_deref()),
    };

    observer.console.line("Starting cleanup");
    observer
        .console
        .line(&format!("Cleanup for base {}", request.root.display()));
    observer.activity.run_started(&request);

    match SweepOrchestrator::new().run(&request, &mut observer) {
        Ok(outcome) => {
            observer.activity.run_completed(&request, &outcome);
            match mode {
                OutputMode::Human => observer.console.line("Finished cleanup"),
                OutputMode::Json => write_json_line(&report_json(&request, &outcome))?,
            }
            Ok(())
        }
        Err(error) => {
            observer.activity.run_failed(&error);
            Err(error.into())
        }
    }
}

/// Defaults, then config file and env, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<Config, CliError> {
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(path) = cli.paths.last() {
        config.path.clone_from(path);
    }
    if let Some(dry_run) = cli.dryrun {
        config.dry_run = dry_run;
    }
    if let Some(enabled) = cli.files {
        config.files.enabled = enabled;
    }
    if let Some(days) = cli.files_after {
        config.files.max_age_days = days;
    }
    if let Some(enabled) = cli.folders {
        config.folders.enabled = enabled;
    }
    if let Some(days) = cli.folders_after {
        config.folders.max_age_days = days;
    }
    if let Some(source) = cli.age_source {
        config.age_source = source;
    }
    if let Some(path) = &cli.log_file {
        config.logging.jsonl_path = Some(path.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Forwards every event to the console and the activity log.
struct RunObserver {
    console: ConsoleReporter,
    activity: ActivityLogger,
}

impl SweepObserver for RunObserver {
    fn on_event(&mut self, event: &SweepEvent) {
        self.console.on_event(event);
        self.activity.on_event(event);
    }
}

/// Human progress log on stdout.
struct ConsoleReporter {
    enabled: bool,
}

impl ConsoleReporter {
    fn line(&self, text: &str) {
        if self.enabled {
            println!("{text}");
        }
    }
}

impl SweepObserver for ConsoleReporter {
    fn on_event(&mut self, event: &SweepEvent) {
        if !self.enabled {
            return;
        }
        match event {
            SweepEvent::SweepStarted { kind, .. } => {
                println!("Cleaning {}...", kind.plural());
            }
            SweepEvent::SweepSkipped { kind } => {
                println!("Skipping {} cleanup", skip_label(*kind));
            }
            SweepEvent::Removing(target) => {
                println!(
                    "{} {} {} ...",
                    "Removing".red(),
                    target.kind.label(),
                    target.path.display()
                );
            }
            SweepEvent::WouldRemove(target) => {
                println!("{} {}", "Would remove".yellow(), target.path.display());
            }
            SweepEvent::SweepFinished(result) => {
                let verb = if result.dry_run {
                    "Would remove"
                } else {
                    "Removed"
                };
                println!("{verb} {} {}", result.removed_count, result.kind.plural());
            }
            SweepEvent::SweepFailed { kind, message } => {
                eprintln!("Cleaning {} failed: {message}", kind.plural());
            }
        }
    }
}

const fn skip_label(kind: EntryKind) -> &'static str {
    match kind {
        EntryKind::File => "file",
        EntryKind::Directory => "folder",
    }
}

fn report_json(request: &SweepRequest, outcome: &SweepOutcome) -> Value {
    let section = |kind: EntryKind| {
        let policy = request.policy(kind);
        let result = outcome.result(kind);
        json!({
            "enabled": policy.enabled,
            "max_age_days": policy.max_age_days,
            "removed": result.map_or(0, |r| r.removed_count),
            "paths": result.map_or_else(Vec::new, |r| r.removed.clone()),
        })
    };
    json!({
        "command": "sweep",
        "root": request.root,
        "dry_run": request.dry_run,
        "age_source": request.age_source,
        "files": section(EntryKind::File),
        "folders": section(EntryKind::Directory),
    })
}

fn write_json_line(payload: &Value) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer(&mut stdout, payload)?;
    writeln!(stdout)?;
    Ok(())
}

fn output_mode(cli: &Cli) -> OutputMode {
    let env_mode = std::env::var("SWEEP_OUTPUT_FORMAT").ok();
    resolve_output_mode(cli.json, env_mode.as_deref())
}

fn resolve_output_mode(json_flag: bool, env_mode: Option<&str>) -> OutputMode {
    if json_flag {
        return OutputMode::Json;
    }
    match env_mode.map(str::trim) {
        Some(mode) if mode.eq_ignore_ascii_case("json") => OutputMode::Json,
        _ => OutputMode::Human,
    }
}
