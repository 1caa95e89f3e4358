//! Segblock - manage segmented website block rules from the command line.
//!
//! The CLI is one presentation adapter over the rule service: it fills a
//! rule draft from arguments, runs the action, and prints the resulting
//! notice. Rule updates are written to an outbox file for the enforcement
//! component.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use directories::ProjectDirs;
use segblock_app::{Applied, BlockRuleService, Notice, ServiceError};
use segblock_core::{FileSync, NoopSync, RuleSync, SegmentCount, SyncError};
use segblock_storage::{Database, RuleStore};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File the rule updates are written to, inside the data directory.
const OUTBOX_FILE_NAME: &str = "blocked-sites.json";

/// Segblock - block websites except for a few hours in every segment of the day
#[derive(Parser, Debug)]
#[command(name = "segblock", version, about)]
struct Args {
    /// Database file (defaults to the app data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// File the enforcement component reads rule updates from
    #[arg(long, global = true)]
    outbox: Option<PathBuf>,

    /// Do not publish rule updates
    #[arg(long, global = true, conflicts_with = "outbox")]
    no_sync: bool,

    /// Enable debug logging (also mirrors logs to stderr)
    #[arg(long, global = true)]
    debug: bool,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Add a block rule, or update the rule for the same site
    ///
    /// Options left out keep the saved values when the site already has a
    /// rule.
    Add {
        /// Website URL or hostname
        url: String,

        /// Segments per day (2, 4, 6, 8 or 12)
        #[arg(short, long, value_parser = parse_segments)]
        segments: Option<SegmentCount>,

        /// Unblocked hours per segment (clamped to the segment length)
        #[arg(short = 'H', long)]
        hours: Option<u32>,
    },

    /// List block rules
    List,

    /// Remove a block rule by list index or by site
    Remove {
        /// Index shown by `list`
        #[arg(required_unless_present = "host", conflicts_with = "host")]
        index: Option<usize>,

        /// Website URL or hostname
        #[arg(long)]
        host: Option<String>,
    },

    /// Show the allowed segment counts and their lengths
    Segments,

    /// Delete every block rule, even when the saved list is unreadable
    Reset {
        /// Confirm deleting all rules
        #[arg(long)]
        yes: bool,
    },
}

fn parse_segments(value: &str) -> Result<SegmentCount, String> {
    let count: u32 = value
        .parse()
        .map_err(|_| format!("`{value}` is not a number"))?;
    SegmentCount::try_from(count).map_err(|e| e.to_string())
}

/// Get the data directory path.
fn data_dir() -> Option<PathBuf> {
    ProjectDirs::from("com", "segblock", "segblock").map(|dirs| dirs.data_dir().to_path_buf())
}

/// Initialize logging with file rotation.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let log_level = if args.debug { "debug" } else { &args.log_level };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "segblock={0},segblock_app={0},segblock_core={0},segblock_storage={0},warn",
            log_level
        ))
    });

    if let Some(log_dir) = data_dir().map(|dir| dir.join("logs")) {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("segblock")
                .filename_suffix("log")
                .build(&log_dir)
                .ok();

            if let Some(appender) = file_appender {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);

                if args.debug {
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(std::io::stderr))
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();
                } else {
                    // Keep stdout clean for command output
                    tracing_subscriber::registry()
                        .with(env_filter)
                        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                        .init();
                }

                tracing::debug!("Logging to {:?}", log_dir);
                return Some(guard);
            }
        }
    }

    // Fallback: stderr logging only
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::warn!("File logging unavailable, using stderr only");
    None
}

fn open_database(args: &Args) -> anyhow::Result<Database> {
    let db = match &args.db {
        Some(path) => Database::with_path(path),
        None => Database::new(),
    };
    db.map_err(|e| anyhow::anyhow!("Database error: {}", e))
}

fn rule_sync(args: &Args) -> Box<dyn RuleSync> {
    if args.no_sync {
        return Box::new(NoopSync);
    }

    match args
        .outbox
        .clone()
        .or_else(|| data_dir().map(|dir| dir.join(OUTBOX_FILE_NAME)))
    {
        Some(path) => {
            let sync = FileSync::new(path);
            tracing::debug!("Publishing rule updates to {:?}", sync.path());
            Box::new(sync)
        }
        None => {
            tracing::warn!("No outbox location available, rule updates are not published");
            Box::new(NoopSync)
        }
    }
}

/// Print a notice and any sync warning; returns the exit code.
fn report(notice: Notice, result: &Result<Applied, ServiceError>) -> ExitCode {
    match result {
        Ok(applied) => {
            println!("{}", notice);
            if applied.replaced() {
                println!("  {} (updated)", applied.rule());
            } else {
                println!("  {}", applied.rule());
            }
            warn_unsynced(applied.sync_warning.as_ref());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("error: {}", notice);
            ExitCode::FAILURE
        }
    }
}

fn warn_unsynced(warning: Option<&SyncError>) {
    if let Some(warning) = warning {
        eprintln!("warning: enforcement not updated: {}", warning);
    }
}

type Service = BlockRuleService<Database, Box<dyn RuleSync>>;

fn open_service(args: &Args) -> anyhow::Result<Service> {
    let db = open_database(args)?;
    Ok(BlockRuleService::new(RuleStore::new(db), rule_sync(args)))
}

fn print_segments() {
    for segments in SegmentCount::ALL {
        println!(
            "{:>2} segments  {:>2}h each  unblock 1-{}h",
            segments.count(),
            segments.duration_hours(),
            segments.max_unblock_hours()
        );
    }
}

fn run(args: &Args) -> anyhow::Result<ExitCode> {
    let code = match &args.command {
        Command::Add {
            url,
            segments,
            hours,
        } => {
            let service = open_service(args)?;
            let result = service.draft_for(url).and_then(|mut draft| {
                if let Some(segments) = segments {
                    draft.select_segments(*segments);
                }
                if let Some(hours) = hours {
                    let stored = draft.set_unblock_hours(*hours);
                    if stored != *hours {
                        let (min, max) = draft.hours_range();
                        eprintln!(
                            "note: {}h is outside {}-{}h for {} segments, using {}h",
                            hours,
                            min,
                            max,
                            draft.segments(),
                            stored
                        );
                    }
                }
                service.save(&draft)
            });
            report(Notice::for_save(&result), &result)
        }
        Command::List => match open_service(args)?.list() {
            Ok(rules) if rules.is_empty() => {
                println!("No block rules");
                ExitCode::SUCCESS
            }
            Ok(rules) => {
                for (index, rule) in rules.iter().enumerate() {
                    println!("{:>3}  {}", index, rule);
                }
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Error loading blocked sites: {}", e);
                eprintln!("error: Failed to load block rules");
                ExitCode::FAILURE
            }
        },
        Command::Remove { index, host } => {
            let service = open_service(args)?;
            let result = match (index, host) {
                (_, Some(host)) => service.delete_host(host),
                (Some(index), None) => service.delete(*index),
                (None, None) => Err(ServiceError::NotFound("no rule given".into())),
            };
            report(Notice::for_delete(&result), &result)
        }
        Command::Segments => {
            print_segments();
            ExitCode::SUCCESS
        }
        Command::Reset { yes: false } => {
            eprintln!("error: this deletes every block rule; pass --yes to confirm");
            ExitCode::FAILURE
        }
        Command::Reset { yes: true } => {
            let result = open_service(args)?.clear();
            let notice = Notice::for_clear(&result);
            match &result {
                Ok(warning) => {
                    println!("{}", notice);
                    warn_unsynced(warning.as_ref());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    tracing::error!("{}", e);
                    eprintln!("error: {}", notice);
                    ExitCode::FAILURE
                }
            }
        }
    };

    Ok(code)
}

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();

    // Keep the guard alive so buffered log lines are flushed on exit
    let _log_guard = init_logging(&args);

    tracing::debug!("Args: {:?}", args);

    run(&args)
}
