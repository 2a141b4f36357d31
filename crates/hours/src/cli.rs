//! Command-line surface: global options, subcommands and what they print.
//!
//! With no subcommand `hours` opens the TUI.

use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use time::OffsetDateTime;
use tracing::info;

use crate::app::App;
use crate::config::{Config, ConfigError, DEFAULT_MIN_LOG_SECS};
use crate::domain::clock::Clock;
use crate::domain::period::{
    DateRange, PeriodError, PeriodOptions, REPORT_MAX_DAYS, parse_period, parse_stats_period,
};
use crate::domain::task::TaskStatus;
use crate::domain::timestamp::{secs_between, truncate_to_second};
use crate::infra::db::{Database, DbError};
use crate::logging::{self, LoggingError};
use crate::report::RecordsKind;
use crate::report::active::{DEFAULT_TEMPLATE, render_active};
use crate::report::interactive::{PagerError, RecordsPager, WindowAnchor};
use crate::report::stats;
use crate::runtime;

const WEEK_PERIOD: &str = "week";

/// Errors surfaced by the `hours` binary.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Logging(#[from] LoggingError),
    #[error(transparent)]
    Db(#[from] DbError),
    #[error(transparent)]
    Period(#[from] PeriodError),
    #[error(transparent)]
    Pager(#[from] PagerError),
    #[error(
        "tracked time is too short to save ({secs}s, the minimum is {min_secs}s); \
         keep tracking, or discard the entry from the TUI with <ctrl+x>"
    )]
    TooShort { secs: i64, min_secs: i64 },
    #[error("interactive mode is not applicable {0}")]
    InteractiveNotApplicable(&'static str),
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Parser)]
#[command(name = "hours", version, about = "\"hours\" is a no-frills time tracking toolkit for the command line")]
pub struct Cli {
    /// Location of hours' database file
    #[arg(short = 'd', long = "dbpath", env = "HOURS_DB_PATH", global = true)]
    pub db_path: Option<String>,

    /// Log entries shorter than this many seconds need an explicit discard
    #[arg(long, env = "HOURS_MIN_LOG_SECS", default_value_t = DEFAULT_MIN_LOG_SECS, global = true)]
    pub min_log_secs: i64,

    /// Where to write logs when HOURS_LOG is set [default: hours.log next to the database]
    #[arg(long, env = "HOURS_LOG_FILE", global = true)]
    pub log_file: Option<PathBuf>,

    /// Tracing filter directives, e.g. "hours=debug"
    #[arg(long, env = "HOURS_LOG", hide = true, global = true)]
    pub log_filter: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, PartialEq, Eq, Subcommand)]
pub enum Commands {
    /// Output a report based on task log entries, one column per day
    ///
    /// PERIOD is one of today, yest, <N>d, week, YYYY/MM/DD or
    /// YYYY/MM/DD...YYYY/MM/DD, spanning at most 7 days.
    Report {
        #[arg(default_value = "3d")]
        period: String,

        /// Show one cell per task per day instead of one per entry
        #[arg(short, long)]
        agg: bool,

        #[command(flatten)]
        records: RecordsArgs,
    },
    /// Output task log entries
    ///
    /// PERIOD accepts the same values as `report`, spanning at most 7 days.
    Log {
        #[arg(default_value = "today")]
        period: String,

        #[command(flatten)]
        records: RecordsArgs,
    },
    /// Output statistics for tracked time
    ///
    /// PERIOD also accepts this-month and all, and is not limited in length.
    Stats {
        #[arg(default_value = "3d")]
        period: String,

        #[command(flatten)]
        records: RecordsArgs,
    },
    /// Show the task being actively tracked
    Active {
        /// Template with {{task}} and {{time}} placeholders
        #[arg(short, long, default_value = DEFAULT_TEMPLATE)]
        template: String,
    },
    /// Start tracking time for a task
    Start {
        /// Identifier of the task to track
        task_id: i64,
    },
    /// Stop tracking the active task
    Stop {
        /// Only print the task's id
        #[arg(short, long)]
        quiet: bool,
    },
}

/// Output flags shared by `report`, `log` and `stats`.
#[derive(Args, Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordsArgs {
    /// Output plain text without colors
    #[arg(short, long)]
    pub plain: bool,

    /// Page through periods in a full-screen view
    #[arg(short, long)]
    pub interactive: bool,

    /// Only show data for tasks with this status [possible values: any, active, inactive]
    #[arg(short = 's', long, default_value = "any")]
    pub task_status: TaskStatus,
}

/// Resolves configuration, opens the database and runs the requested
/// subcommand, or the TUI when none was given.
///
/// # Errors
/// Returns [`CliError`] for invalid settings or arguments and for storage or
/// terminal failures.
pub async fn run(cli: Cli, clock: Arc<dyn Clock>) -> Result<(), CliError> {
    let home = dirs::home_dir();
    let config = Config::resolve(
        cli.db_path.as_deref(),
        cli.log_file.as_deref(),
        cli.min_log_secs,
        home.as_deref(),
    )?;

    if let Some(directives) = cli
        .log_filter
        .as_deref()
        .filter(|directives| !directives.trim().is_empty())
    {
        logging::init(directives, &config.log_file)?;
    }

    let database = Database::open(&config.db_path, Arc::clone(&clock)).await?;
    info!(db_path = %config.db_path.display(), command = ?cli.command, "starting hours");

    match cli.command {
        None => {
            let mut app = App::new(database, clock, config.min_log_secs);
            runtime::run(&mut app).await?;

            Ok(())
        }
        Some(command) => {
            execute(
                command,
                &database,
                clock.as_ref(),
                config.min_log_secs,
                &mut io::stdout(),
            )
            .await
        }
    }
}

/// Runs one subcommand, printing its output to `writer`.
///
/// `stop` refuses to save entries shorter than `min_log_secs`.
///
/// # Errors
/// Returns [`CliError`] for invalid periods, rejected tracking changes and
/// storage failures.
pub async fn execute(
    command: Commands,
    database: &Database,
    clock: &dyn Clock,
    min_log_secs: i64,
    writer: &mut impl Write,
) -> Result<(), CliError> {
    let now = truncate_to_second(clock.now());

    match command {
        Commands::Report {
            period,
            agg,
            records,
        } => {
            let kind = if agg {
                RecordsKind::AggregatedReport
            } else {
                RecordsKind::Report
            };

            show_records(database, clock, kind, &period, records, writer).await
        }
        Commands::Log { period, records } => {
            if records.interactive {
                let range = parse_period(&period, now, records_period_options(true))?;
                if range.num_days > 1 {
                    return Err(CliError::InteractiveNotApplicable(
                        "to task logs spanning more than one day",
                    ));
                }
            }

            show_records(database, clock, RecordsKind::Log, &period, records, writer).await
        }
        Commands::Stats { period, records } => {
            show_stats(database, clock, &period, records, now, writer).await
        }
        Commands::Active { template } => show_active(database, &template, now, writer).await,
        Commands::Start { task_id } => start_tracking(database, task_id, now, writer).await,
        Commands::Stop { quiet } => {
            stop_tracking(database, quiet, min_log_secs, now, writer).await
        }
    }
}

fn records_period_options(interactive: bool) -> PeriodOptions {
    PeriodOptions {
        full_week: interactive,
        max_days: Some(REPORT_MAX_DAYS),
    }
}

async fn show_records(
    database: &Database,
    clock: &dyn Clock,
    kind: RecordsKind,
    period: &str,
    records: RecordsArgs,
    writer: &mut impl Write,
) -> Result<(), CliError> {
    let now = truncate_to_second(clock.now());
    let range = parse_period(period, now, records_period_options(records.interactive))?;

    if records.interactive {
        return page_records(database, clock, kind, period, records, range).await;
    }

    let table = kind.build(database, range, records.task_status).await?;
    write!(writer, "{}", table.render(records.plain))?;

    Ok(())
}

async fn show_stats(
    database: &Database,
    clock: &dyn Clock,
    period: &str,
    records: RecordsArgs,
    now: OffsetDateTime,
    writer: &mut impl Write,
) -> Result<(), CliError> {
    let options = PeriodOptions {
        full_week: records.interactive,
        max_days: None,
    };
    let range = parse_stats_period(period, now, options)?;

    if records.interactive {
        let range = range.ok_or(CliError::InteractiveNotApplicable(
            "to the \"all\" period",
        ))?;

        return page_records(database, clock, RecordsKind::Stats, period, records, range).await;
    }

    let table = stats::build(database, range, records.task_status).await?;
    write!(writer, "{}", table.render(records.plain))?;

    Ok(())
}

async fn page_records(
    database: &Database,
    clock: &dyn Clock,
    kind: RecordsKind,
    period: &str,
    records: RecordsArgs,
    range: DateRange,
) -> Result<(), CliError> {
    let anchor = if period.trim() == WEEK_PERIOD {
        WindowAnchor::Week
    } else {
        WindowAnchor::Days
    };

    RecordsPager::new(kind, range, anchor, records.task_status, records.plain)
        .run(database, clock)
        .await?;

    Ok(())
}

async fn show_active(
    database: &Database,
    template: &str,
    now: OffsetDateTime,
    writer: &mut impl Write,
) -> Result<(), CliError> {
    let Some(details) = database.fetch_active_task_details().await? else {
        return Ok(());
    };

    write!(writer, "{}", render_active(template, &details, now))?;

    Ok(())
}

async fn start_tracking(
    database: &Database,
    task_id: i64,
    now: OffsetDateTime,
    writer: &mut impl Write,
) -> Result<(), CliError> {
    if database.fetch_active_task_details().await?.is_some() {
        return Err(DbError::AlreadyTracking.into());
    }

    let task = database.fetch_task(task_id).await?;
    database.start_tracking(task.id, now).await?;
    info!(task_id, "started tracking from the command line");

    writeln!(writer, "Started tracking {:?}", task.summary)?;

    Ok(())
}

async fn stop_tracking(
    database: &Database,
    quiet: bool,
    min_log_secs: i64,
    now: OffsetDateTime,
    writer: &mut impl Write,
) -> Result<(), CliError> {
    let active = database
        .fetch_active_task_details()
        .await?
        .ok_or(DbError::NoTaskActive)?;
    let secs = secs_between(active.begin, now);
    if secs < min_log_secs {
        return Err(CliError::TooShort {
            secs,
            min_secs: min_log_secs,
        });
    }

    let finished = database.stop_tracking(now).await?;
    info!(
        task_id = finished.task_id,
        secs_spent = finished.secs_spent,
        "stopped tracking from the command line"
    );

    if quiet {
        write!(writer, "{}", finished.task_id)?;
    } else {
        writeln!(
            writer,
            "Stopped tracking {:?} (id: {})",
            finished.task_summary, finished.task_id
        )?;
    }

    Ok(())
}
