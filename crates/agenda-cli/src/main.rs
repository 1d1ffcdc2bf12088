//! `agenda` CLI — manage a local calendar and check recurring-event conflicts.
//!
//! ## Usage
//!
//! ```sh
//! # Schedule a weekly event (rejected if it collides with any occurrence that day)
//! agenda add --name "Gym" --date 2025-02-18 --start "6:00 PM" --end "7:00 PM" --repeat weekly
//!
//! # Everything happening on a day, including projected recurring occurrences
//! agenda list --date 2025-03-04
//!
//! # Is a slot free?
//! agenda check --date 2025-03-04 --start 18:30 --end 20:00
//!
//! # Change or remove an event
//! agenda edit event-1234 --start "7:00 PM" --end "8:00 PM"
//! agenda delete event-1234 --date 2025-02-18
//!
//! # Days that carry events
//! agenda dates
//! ```
//!
//! Events are stored in `<data-dir>/events.json` (`--data-dir` or `AGENDA_DATA_DIR`).

use std::path::PathBuf;
use std::process;

use agenda_engine::{clock, Calendar, Event, EventDraft, FileBlobStore, Repeat, TimeWindow};
use anyhow::{Context, Result};
use chrono::{Local, NaiveDate, NaiveTime};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(
    name = "agenda",
    version,
    about = "Local calendar with recurring-event conflict detection"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding the persisted events
    #[arg(long, global = true, env = "AGENDA_DATA_DIR", default_value = ".agenda")]
    data_dir: PathBuf,

    /// Log level used when RUST_LOG is unset
    #[arg(long, global = true, default_value = "warn")]
    log_level: String,

    /// Override today's date (YYYY-MM-DD) for past-date checks
    #[arg(long, global = true, env = "AGENDA_TODAY", hide = true)]
    today: Option<NaiveDate>,
}

#[derive(Subcommand)]
enum Commands {
    /// Schedule a new event
    Add {
        /// Display name
        #[arg(long)]
        name: String,
        /// Anchor date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Start time, e.g. "9:30 AM" or "09:30"
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        /// End time, e.g. "10:30 AM" or "10:30"
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        #[arg(long, value_enum, default_value_t = RepeatArg::None)]
        repeat: RepeatArg,
    },
    /// Change an existing event's name, times or recurrence
    Edit {
        /// Event id
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = parse_time)]
        start: Option<NaiveTime>,
        #[arg(long, value_parser = parse_time)]
        end: Option<NaiveTime>,
        #[arg(long, value_enum)]
        repeat: Option<RepeatArg>,
    },
    /// Delete an event from its anchor date
    Delete {
        /// Event id
        id: String,
        /// Anchor date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
    },
    /// List occurrences on a date, including projected recurring events
    List {
        #[arg(long)]
        date: NaiveDate,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Check whether a time window on a date is free
    Check {
        #[arg(long)]
        date: NaiveDate,
        #[arg(long, value_parser = parse_time)]
        start: NaiveTime,
        #[arg(long, value_parser = parse_time)]
        end: NaiveTime,
        /// Ignore this event id (when checking an edit)
        #[arg(long)]
        exclude: Option<String>,
    },
    /// List dates that have events anchored on them
    Dates,
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatArg {
    None,
    Weekly,
    #[value(alias = "biweekly")]
    BiWeekly,
    Monthly,
}

impl From<RepeatArg> for Repeat {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::None => Repeat::None,
            RepeatArg::Weekly => Repeat::Weekly,
            RepeatArg::BiWeekly => Repeat::BiWeekly,
            RepeatArg::Monthly => Repeat::Monthly,
        }
    }
}

fn parse_time(s: &str) -> std::result::Result<NaiveTime, String> {
    clock::parse_clock_time(s).map_err(|e| e.to_string())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());
    debug!(data_dir = %cli.data_dir.display(), %today, "opening calendar");
    let blobs = FileBlobStore::new(&cli.data_dir);
    let mut calendar = Calendar::open(blobs).with_context(|| {
        format!("Failed to open calendar in {}", cli.data_dir.display())
    })?;

    match cli.command {
        Commands::Add {
            name,
            date,
            start,
            end,
            repeat,
        } => {
            let window = TimeWindow::new(start, end)?;
            let draft = EventDraft::new(name, date, window, repeat.into());
            let event = calendar
                .schedule(draft, today)
                .context("Failed to add event")?;
            println!("{}", event.id);
        }
        Commands::Edit {
            id,
            name,
            start,
            end,
            repeat,
        } => {
            let mut event = calendar
                .store()
                .find(&id)
                .cloned()
                .with_context(|| format!("No event with id '{}'", id))?;
            if let Some(name) = name {
                event.name = name;
            }
            if let Some(start) = start {
                event.start_time = start;
            }
            if let Some(end) = end {
                event.end_time = end;
            }
            if let Some(repeat) = repeat {
                event.repeat = repeat.into();
            }
            calendar
                .reschedule(event, today)
                .context("Failed to edit event")?;
            println!("Updated {}", id);
        }
        Commands::Delete { id, date } => {
            if calendar.remove(&id, date).context("Failed to delete event")? {
                println!("Deleted {}", id);
            } else {
                println!("No event {} on {}", id, date);
            }
        }
        Commands::List { date, json } => {
            let relevant = agenda_engine::find_relevant_occurrences(calendar.store(), date, None);
            if json {
                println!("{}", serde_json::to_string_pretty(&relevant)?);
            } else if relevant.is_empty() {
                println!("No events on {}", date);
            } else {
                for event in relevant {
                    println!("{}", describe(event, date));
                }
            }
        }
        Commands::Check {
            date,
            start,
            end,
            exclude,
        } => {
            let window = TimeWindow::new(start, end)?;
            let conflicts =
                agenda_engine::find_conflicts(calendar.store(), date, &window, exclude.as_deref());
            if conflicts.is_empty() {
                println!("Free");
            } else {
                for conflict in &conflicts {
                    println!(
                        "Conflict: {} ({} min overlap)",
                        describe(conflict.occurrence, date),
                        conflict.overlap_minutes
                    );
                }
                process::exit(1);
            }
        }
        Commands::Dates => {
            for date in calendar.store().marked_dates() {
                println!("{}", date);
            }
        }
    }

    Ok(())
}

/// One-line summary of an occurrence on `on`, noting the anchor for projected ones.
fn describe(event: &Event, on: NaiveDate) -> String {
    let mut line = format!(
        "{} - {}  {}  [{}]  {}",
        clock::format_clock_time(event.start_time),
        clock::format_clock_time(event.end_time),
        event.name,
        event.repeat.label(),
        event.id
    );
    if event.date != on {
        line.push_str(&format!("  (since {})", event.date));
    }
    line
}
