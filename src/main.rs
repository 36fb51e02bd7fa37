mod commands;
mod render;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use gridcal_core::event::EventColor;
use gridcal_core::gridcal::Gridcal;
use gridcal_core::recurrence::RecurrenceKind;
use tracing::debug;

#[derive(Parser)]
#[command(name = "gridcal")]
#[command(about = "Month-grid calendar with recurring events and conflict checks")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Repetition flags shared by `new` and `edit`.
#[derive(Args, Debug, Default, Clone)]
pub struct RecurrenceArgs {
    /// How the event repeats: none, daily, weekly, monthly, custom
    #[arg(long)]
    repeat: Option<RecurrenceKind>,

    /// Repeat every N days/weeks/months
    #[arg(long)]
    interval: Option<i64>,

    /// Weekdays for weekly events (e.g. "mon,wed,fri" or "1,3,5")
    #[arg(long, value_delimiter = ',', value_parser = commands::new::parse_weekday)]
    days: Option<Vec<i64>>,

    /// Stop repeating before this date (YYYY-MM-DD)
    #[arg(long)]
    until: Option<String>,

    /// Stop after this many occurrences
    #[arg(long)]
    count: Option<i64>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the month grid
    Month {
        /// Any date in the month to show (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Show the month after the given one
        #[arg(long, conflicts_with = "prev")]
        next: bool,

        /// Show the month before the given one
        #[arg(long)]
        prev: bool,
    },
    /// List occurrences in a date range
    Events {
        /// First day (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        from: Option<String>,

        /// Last day, inclusive (YYYY-MM-DD, defaults to a week after --from)
        #[arg(long)]
        to: Option<String>,

        /// List the whole month containing this date instead (YYYY-MM-DD)
        #[arg(long, conflicts_with_all = ["from", "to"])]
        month: Option<String>,

        /// Print occurrences as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a new event
    New {
        /// Event title
        title: String,

        /// Start date/time (e.g. "2025-03-20T15:00")
        #[arg(short, long)]
        start: String,

        /// End date/time
        #[arg(short, long, conflicts_with = "duration")]
        end: Option<String>,

        /// Duration (e.g. "30m", "1h", "2h30m")
        #[arg(short, long, conflicts_with = "end")]
        duration: Option<String>,

        /// Event description
        #[arg(long)]
        description: Option<String>,

        /// Color tag: blue, green, purple, red, yellow, indigo
        #[arg(short, long)]
        color: Option<EventColor>,

        #[command(flatten)]
        recurrence: RecurrenceArgs,
    },
    /// Change fields of an existing event
    Edit {
        /// Event id (an occurrence id edits its whole series)
        id: String,

        #[arg(long)]
        title: Option<String>,

        /// New start date/time
        #[arg(short, long)]
        start: Option<String>,

        /// New end date/time
        #[arg(short, long)]
        end: Option<String>,

        /// New description (empty string clears it)
        #[arg(long)]
        description: Option<String>,

        #[arg(short, long)]
        color: Option<EventColor>,

        #[command(flatten)]
        recurrence: RecurrenceArgs,
    },
    /// Move an event to another day, keeping its time and length
    Move {
        /// Event id
        id: String,

        /// Target day (YYYY-MM-DD)
        date: String,
    },
    /// Delete an event
    Delete {
        /// Event id
        id: String,
    },
    /// Show one event and its upcoming occurrences
    Show {
        /// Event id
        id: String,
    },
    /// Find events by title or description
    Search {
        term: String,
    },
    /// Show paths and settings, or change settings
    Config {
        /// Where events are stored
        #[arg(long)]
        events_file: Option<PathBuf>,

        /// Color for new events
        #[arg(long)]
        default_color: Option<EventColor>,

        /// Length of new events when no end is given (e.g. "45m")
        #[arg(long)]
        default_duration: Option<String>,
    },
}

fn main() -> Result<()> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let gridcal = Gridcal::load()?;
    debug!(events_file = %gridcal.events_path().display(), "loaded configuration");

    match cli.command {
        Commands::Month { date, next, prev } => {
            commands::month::run(&gridcal, date.as_deref(), next, prev)
        }
        Commands::Events {
            from,
            to,
            month,
            json,
        } => commands::events::run(
            &gridcal,
            from.as_deref(),
            to.as_deref(),
            month.as_deref(),
            json,
        ),
        Commands::New {
            title,
            start,
            end,
            duration,
            description,
            color,
            recurrence,
        } => commands::new::run(
            &gridcal,
            commands::new::NewEvent {
                title,
                start,
                end,
                duration,
                description,
                color,
                recurrence,
            },
        ),
        Commands::Edit {
            id,
            title,
            start,
            end,
            description,
            color,
            recurrence,
        } => commands::edit::run(
            &gridcal,
            &id,
            commands::edit::EditEvent {
                title,
                start,
                end,
                description,
                color,
                recurrence,
            },
        ),
        Commands::Move { id, date } => commands::reschedule::run(&gridcal, &id, &date),
        Commands::Delete { id } => commands::delete::run(&gridcal, &id),
        Commands::Show { id } => commands::show::run(&gridcal, &id),
        Commands::Search { term } => commands::search::run(&gridcal, &term),
        Commands::Config {
            events_file,
            default_color,
            default_duration,
        } => commands::config::run(
            &gridcal,
            commands::config::ConfigChanges {
                events_file,
                default_color,
                default_duration,
            },
        ),
    }
}
