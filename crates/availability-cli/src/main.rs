//! `slotfinder` CLI — conflict checks, free slot search and free/busy views over
//! a JSON event file.
//!
//! ## Usage
//!
//! ```sh
//! # Does a 09:00-09:30 booking clash with alice's calendar?
//! slotfinder -e events.json conflict --user alice \
//!   --start 2026-03-16T09:00:00Z --end 2026-03-16T09:30:00Z
//!
//! # Moving an existing event: ignore its current slot
//! slotfinder -e events.json conflict --user alice --exclude evt-7 \
//!   --start 2026-03-16T09:15:00Z --end 2026-03-16T09:45:00Z
//!
//! # Up to 3 free 45-minute slots for alice and bob
//! cat events.json | slotfinder slots --participants alice,bob \
//!   --from 2026-03-16T09:00:00 --to 2026-03-16T17:00:00 --duration 45 --max 3
//!
//! # Free/busy view with per-block attendee counts
//! slotfinder -e events.json freebusy --participants alice,bob \
//!   --from 2026-03-16T09:00:00Z --to 2026-03-16T17:00:00Z --privacy full
//! ```
//!
//! Logs go to stderr; set `RUST_LOG` or pass `-v` for debug output.

use std::collections::BTreeSet;
use std::io::{self, Read};

use anyhow::{Context, Result};
use availability_engine::store::{conflicts_for_user, search_availability};
use availability_engine::{
    free_busy, AvailabilityQuery, CalendarEvent, EventId, EventSource, InMemoryEventStore,
    PrivacyLevel, TimeInterval, UserId,
};
use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "slotfinder",
    version,
    about = "Calendar conflict checks and free slot search"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON array of events (reads from stdin if omitted)
    #[arg(short, long, global = true)]
    events: Option<String>,

    /// Output file (writes to stdout if omitted)
    #[arg(short, long, global = true)]
    output: Option<String>,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pretty: bool,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check whether a proposed time clashes with a user's active events
    Conflict {
        /// User whose calendar is checked
        #[arg(long)]
        user: String,
        /// Candidate start (RFC 3339, or naive datetime as UTC)
        #[arg(long)]
        start: String,
        /// Candidate end (RFC 3339, or naive datetime as UTC)
        #[arg(long)]
        end: String,
        /// Event id being updated; it is not checked against itself
        #[arg(long)]
        exclude: Option<String>,
    },
    /// Find free slots shared by all participants
    Slots {
        /// Comma-separated participant ids
        #[arg(long, default_value = "")]
        participants: String,
        /// Search window start
        #[arg(long)]
        from: String,
        /// Search window end
        #[arg(long)]
        to: String,
        /// Minimum slot length in minutes
        #[arg(long, default_value_t = 30)]
        duration: i64,
        /// Maximum number of slots to return
        #[arg(long, default_value_t = 5)]
        max: usize,
    },
    /// Show merged busy blocks and free gaps for participants
    Freebusy {
        /// Comma-separated participant ids
        #[arg(long, default_value = "")]
        participants: String,
        /// Window start
        #[arg(long)]
        from: String,
        /// Window end
        #[arg(long)]
        to: String,
        /// How much participant detail to include
        #[arg(long, value_enum, default_value_t = Privacy::Opaque)]
        privacy: Privacy,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Privacy {
    Full,
    Opaque,
}

impl From<Privacy> for PrivacyLevel {
    fn from(p: Privacy) -> Self {
        match p {
            Privacy::Full => PrivacyLevel::Full,
            Privacy::Opaque => PrivacyLevel::Opaque,
        }
    }
}

#[derive(Serialize)]
struct ConflictReport {
    conflict: bool,
    conflicts: Vec<ConflictDto>,
}

#[derive(Serialize)]
struct ConflictDto {
    event_id: String,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    overlap_minutes: i64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let store = load_store(cli.events.as_deref())?;
    debug!(events = store.events().len(), "loaded event store");

    let json = match cli.command {
        Commands::Conflict {
            user,
            start,
            end,
            exclude,
        } => {
            let user = UserId::from(user);
            let candidate = parse_window(&start, &end)?;
            let excluding = exclude.map(EventId::from);

            let Ok(found) = conflicts_for_user(&store, &user, &candidate, excluding.as_ref());
            let conflicts: Vec<ConflictDto> = found
                .into_iter()
                .map(|c| ConflictDto {
                    event_id: c.event_id.to_string(),
                    start: c.interval.start(),
                    end: c.interval.end(),
                    overlap_minutes: c.overlap_minutes,
                })
                .collect();

            let report = ConflictReport {
                conflict: !conflicts.is_empty(),
                conflicts,
            };
            to_json(&report, cli.pretty)?
        }
        Commands::Slots {
            participants,
            from,
            to,
            duration,
            max,
        } => {
            let window = parse_window(&from, &to)?;
            let slot_duration = Duration::try_minutes(duration)
                .with_context(|| format!("Slot duration out of range: {} minutes", duration))?;
            let query =
                AvailabilityQuery::new(window, slot_duration, max, parse_participants(&participants))
                    .context("Invalid availability query")?;

            let Ok(slots) = search_availability(&store, &query);
            to_json(&slots, cli.pretty)?
        }
        Commands::Freebusy {
            participants,
            from,
            to,
            privacy,
        } => {
            let window = parse_window(&from, &to)?;
            let participants = parse_participants(&participants);
            let Ok(events) = store.events_in_window(&participants, &window);

            let view = free_busy(&events, &participants, &window, privacy.into());
            to_json(&view, cli.pretty)?
        }
    };

    write_output(cli.output.as_deref(), &json)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_store(path: Option<&str>) -> Result<InMemoryEventStore> {
    let raw = read_input(path)?;
    let events: Vec<CalendarEvent> =
        serde_json::from_str(&raw).context("Failed to parse events JSON")?;
    Ok(InMemoryEventStore::new(events))
}

/// Parse an ISO 8601 datetime string into `DateTime<Utc>`.
///
/// Accepts RFC 3339 (e.g., "2026-03-16T09:00:00+01:00") and naive datetimes
/// (e.g., "2026-03-16T09:00:00"), which are interpreted as UTC.
fn parse_datetime(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map(|ndt| ndt.and_utc())
        .with_context(|| format!("Invalid datetime '{}'", s))
}

fn parse_window(start: &str, end: &str) -> Result<TimeInterval> {
    TimeInterval::new(parse_datetime(start)?, parse_datetime(end)?).context("Invalid time window")
}

/// `"alice, bob,,carol"` → `{alice, bob, carol}`.
fn parse_participants(raw: &str) -> BTreeSet<UserId> {
    raw.split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(UserId::from)
        .collect()
}

fn to_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&str>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            println!("{}", content);
        }
    }
    Ok(())
}
