//! `planit` CLI — find open slots and check candidates against a calendar.
//!
//! ## Usage
//!
//! ```sh
//! # Next free 2-hour slot, given stored events and weekly unavailability
//! planit find --duration 2 --events events.json --unavailable unavailable.json
//!
//! # Pin "now" for reproducible answers
//! planit find -d 1 --now 2026-03-16T10:15:00
//!
//! # Custom business hours
//! planit find -d 1 --open 08:00 --close 12:00 --workdays mon,wed --granularity 15
//!
//! # Does Monday 10:00 for 1 hour fit? Exits 3 and lists conflicts if not.
//! planit check --start 2026-03-16T10:00:00 -d 1 -e events.json -u unavailable.json
//!
//! # Read events from stdin, log search progress to stderr
//! cat events.json | planit -v find -d 1 -e -
//! ```

use std::io::{self, Read};
use std::process::ExitCode;

use anyhow::{Context, Result};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use clap::{Args, Parser, Subcommand};
use planit_engine::policy::{DEFAULT_GRANULARITY_MINUTES, DEFAULT_HORIZON_DAYS};
use planit_engine::records::{self, DEFAULT_TIMEZONE};
use planit_engine::{
    find_conflicts, find_slot, Appointment, ConflictSource, EventRecord, SchedulingPolicy,
    UnavailabilityWindow, UnavailableRecord,
};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Exit code when the candidate in `check` is blocked.
const EXIT_CONFLICT: u8 = 3;
/// Exit code when `find` exhausts the horizon.
const EXIT_NOT_FOUND: u8 = 2;

#[derive(Parser)]
#[command(
    name = "planit",
    version,
    about = "Find conflict-free slots within working hours"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log search progress to stderr (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Find the next available slot and print it as an event record
    Find {
        /// Task length in whole hours
        #[arg(short, long)]
        duration: u32,
        /// Search from this local time instead of the current time
        #[arg(long)]
        now: Option<String>,
        /// Title for the scheduled event
        #[arg(long, default_value = "Auto-scheduled task")]
        title: String,
        #[command(flatten)]
        calendar: CalendarArgs,
        #[command(flatten)]
        policy: PolicyArgs,
    },
    /// Check whether a specific start time fits and list any conflicts
    Check {
        /// Local start time of the candidate (e.g. 2026-03-16T10:00:00)
        #[arg(long)]
        start: String,
        /// Candidate length in whole hours
        #[arg(short, long)]
        duration: u32,
        #[command(flatten)]
        calendar: CalendarArgs,
    },
}

#[derive(Args)]
struct CalendarArgs {
    /// JSON array of event records ("-" reads stdin)
    #[arg(short, long)]
    events: Option<String>,
    /// JSON array of unavailability records ("-" reads stdin)
    #[arg(short, long)]
    unavailable: Option<String>,
    /// IANA timezone business hours are expressed in
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,
}

#[derive(Args)]
struct PolicyArgs {
    /// Start of business (HH:MM)
    #[arg(long)]
    open: Option<String>,
    /// Close of business (HH:MM); appointments may end exactly then
    #[arg(long)]
    close: Option<String>,
    /// Comma-separated workdays (e.g. mon,tue,wed,thu,fri)
    #[arg(long)]
    workdays: Option<String>,
    /// Slot granularity in minutes
    #[arg(long, default_value_t = DEFAULT_GRANULARITY_MINUTES)]
    granularity: u32,
    /// Calendar days to search, weekends included
    #[arg(long, default_value_t = DEFAULT_HORIZON_DAYS)]
    horizon_days: u32,
}

/// A conflict as shown to the user, with a readable description of the blocker.
#[derive(Serialize)]
struct ConflictReport {
    blocker: String,
    start: NaiveDateTime,
    end: NaiveDateTime,
    overlap_minutes: i64,
}

/// A loaded calendar: wire records alongside the model values built from them.
struct Calendar {
    events: Vec<EventRecord>,
    appointments: Vec<Appointment>,
    unavailable: Vec<UnavailableRecord>,
    windows: Vec<UnavailabilityWindow>,
    tz: Tz,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Find {
            duration,
            now,
            title,
            calendar,
            policy,
        } => {
            let cal = load_calendar(&calendar)?;
            let policy = build_policy(&policy)?;
            let now = match now {
                Some(raw) => records::parse_local_datetime(&raw, cal.tz)
                    .with_context(|| format!("Invalid --now value: {}", raw))?,
                None => Utc::now().with_timezone(&cal.tz).naive_local(),
            };

            let search = find_slot(&policy, duration, &cal.appointments, &cal.windows, now)
                .context("Slot search failed")?;
            info!(
                candidates_checked = search.candidates_checked,
                found = search.slot.is_some(),
                "search finished"
            );

            match search.slot {
                Some(slot) => {
                    let record = EventRecord::scheduled(title, slot.start, slot.duration_hours);
                    println!("{}", serde_json::to_string_pretty(&record)?);
                    Ok(ExitCode::SUCCESS)
                }
                None => {
                    eprintln!(
                        "No available slot found for {} hour(s) within {} days of {}",
                        duration,
                        policy.horizon_days,
                        now.format("%Y-%m-%d %H:%M")
                    );
                    Ok(ExitCode::from(EXIT_NOT_FOUND))
                }
            }
        }
        Commands::Check {
            start,
            duration,
            calendar,
        } => {
            let cal = load_calendar(&calendar)?;
            let start = records::parse_local_datetime(&start, cal.tz)
                .with_context(|| format!("Invalid --start value: {}", start))?;
            let candidate = Appointment::new(start, duration).context("Invalid candidate")?;

            let conflicts = find_conflicts(&candidate, &cal.appointments, &cal.windows);
            if conflicts.is_empty() {
                println!("available");
                return Ok(ExitCode::SUCCESS);
            }

            let reports: Vec<ConflictReport> = conflicts
                .iter()
                .map(|c| ConflictReport {
                    blocker: describe(&cal, c.source),
                    start: c.start,
                    end: c.end,
                    overlap_minutes: c.overlap_minutes,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&reports)?);
            Ok(ExitCode::from(EXIT_CONFLICT))
        }
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v` when set.
fn init_tracing(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "planit=debug,planit_engine=debug",
        _ => "planit=trace,planit_engine=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn load_calendar(args: &CalendarArgs) -> Result<Calendar> {
    let tz = records::parse_timezone(&args.timezone)?;

    let events = match args.events.as_deref() {
        Some(path) => {
            let json = read_input(path)?;
            records::parse_events(&json)
                .with_context(|| format!("Failed to parse events from {}", path))?
        }
        None => Vec::new(),
    };
    let unavailable = match args.unavailable.as_deref() {
        Some(path) => {
            let json = read_input(path)?;
            records::parse_unavailable(&json)
                .with_context(|| format!("Failed to parse unavailable times from {}", path))?
        }
        None => Vec::new(),
    };

    let appointments = records::appointments_from(&events, tz).context("Invalid event record")?;
    let windows = records::windows_from(&unavailable).context("Invalid unavailable record")?;
    debug!(
        events = appointments.len(),
        unavailable = windows.len(),
        timezone = tz.name(),
        "calendar loaded"
    );

    Ok(Calendar {
        events,
        appointments,
        unavailable,
        windows,
        tz,
    })
}

/// Build the scheduling policy from flags. Unset flags keep the defaults.
fn build_policy(args: &PolicyArgs) -> Result<SchedulingPolicy> {
    let mut policy = SchedulingPolicy {
        granularity_minutes: args.granularity,
        horizon_days: args.horizon_days,
        ..SchedulingPolicy::default()
    };

    if let Some(open) = args.open.as_deref() {
        policy.open = records::parse_time_of_day(open).context("Invalid --open value")?;
    }
    if let Some(close) = args.close.as_deref() {
        policy.close = records::parse_time_of_day(close).context("Invalid --close value")?;
    }
    if let Some(raw) = args.workdays.as_deref() {
        policy.workdays = raw
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(records::parse_weekday)
            .collect::<planit_engine::error::Result<_>>()
            .context("Invalid --workdays value")?;
    }

    policy.validate()?;
    debug!(
        open = %policy.open,
        close = %policy.close,
        granularity = policy.granularity_minutes,
        horizon_days = policy.horizon_days,
        "policy built"
    );
    Ok(policy)
}

fn describe(cal: &Calendar, source: ConflictSource) -> String {
    match source {
        ConflictSource::Appointment(i) => match cal.events.get(i) {
            Some(event) if !event.title.is_empty() => format!("event '{}'", event.title),
            _ => format!("event #{}", i),
        },
        ConflictSource::Unavailable(i) => match cal.unavailable.get(i) {
            Some(u) => format!("unavailable {} {}-{}", u.day, u.start_time, u.end_time),
            None => format!("unavailable #{}", i),
        },
    }
}

fn read_input(path: &str) -> Result<String> {
    if path == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
    }
}
