use anyhow::{Context, Result};
use chrono::{Duration, NaiveDateTime};
use gridcal_core::event::{EventColor, EventDraft};
use gridcal_core::gridcal::Gridcal;
use gridcal_core::recurrence::{RecurrenceKind, RecurrenceRule};
use gridcal_core::time::{parse_date, parse_datetime, start_of_day};
use owo_colors::OwoColorize;

use crate::render::{self, Render};
use crate::RecurrenceArgs;

pub struct NewEvent {
    pub title: String,
    pub start: String,
    pub end: Option<String>,
    pub duration: Option<String>,
    pub description: Option<String>,
    pub color: Option<EventColor>,
    pub recurrence: RecurrenceArgs,
}

pub fn run(gridcal: &Gridcal, args: NewEvent) -> Result<()> {
    let store = gridcal.store();
    let catalog = store.load()?;

    let start = parse_datetime(&args.start)?;
    let end = match (&args.end, &args.duration) {
        (Some(end), _) => parse_end(end, start)?,
        (None, Some(duration)) => apply_duration(start, duration)?,
        (None, None) => start
            .checked_add_signed(gridcal.default_duration()?)
            .context("Default duration too large")?,
    };

    let mut draft = EventDraft::new(args.title, start, end)
        .with_color(args.color.unwrap_or_else(|| gridcal.default_color()))
        .with_recurrence(args.recurrence.to_rule(&RecurrenceRule::none())?);
    if let Some(description) = args.description.filter(|d| !d.is_empty()) {
        draft = draft.with_description(description);
    }

    let (catalog, event) = catalog.create(draft).map_err(render::rejection)?;
    store
        .save(&catalog)
        .with_context(|| format!("Failed to save events to {}", gridcal.display_path().display()))?;

    println!("{}", format!("Created: {}", event.title).green());
    println!("{}", event.render());

    Ok(())
}

impl RecurrenceArgs {
    pub fn is_empty(&self) -> bool {
        self.repeat.is_none()
            && self.interval.is_none()
            && self.days.is_none()
            && self.until.is_none()
            && self.count.is_none()
    }

    /// Build a rule from the flags, taking anything not given from `base`.
    pub fn to_rule(&self, base: &RecurrenceRule) -> Result<RecurrenceRule> {
        let kind = self.repeat.unwrap_or(base.kind());

        if kind == RecurrenceKind::None {
            if self.repeat.is_none() && !self.is_empty() {
                anyhow::bail!("Use --repeat to choose how the event repeats");
            }
            return Ok(RecurrenceRule::none());
        }

        let interval = self.interval.unwrap_or(i64::from(base.interval()));
        let days = match &self.days {
            Some(days) => days.clone(),
            None => base.days_of_week().iter().map(|d| i64::from(*d)).collect(),
        };

        let mut rule = RecurrenceRule::new(kind, interval)?.with_days_of_week(days)?;

        let end_date = match &self.until {
            Some(until) => Some(start_of_day(parse_date(until)?)),
            None => base.end_date(),
        };
        if let Some(end_date) = end_date {
            rule = rule.with_end_date(end_date);
        }

        let count = self.count.unwrap_or(base.count().map(i64::from).unwrap_or(0));
        Ok(rule.with_count(count)?)
    }
}

/// Weekday as 0 (Sunday) to 6 (Saturday), or a name such as "mon" / "Monday".
pub fn parse_weekday(input: &str) -> Result<i64, String> {
    const NAMES: [&str; 7] = ["sun", "mon", "tue", "wed", "thu", "fri", "sat"];

    let lower = input.trim().to_lowercase();
    if let Ok(n) = lower.parse::<i64>() {
        return Ok(n);
    }

    NAMES
        .iter()
        .position(|name| lower.len() >= 3 && lower.starts_with(name))
        .map(|i| i as i64)
        .ok_or_else(|| format!("Unknown weekday '{}'", input))
}

/// Parse an end input: a duration ("90m") or a date/time.
pub fn parse_end(input: &str, start: NaiveDateTime) -> Result<NaiveDateTime> {
    if let Ok(end) = try_apply_duration(start, input) {
        return Ok(end);
    }

    Ok(parse_datetime(input)?)
}

/// Apply a duration string to a start time.
pub fn apply_duration(start: NaiveDateTime, dur_input: &str) -> Result<NaiveDateTime> {
    try_apply_duration(start, dur_input)
        .with_context(|| format!("Could not parse duration: \"{}\"", dur_input))
}

fn try_apply_duration(start: NaiveDateTime, dur_input: &str) -> Result<NaiveDateTime> {
    let std_dur = humantime::parse_duration(dur_input).map_err(|e| anyhow::anyhow!("{}", e))?;
    let chrono_dur = Duration::from_std(std_dur).context("Duration too large")?;
    start
        .checked_add_signed(chrono_dur)
        .context("Duration too large")
}
