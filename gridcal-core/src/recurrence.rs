//! Recurrence rules and their expansion into concrete occurrences.
//!
//! Expansion walks a cursor forward from the event's own start, one step of the
//! rule at a time, and stops at the first of: the window end, the rule's end
//! date, or the rule's occurrence count.

use std::fmt;
use std::iter::FusedIterator;

use chrono::{Datelike, Duration, Months, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{CalError, CalResult};
use crate::event::{EventDefinition, Occurrence};
use crate::time;
use crate::window::Window;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrenceKind {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
    Custom,
}

impl RecurrenceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrenceKind::None => "none",
            RecurrenceKind::Daily => "daily",
            RecurrenceKind::Weekly => "weekly",
            RecurrenceKind::Monthly => "monthly",
            RecurrenceKind::Custom => "custom",
        }
    }
}

impl fmt::Display for RecurrenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecurrenceKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(RecurrenceKind::None),
            "daily" => Ok(RecurrenceKind::Daily),
            "weekly" => Ok(RecurrenceKind::Weekly),
            "monthly" => Ok(RecurrenceKind::Monthly),
            "custom" => Ok(RecurrenceKind::Custom),
            other => Err(format!(
                "Unknown recurrence '{}'. Expected one of: none, daily, weekly, monthly, custom",
                other
            )),
        }
    }
}

/// How an event repeats.
///
/// Fields are private so every rule in memory has passed validation:
/// `interval >= 1` and weekdays in `0..=6` (0 = Sunday), sorted and unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredRule", into = "StoredRule")]
pub struct RecurrenceRule {
    kind: RecurrenceKind,
    interval: u32,
    days_of_week: Vec<u8>,
    end_date: Option<NaiveDateTime>,
    count: Option<u32>,
}

impl Default for RecurrenceRule {
    fn default() -> Self {
        RecurrenceRule::none()
    }
}

impl RecurrenceRule {
    /// A rule that never repeats.
    pub fn none() -> Self {
        RecurrenceRule {
            kind: RecurrenceKind::None,
            interval: 1,
            days_of_week: Vec::new(),
            end_date: None,
            count: None,
        }
    }

    pub fn new(kind: RecurrenceKind, interval: i64) -> CalResult<Self> {
        let interval = u32::try_from(interval)
            .ok()
            .filter(|i| *i >= 1)
            .ok_or_else(|| {
                CalError::MalformedRule(format!("interval must be at least 1, got {}", interval))
            })?;

        Ok(RecurrenceRule {
            interval,
            kind,
            ..RecurrenceRule::none()
        })
    }

    /// Restrict a weekly rule to these weekdays (0 = Sunday .. 6 = Saturday).
    pub fn with_days_of_week<I>(mut self, days: I) -> CalResult<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let mut parsed = Vec::new();
        for day in days {
            let day = u8::try_from(day)
                .ok()
                .filter(|d| *d <= 6)
                .ok_or_else(|| {
                    CalError::MalformedRule(format!("weekday must be between 0 and 6, got {}", day))
                })?;
            parsed.push(day);
        }
        parsed.sort_unstable();
        parsed.dedup();

        self.days_of_week = parsed;
        Ok(self)
    }

    /// No occurrence at or after `end_date` is generated.
    pub fn with_end_date(mut self, end_date: NaiveDateTime) -> Self {
        self.end_date = Some(end_date);
        self
    }

    /// Cap the number of generated occurrences. Zero means no cap.
    pub fn with_count(mut self, count: i64) -> CalResult<Self> {
        self.count = parse_count(count)?;
        Ok(self)
    }

    pub fn kind(&self) -> RecurrenceKind {
        self.kind
    }

    pub fn interval(&self) -> u32 {
        self.interval
    }

    pub fn days_of_week(&self) -> &[u8] {
        &self.days_of_week
    }

    pub fn end_date(&self) -> Option<NaiveDateTime> {
        self.end_date
    }

    pub fn count(&self) -> Option<u32> {
        self.count
    }

    /// Next cursor position after `cursor`, or `None` past the end of the calendar.
    fn step(&self, cursor: NaiveDateTime) -> Option<NaiveDateTime> {
        let interval = i64::from(self.interval);

        match self.kind {
            RecurrenceKind::None => None,
            RecurrenceKind::Daily | RecurrenceKind::Custom => {
                cursor.checked_add_signed(Duration::days(interval))
            }
            RecurrenceKind::Monthly => cursor.checked_add_months(Months::new(self.interval)),
            RecurrenceKind::Weekly if self.days_of_week.is_empty() => {
                cursor.checked_add_signed(Duration::weeks(interval))
            }
            RecurrenceKind::Weekly => {
                let weekday = i64::from(cursor.weekday().num_days_from_sunday());
                let later_this_week = self
                    .days_of_week
                    .iter()
                    .map(|d| i64::from(*d))
                    .find(|d| *d > weekday);

                match later_this_week {
                    Some(day) => cursor.checked_add_signed(Duration::days(day - weekday)),
                    None => {
                        // Jump `interval` weeks, then back to the first listed weekday.
                        let first = i64::from(self.days_of_week[0]);
                        cursor
                            .checked_add_signed(Duration::weeks(interval))?
                            .checked_add_signed(Duration::days(first - weekday))
                    }
                }
            }
        }
    }

    fn allows(&self, cursor: NaiveDateTime, emitted: u32) -> bool {
        self.end_date.is_none_or(|end| cursor < end) && self.count.is_none_or(|max| emitted < max)
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self.kind {
            RecurrenceKind::None => return f.write_str("does not repeat"),
            RecurrenceKind::Daily | RecurrenceKind::Custom => "day",
            RecurrenceKind::Weekly => "week",
            RecurrenceKind::Monthly => "month",
        };

        if self.interval == 1 {
            write!(f, "every {}", unit)?;
        } else {
            write!(f, "every {} {}s", self.interval, unit)?;
        }

        if self.kind == RecurrenceKind::Weekly && !self.days_of_week.is_empty() {
            let names: Vec<&str> = self
                .days_of_week
                .iter()
                .map(|d| WEEKDAY_NAMES[usize::from(*d)])
                .collect();
            write!(f, " on {}", names.join(", "))?;
        }
        if let Some(count) = self.count {
            write!(f, ", {} times", count)?;
        }
        if let Some(end) = self.end_date {
            write!(f, ", until {}", end.format("%Y-%m-%d"))?;
        }
        Ok(())
    }
}

const WEEKDAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

fn parse_count(count: i64) -> CalResult<Option<u32>> {
    match count {
        0 => Ok(None),
        n => u32::try_from(n).map(Some).map_err(|_| {
            CalError::MalformedRule(format!("count must not be negative, got {}", n))
        }),
    }
}

/// On-disk shape of a rule. Decoding goes through the same checks as the builders.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRule {
    #[serde(rename = "type", default)]
    kind: RecurrenceKind,
    #[serde(default)]
    interval: Option<i64>,
    #[serde(default)]
    days_of_week: Option<Vec<i64>>,
    #[serde(default, with = "time::iso_opt")]
    end_date: Option<NaiveDateTime>,
    #[serde(default)]
    count: Option<i64>,
}

impl TryFrom<StoredRule> for RecurrenceRule {
    type Error = CalError;

    fn try_from(stored: StoredRule) -> CalResult<Self> {
        let mut rule = RecurrenceRule::new(stored.kind, stored.interval.unwrap_or(1))?
            .with_days_of_week(stored.days_of_week.unwrap_or_default())?;
        rule.end_date = stored.end_date;
        rule.count = match stored.count {
            Some(count) => parse_count(count)?,
            None => None,
        };
        Ok(rule)
    }
}

impl From<RecurrenceRule> for StoredRule {
    fn from(rule: RecurrenceRule) -> Self {
        StoredRule {
            kind: rule.kind,
            interval: Some(i64::from(rule.interval)),
            days_of_week: Some(rule.days_of_week.into_iter().map(i64::from).collect()),
            end_date: rule.end_date,
            count: rule.count.map(i64::from),
        }
    }
}

/// Lazily generated occurrences of one event within a window.
pub struct Occurrences<'a> {
    event: &'a EventDefinition,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
    state: WalkState,
}

enum WalkState {
    Literal,
    Walking {
        cursor: NaiveDateTime,
        first: bool,
        emitted: u32,
    },
    Done,
}

impl Iterator for Occurrences<'_> {
    type Item = Occurrence;

    fn next(&mut self) -> Option<Occurrence> {
        loop {
            match self.state {
                WalkState::Done => return None,
                WalkState::Literal => {
                    self.state = WalkState::Done;
                    return Some(Occurrence::literal(self.event));
                }
                WalkState::Walking {
                    cursor,
                    first,
                    emitted,
                } => {
                    let rule = &self.event.recurrence;
                    if cursor >= self.window_end || !rule.allows(cursor, emitted) {
                        self.state = WalkState::Done;
                        return None;
                    }

                    // The defining occurrence is kept even when it precedes the window.
                    let emit = first || cursor > self.window_start;
                    let emitted = if emit { emitted + 1 } else { emitted };

                    self.state = match rule.step(cursor) {
                        Some(next) => WalkState::Walking {
                            cursor: next,
                            first: false,
                            emitted,
                        },
                        None => WalkState::Done,
                    };

                    if emit {
                        return Some(Occurrence::instance(self.event, cursor));
                    }
                }
            }
        }
    }
}

impl FusedIterator for Occurrences<'_> {}

/// Expand `event` into its occurrences between `window_start` and `window_end`.
///
/// Non-repeating events yield themselves, once, whatever the window.
pub fn expand(
    event: &EventDefinition,
    window_start: NaiveDateTime,
    window_end: NaiveDateTime,
) -> Occurrences<'_> {
    let state = match event.recurrence.kind() {
        RecurrenceKind::None => WalkState::Literal,
        _ => WalkState::Walking {
            cursor: event.start,
            first: true,
            emitted: 0,
        },
    };

    Occurrences {
        event,
        window_start,
        window_end,
        state,
    }
}

/// Expand every event of a catalog and order the result by start time.
///
/// Unlike [`expand`], only occurrences that touch the window are kept, so
/// one-off events and defining occurrences from before it are left out.
pub fn expand_all(events: &[EventDefinition], window: &Window) -> Vec<Occurrence> {
    let mut occurrences: Vec<Occurrence> = events
        .iter()
        .flat_map(|event| expand(event, window.start, window.end))
        .filter(|occ| window.touches(occ))
        .collect();

    occurrences.sort_by_key(|occ| occ.start);

    debug!(
        events = events.len(),
        occurrences = occurrences.len(),
        from = %window.start,
        to = %window.end,
        "expanded catalog"
    );

    occurrences
}
