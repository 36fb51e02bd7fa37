//! Event records: the durable definition, its materialized occurrences, and the
//! draft/update shapes used when creating or editing.

use std::fmt;

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{CalResult, ValidationError};
use crate::recurrence::{RecurrenceKind, RecurrenceRule};
use crate::time;

/// Color tag shown in the grid. Opaque to the engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventColor {
    #[default]
    Blue,
    Green,
    Purple,
    Red,
    Yellow,
    Indigo,
}

impl EventColor {
    pub const ALL: [EventColor; 6] = [
        EventColor::Blue,
        EventColor::Green,
        EventColor::Purple,
        EventColor::Red,
        EventColor::Yellow,
        EventColor::Indigo,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventColor::Blue => "blue",
            EventColor::Green => "green",
            EventColor::Purple => "purple",
            EventColor::Red => "red",
            EventColor::Yellow => "yellow",
            EventColor::Indigo => "indigo",
        }
    }
}

impl fmt::Display for EventColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for EventColor {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventColor::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                format!(
                    "Unknown color '{}'. Expected one of: blue, green, purple, red, yellow, indigo",
                    s
                )
            })
    }
}

/// Anything with a start and end on the calendar.
pub trait Scheduled {
    fn start(&self) -> NaiveDateTime;
    fn end(&self) -> NaiveDateTime;

    fn duration(&self) -> Duration {
        self.end() - self.start()
    }
}

/// A calendar event as stored (one per logical event).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDefinition {
    pub id: String,
    pub title: String,
    #[serde(with = "time::iso")]
    pub start: NaiveDateTime,
    #[serde(with = "time::iso")]
    pub end: NaiveDateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub color: EventColor,
    #[serde(default)]
    pub recurrence: RecurrenceRule,
}

impl EventDefinition {
    pub fn is_recurring(&self) -> bool {
        self.recurrence.kind() != RecurrenceKind::None
    }
}

impl Scheduled for EventDefinition {
    fn start(&self) -> NaiveDateTime {
        self.start
    }

    fn end(&self) -> NaiveDateTime {
        self.end
    }
}

impl fmt::Display for EventDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// One concrete instance of an event, generated or literal. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Occurrence {
    pub id: String,
    pub title: String,
    #[serde(with = "time::iso")]
    pub start: NaiveDateTime,
    #[serde(with = "time::iso")]
    pub end: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub color: EventColor,
    pub recurrence: RecurrenceRule,
    pub is_recurring_instance: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_event_id: Option<String>,
}

impl Occurrence {
    /// The definition itself, unchanged.
    pub fn literal(event: &EventDefinition) -> Self {
        Occurrence {
            id: event.id.clone(),
            title: event.title.clone(),
            start: event.start,
            end: event.end,
            description: event.description.clone(),
            color: event.color,
            recurrence: event.recurrence.clone(),
            is_recurring_instance: false,
            parent_event_id: None,
        }
    }

    /// A generated instance of `event` starting at `start`, keeping the base duration.
    pub fn instance(event: &EventDefinition, start: NaiveDateTime) -> Self {
        Occurrence {
            id: format!("{}-{}", event.id, time::epoch_millis(&start)),
            title: event.title.clone(),
            start,
            end: start + event.duration(),
            description: event.description.clone(),
            color: event.color,
            recurrence: event.recurrence.clone(),
            is_recurring_instance: true,
            parent_event_id: Some(event.id.clone()),
        }
    }

    /// Id of the definition this occurrence came from.
    pub fn base_id(&self) -> &str {
        self.parent_event_id.as_deref().unwrap_or(&self.id)
    }
}

impl Scheduled for Occurrence {
    fn start(&self) -> NaiveDateTime {
        self.start
    }

    fn end(&self) -> NaiveDateTime {
        self.end
    }
}

/// Form data for a new event, before it has an id.
#[derive(Debug, Clone, PartialEq)]
pub struct EventDraft {
    pub title: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub description: Option<String>,
    pub color: EventColor,
    pub recurrence: RecurrenceRule,
}

impl EventDraft {
    pub fn new(title: impl Into<String>, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        EventDraft {
            title: title.into(),
            start,
            end,
            description: None,
            color: EventColor::default(),
            recurrence: RecurrenceRule::none(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_color(mut self, color: EventColor) -> Self {
        self.color = color;
        self
    }

    pub fn with_recurrence(mut self, recurrence: RecurrenceRule) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_fields(&self.title, self.start, self.end)
    }

    /// Assign a fresh id and turn the draft into a definition.
    pub fn into_definition(self) -> CalResult<EventDefinition> {
        self.validate()?;
        Ok(EventDefinition {
            id: uuid::Uuid::new_v4().to_string(),
            title: self.title,
            start: self.start,
            end: self.end,
            description: self.description,
            color: self.color,
            recurrence: self.recurrence,
        })
    }
}

impl Scheduled for EventDraft {
    fn start(&self) -> NaiveDateTime {
        self.start
    }

    fn end(&self) -> NaiveDateTime {
        self.end
    }
}

/// Field-by-field edit of an existing definition. `None` leaves a field as is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventUpdate {
    pub title: Option<String>,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub color: Option<EventColor>,
    pub recurrence: Option<RecurrenceRule>,
}

impl EventUpdate {
    pub fn is_empty(&self) -> bool {
        *self == EventUpdate::default()
    }

    /// Apply to `event`, returning the edited copy. The id never changes.
    pub fn apply(&self, event: &EventDefinition) -> EventDefinition {
        EventDefinition {
            id: event.id.clone(),
            title: self.title.clone().unwrap_or_else(|| event.title.clone()),
            start: self.start.unwrap_or(event.start),
            end: self.end.unwrap_or(event.end),
            description: match &self.description {
                Some(description) => description.clone(),
                None => event.description.clone(),
            },
            color: self.color.unwrap_or(event.color),
            recurrence: self
                .recurrence
                .clone()
                .unwrap_or_else(|| event.recurrence.clone()),
        }
    }
}

pub(crate) fn validate_fields(
    title: &str,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    if end < start {
        return Err(ValidationError::EndBeforeStart);
    }
    Ok(())
}
