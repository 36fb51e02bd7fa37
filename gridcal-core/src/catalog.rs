//! The event catalog and the one place it changes.
//!
//! A `Catalog` is an immutable snapshot. Every mutation validates its input,
//! runs the conflict check, and returns a new snapshot; the engine functions
//! only ever see a finished snapshot.

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{info, warn};

use crate::conflict::{ConflictSummary, find_conflicts};
use crate::error::{CalError, CalResult};
use crate::event::{EventDefinition, EventDraft, EventUpdate, Occurrence, Scheduled, validate_fields};
use crate::month::{Month, build_month};
use crate::recurrence::{expand, expand_all};
use crate::window::Window;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    events: Vec<EventDefinition>,
}

impl Catalog {
    pub fn new(events: Vec<EventDefinition>) -> Self {
        Catalog { events }
    }

    pub fn events(&self) -> &[EventDefinition] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn get(&self, id: &str) -> CalResult<&EventDefinition> {
        self.events
            .iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CalError::EventNotFound(id.to_string()))
    }

    /// Look up a definition by its own id or by the id of one of its occurrences
    /// (`{baseId}-{millis}`).
    pub fn resolve(&self, id: &str) -> CalResult<&EventDefinition> {
        if let Ok(event) = self.get(id) {
            return Ok(event);
        }

        self.events
            .iter()
            .find(|e| {
                id.strip_prefix(e.id.as_str())
                    .and_then(|rest| rest.strip_prefix('-'))
                    .map(|rest| rest.strip_prefix('-').unwrap_or(rest))
                    .is_some_and(|millis| !millis.is_empty() && millis.bytes().all(|b| b.is_ascii_digit()))
            })
            .ok_or_else(|| CalError::EventNotFound(id.to_string()))
    }

    /// Add a new event. Returns the new snapshot and the stored definition.
    pub fn create(&self, draft: EventDraft) -> CalResult<(Catalog, EventDefinition)> {
        draft.validate()?;
        self.ensure_no_conflicts(&draft, None)?;

        let event = draft.into_definition()?;
        info!(id = %event.id, title = %event.title, "created event");

        let mut events = self.events.clone();
        events.push(event.clone());
        Ok((Catalog { events }, event))
    }

    /// Edit an existing event field by field.
    pub fn update(&self, id: &str, update: &EventUpdate) -> CalResult<(Catalog, EventDefinition)> {
        let current = self.get(id)?;
        let edited = update.apply(current);
        self.replace(edited)
    }

    /// Move an event to `date`, keeping its time of day and duration.
    pub fn reschedule(&self, id: &str, date: NaiveDate) -> CalResult<(Catalog, EventDefinition)> {
        let current = self.get(id)?;
        let start = NaiveDateTime::new(date, current.start.time());
        let update = EventUpdate {
            start: Some(start),
            end: Some(start + current.duration()),
            ..Default::default()
        };
        self.replace(update.apply(current))
    }

    pub fn delete(&self, id: &str) -> CalResult<(Catalog, EventDefinition)> {
        let removed = self.get(id)?.clone();
        let events = self
            .events
            .iter()
            .filter(|e| e.id != id)
            .cloned()
            .collect();

        info!(id = %removed.id, title = %removed.title, "deleted event");
        Ok((Catalog { events }, removed))
    }

    /// Case-insensitive match on title or description.
    pub fn search(&self, term: &str) -> Vec<&EventDefinition> {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return Vec::new();
        }

        self.events
            .iter()
            .filter(|e| {
                e.title.to_lowercase().contains(&term)
                    || e.description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&term))
            })
            .collect()
    }

    /// All occurrences in `window`, ordered by start.
    pub fn occurrences(&self, window: &Window) -> Vec<Occurrence> {
        expand_all(&self.events, window)
    }

    /// Occurrences of a single event in `window`.
    pub fn occurrences_of(&self, id: &str, window: &Window) -> CalResult<Vec<Occurrence>> {
        let event = self.get(id)?;
        Ok(expand(event, window.start, window.end).collect())
    }

    pub fn month(&self, anchor: NaiveDate, today: NaiveDate) -> Month {
        build_month(anchor, &self.events, today)
    }

    pub fn conflicts_with(
        &self,
        candidate: &impl Scheduled,
        exclude_id: Option<&str>,
    ) -> Vec<&EventDefinition> {
        find_conflicts(candidate, &self.events, exclude_id)
    }

    fn replace(&self, edited: EventDefinition) -> CalResult<(Catalog, EventDefinition)> {
        validate_fields(&edited.title, edited.start, edited.end)?;
        self.ensure_no_conflicts(&edited, Some(edited.id.as_str()))?;

        let events = self
            .events
            .iter()
            .map(|e| if e.id == edited.id { edited.clone() } else { e.clone() })
            .collect();

        info!(id = %edited.id, title = %edited.title, "updated event");
        Ok((Catalog { events }, edited))
    }

    fn ensure_no_conflicts(&self, candidate: &impl Scheduled, exclude_id: Option<&str>) -> CalResult<()> {
        let conflicts: Vec<ConflictSummary> = self
            .conflicts_with(candidate, exclude_id)
            .into_iter()
            .map(ConflictSummary::from)
            .collect();

        if conflicts.is_empty() {
            return Ok(());
        }

        warn!(count = conflicts.len(), "rejected event with conflicts");
        Err(CalError::Conflict(conflicts))
    }
}

impl From<Vec<EventDefinition>> for Catalog {
    fn from(events: Vec<EventDefinition>) -> Self {
        Catalog::new(events)
    }
}
