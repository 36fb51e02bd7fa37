//! Same-day time overlap checks between a candidate and the catalog.
//!
//! Only base definitions are compared: a repeating event is checked at its
//! first start/end, not at every generated instance.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::event::{EventDefinition, Scheduled};
use crate::time;

/// Closed-interval overlap: touching boundaries count.
pub fn overlaps(a: &impl Scheduled, b: &impl Scheduled) -> bool {
    a.start() <= b.end() && a.end() >= b.start()
}

/// Catalog entries that overlap `candidate` and start on the same day, in catalog order.
///
/// The entry whose id equals `exclude_id` (the event being edited) is skipped.
pub fn find_conflicts<'a>(
    candidate: &impl Scheduled,
    catalog: &'a [EventDefinition],
    exclude_id: Option<&str>,
) -> Vec<&'a EventDefinition> {
    catalog
        .iter()
        .filter(|entry| exclude_id != Some(entry.id.as_str()))
        .filter(|entry| {
            overlaps(candidate, *entry) && time::is_same_day(&candidate.start(), &entry.start)
        })
        .collect()
}

/// What the user is shown about one conflicting event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConflictSummary {
    pub id: String,
    pub title: String,
    pub start: NaiveDateTime,
}

impl From<&EventDefinition> for ConflictSummary {
    fn from(event: &EventDefinition) -> Self {
        ConflictSummary {
            id: event.id.clone(),
            title: event.title.clone(),
            start: event.start,
        }
    }
}

impl fmt::Display for ConflictSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" at {}", self.title, time::format_time(&self.start))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{EventColor, EventDraft};
    use crate::recurrence::RecurrenceRule;
    use chrono::NaiveDate;

    fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, d)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn entry(id: &str, start: NaiveDateTime, end: NaiveDateTime) -> EventDefinition {
        EventDefinition {
            id: id.to_string(),
            title: format!("Event {}", id),
            start,
            end,
            description: None,
            color: EventColor::Blue,
            recurrence: RecurrenceRule::none(),
        }
    }

    #[test]
    fn nested_event_conflicts() {
        let catalog = vec![entry("a", at(5, 10, 30), at(5, 10, 45))];
        let candidate = EventDraft::new("New", at(5, 10, 0), at(5, 11, 0));

        let conflicts = find_conflicts(&candidate, &catalog, None);
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, "a");
    }

    #[test]
    fn touching_boundary_conflicts() {
        let catalog = vec![entry("a", at(5, 10, 0), at(5, 11, 0))];
        let candidate = EventDraft::new("New", at(5, 11, 0), at(5, 12, 0));

        assert_eq!(find_conflicts(&candidate, &catalog, None).len(), 1);
    }

    #[test]
    fn disjoint_events_do_not_conflict() {
        let catalog = vec![entry("a", at(5, 10, 0), at(5, 11, 0))];
        let candidate = EventDraft::new("New", at(5, 11, 1), at(5, 12, 0));

        assert!(find_conflicts(&candidate, &catalog, None).is_empty());
    }

    #[test]
    fn overlap_on_different_start_days_is_ignored() {
        // Overnight entry overlaps in time but starts the previous day.
        let catalog = vec![entry("a", at(4, 22, 0), at(5, 2, 0))];
        let candidate = EventDraft::new("New", at(5, 1, 0), at(5, 3, 0));

        assert!(find_conflicts(&candidate, &catalog, None).is_empty());
    }

    #[test]
    fn excluded_id_is_skipped() {
        let catalog = vec![
            entry("a", at(5, 10, 0), at(5, 11, 0)),
            entry("b", at(5, 10, 30), at(5, 11, 30)),
        ];
        let edited = catalog[0].clone();

        let conflicts = find_conflicts(&edited, &catalog, Some("a"));
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].id, "b");
    }

    #[test]
    fn result_preserves_catalog_order() {
        let catalog = vec![
            entry("late", at(5, 10, 50), at(5, 11, 0)),
            entry("other-day", at(6, 10, 0), at(6, 11, 0)),
            entry("early", at(5, 9, 0), at(5, 10, 10)),
        ];
        let candidate = EventDraft::new("New", at(5, 10, 0), at(5, 11, 0));

        let ids: Vec<&str> = find_conflicts(&candidate, &catalog, None)
            .iter()
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["late", "early"]);
    }

    #[test]
    fn overlap_is_symmetric() {
        let a = entry("a", at(5, 9, 0), at(5, 10, 0));
        let b = entry("b", at(5, 9, 30), at(5, 12, 0));
        let c = entry("c", at(5, 13, 0), at(5, 14, 0));

        assert_eq!(overlaps(&a, &b), overlaps(&b, &a));
        assert_eq!(overlaps(&a, &c), overlaps(&c, &a));
        assert!(!find_conflicts(&a, std::slice::from_ref(&b), None).is_empty());
        assert!(!find_conflicts(&b, std::slice::from_ref(&a), None).is_empty());
    }

    #[test]
    fn summary_display() {
        let summary = ConflictSummary::from(&entry("a", at(5, 14, 30), at(5, 15, 0)));
        assert_eq!(summary.to_string(), "\"Event a\" at 2:30 PM");
    }
}
