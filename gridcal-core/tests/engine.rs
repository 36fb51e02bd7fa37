use chrono::{Datelike, NaiveDate, NaiveDateTime};
use gridcal_core::store::EventStore;
use gridcal_core::{
    CalError, Catalog, EventColor, EventDefinition, EventDraft, RecurrenceKind, RecurrenceRule,
    Scheduled, Window, build_month, expand, find_conflicts,
};

fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn definition(id: &str, start: NaiveDateTime, end: NaiveDateTime, rule: RecurrenceRule) -> EventDefinition {
    EventDefinition {
        id: id.to_string(),
        title: format!("Event {}", id),
        start,
        end,
        description: None,
        color: EventColor::Blue,
        recurrence: rule,
    }
}

fn far_future() -> NaiveDateTime {
    dt(2100, 1, 1, 0, 0)
}

#[test]
fn count_caps_occurrences_over_open_window() {
    for kind in [
        RecurrenceKind::Daily,
        RecurrenceKind::Weekly,
        RecurrenceKind::Monthly,
        RecurrenceKind::Custom,
    ] {
        let rule = RecurrenceRule::new(kind, 1).unwrap().with_count(5).unwrap();
        let event = definition("c", dt(2024, 3, 1, 9, 0), dt(2024, 3, 1, 10, 0), rule);

        let occurrences: Vec<_> = expand(&event, dt(2024, 1, 1, 0, 0), far_future()).collect();
        assert_eq!(occurrences.len(), 5, "kind {}", kind);
    }
}

#[test]
fn count_is_cut_short_by_window_end() {
    let rule = RecurrenceRule::new(RecurrenceKind::Daily, 1)
        .unwrap()
        .with_count(10)
        .unwrap();
    let event = definition("c", dt(2024, 3, 1, 9, 0), dt(2024, 3, 1, 10, 0), rule);

    assert_eq!(expand(&event, dt(2024, 3, 1, 0, 0), dt(2024, 3, 4, 0, 0)).count(), 3);
}

#[test]
fn occurrences_are_strictly_ascending_with_constant_duration() {
    let rule = RecurrenceRule::new(RecurrenceKind::Weekly, 3)
        .unwrap()
        .with_days_of_week([0, 2, 4, 6])
        .unwrap();
    let event = definition("w", dt(2024, 1, 3, 23, 0), dt(2024, 1, 4, 1, 15), rule);

    let occurrences: Vec<_> = expand(&event, dt(2024, 1, 1, 0, 0), dt(2025, 1, 1, 0, 0)).collect();
    assert!(occurrences.len() > 50);

    for pair in occurrences.windows(2) {
        assert!(pair[0].start < pair[1].start);
    }
    for occ in &occurrences {
        assert_eq!(occ.duration(), event.duration());
        assert_eq!(occ.parent_event_id.as_deref(), Some("w"));
    }
}

#[test]
fn weekly_scenario_from_first_friday_of_march() {
    let rule = RecurrenceRule::new(RecurrenceKind::Weekly, 1)
        .unwrap()
        .with_days_of_week([1, 3, 5])
        .unwrap();
    let event = definition("s", dt(2024, 3, 1, 9, 0), dt(2024, 3, 1, 10, 0), rule);

    let days: Vec<u32> = expand(&event, dt(2024, 3, 1, 0, 0), dt(2024, 3, 15, 0, 0))
        .map(|o| o.start.day())
        .collect();
    assert_eq!(days, vec![1, 4, 6, 8, 11, 13]);
}

#[test]
fn monthly_scenario_from_january_31st() {
    let rule = RecurrenceRule::new(RecurrenceKind::Monthly, 1).unwrap();
    let event = definition("m", dt(2024, 1, 31, 9, 0), dt(2024, 1, 31, 10, 0), rule);

    let starts: Vec<NaiveDateTime> = expand(&event, dt(2024, 1, 1, 0, 0), dt(2024, 3, 31, 0, 0))
        .map(|o| o.start)
        .collect();
    assert_eq!(
        starts,
        vec![dt(2024, 1, 31, 9, 0), dt(2024, 2, 29, 9, 0), dt(2024, 3, 29, 9, 0)]
    );
}

#[test]
fn conflict_scenarios() {
    let catalog = vec![definition("a", dt(2024, 3, 5, 10, 30), dt(2024, 3, 5, 10, 45), RecurrenceRule::none())];
    let candidate = EventDraft::new("New", dt(2024, 3, 5, 10, 0), dt(2024, 3, 5, 11, 0));
    assert_eq!(find_conflicts(&candidate, &catalog, None).len(), 1);

    let catalog = vec![definition("b", dt(2024, 3, 5, 10, 0), dt(2024, 3, 5, 11, 0), RecurrenceRule::none())];
    let candidate = EventDraft::new("New", dt(2024, 3, 5, 11, 0), dt(2024, 3, 5, 12, 0));
    assert_eq!(find_conflicts(&candidate, &catalog, None).len(), 1);
}

#[test]
fn recurring_events_only_conflict_at_their_base_span() {
    let rule = RecurrenceRule::new(RecurrenceKind::Daily, 1).unwrap();
    let catalog = vec![definition("d", dt(2024, 3, 1, 9, 0), dt(2024, 3, 1, 10, 0), rule)];

    // Overlaps the generated Mar 5 instance, which is not checked.
    let candidate = EventDraft::new("New", dt(2024, 3, 5, 9, 0), dt(2024, 3, 5, 10, 0));
    assert!(find_conflicts(&candidate, &catalog, None).is_empty());
}

#[test]
fn month_grid_for_every_month_of_a_decade() {
    for year in 2020..2030 {
        for month in 1..=12 {
            let anchor = NaiveDate::from_ymd_opt(year, month, 15).unwrap();
            let grid = build_month(anchor, &[], anchor);

            assert_eq!(grid.days.len() % 7, 0);
            assert!(grid.days.len() == 28 || grid.days.len() == 35 || grid.days.len() == 42);
            let in_month = grid.days.iter().filter(|d| d.is_current_month).count();
            assert_eq!(in_month as u32, days_in_month(year, month));
        }
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1).unwrap()
    };
    (next - first).num_days() as u32
}

#[test]
fn create_save_reload_and_list() {
    let dir = tempfile::tempdir().unwrap();
    let store = EventStore::new(dir.path().join("events.json"));

    let rule = RecurrenceRule::new(RecurrenceKind::Weekly, 1)
        .unwrap()
        .with_days_of_week([1, 3, 5])
        .unwrap()
        .with_count(4)
        .unwrap();
    let (catalog, standup) = store
        .load()
        .unwrap()
        .create(EventDraft::new("Standup", dt(2024, 3, 4, 9, 0), dt(2024, 3, 4, 9, 15)).with_recurrence(rule))
        .unwrap();
    store.save(&catalog).unwrap();

    let reloaded = store.load().unwrap();
    let window = Window::days(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
    );
    let days: Vec<u32> = reloaded
        .occurrences(&window)
        .iter()
        .map(|o| o.start.day())
        .collect();
    assert_eq!(days, vec![4, 6, 8, 11]);

    // Same-day clash with the base span is refused.
    let err = reloaded
        .create(EventDraft::new("Clash", dt(2024, 3, 4, 9, 10), dt(2024, 3, 4, 9, 20)))
        .unwrap_err();
    match err {
        CalError::Conflict(conflicts) => assert_eq!(conflicts[0].id, standup.id),
        other => panic!("Expected Conflict, got {:?}", other),
    }
}

#[test]
fn catalog_month_lists_events() {
    let catalog = Catalog::new(vec![definition(
        "x",
        dt(2024, 3, 12, 9, 0),
        dt(2024, 3, 12, 10, 0),
        RecurrenceRule::none(),
    )]);

    let anchor = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
    let month = catalog.month(anchor, anchor);
    let listed: Vec<_> = month.days.iter().filter(|d| !d.events.is_empty()).collect();

    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].date.day(), 12);
}
