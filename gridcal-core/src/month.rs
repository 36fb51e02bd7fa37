//! Month grid: full Sunday-to-Saturday weeks covering one calendar month.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;

use crate::event::EventDefinition;
use crate::time::start_of_day;

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Day {
    pub date: NaiveDate,
    /// False for the leading/trailing days borrowed from adjacent months.
    pub is_current_month: bool,
    pub is_today: bool,
    pub events: Vec<EventDefinition>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Month {
    pub days: Vec<Day>,
    /// Full English month name, e.g. "March".
    pub name: String,
    pub year: i32,
}

impl Month {
    /// Days split into rows of seven, Sunday first.
    pub fn weeks(&self) -> impl Iterator<Item = &[Day]> {
        self.days.chunks(7)
    }
}

/// Build the grid for the month containing `anchor`.
///
/// `today` marks the highlighted cell.
pub fn build_month(anchor: NaiveDate, catalog: &[EventDefinition], today: NaiveDate) -> Month {
    let month_start = first_of_month(anchor);
    let month_end = last_of_month(anchor);

    let grid_start = month_start - Duration::days(days_from_sunday(month_start));
    let grid_end = month_end + Duration::days(6 - days_from_sunday(month_end));

    let days = grid_start
        .iter_days()
        .take_while(|date| *date <= grid_end)
        .map(|date| Day {
            date,
            is_current_month: date.year() == month_start.year()
                && date.month() == month_start.month(),
            is_today: date == today,
            events: catalog
                .iter()
                .filter(|event| falls_on(event, date))
                .cloned()
                .collect(),
        })
        .collect();

    Month {
        days,
        name: month_start.format("%B").to_string(),
        year: month_start.year(),
    }
}

pub fn next_month(date: NaiveDate) -> NaiveDate {
    date.checked_add_months(Months::new(1)).unwrap_or(date)
}

pub fn prev_month(date: NaiveDate) -> NaiveDate {
    date.checked_sub_months(Months::new(1)).unwrap_or(date)
}

/// Whether `event` is listed in the cell for `date`.
///
/// Repeating events use their own first `[start, end]` span rather than the
/// expanded occurrences, so later instances do not appear in the grid.
fn falls_on(event: &EventDefinition, date: NaiveDate) -> bool {
    if !event.is_recurring() {
        return event.start.date() == date;
    }

    let midnight = start_of_day(date);
    (event.start <= midnight && midnight <= event.end) || event.start.date() == date
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn last_of_month(date: NaiveDate) -> NaiveDate {
    let first = first_of_month(date);
    match first.checked_add_months(Months::new(1)) {
        Some(next) => next - Duration::days(1),
        None => NaiveDate::MAX,
    }
}

fn days_from_sunday(date: NaiveDate) -> i64 {
    i64::from(date.weekday().num_days_from_sunday())
}
