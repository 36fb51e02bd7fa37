//! Viewing window over which occurrences are materialized.

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime};

use crate::error::{CalError, CalResult};
use crate::event::Scheduled;
use crate::time::{parse_date, start_of_day};

/// Days shown by an agenda listing when no end is given.
pub const DEFAULT_AGENDA_DAYS: i64 = 7;

/// Half-open instant range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl Window {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Window { start, end }
    }

    /// Whole days from `from` through `to`, both inclusive.
    pub fn days(from: NaiveDate, to: NaiveDate) -> Self {
        Window {
            start: start_of_day(from),
            end: start_of_day(to) + Duration::days(1),
        }
    }

    /// The calendar month containing `anchor`.
    pub fn month(anchor: NaiveDate) -> CalResult<Self> {
        let first = anchor
            .with_day(1)
            .ok_or_else(|| CalError::InvalidDate(anchor.to_string()))?;
        let next = first
            .checked_add_months(Months::new(1))
            .ok_or_else(|| CalError::InvalidDate(anchor.to_string()))?;

        Ok(Window {
            start: start_of_day(first),
            end: start_of_day(next),
        })
    }

    /// Build a window from optional YYYY-MM-DD arguments.
    /// - `from` defaults to today
    /// - `to` is inclusive and defaults to DEFAULT_AGENDA_DAYS after `from`
    pub fn from_args(from: Option<&str>, to: Option<&str>) -> CalResult<Self> {
        let from = match from {
            Some(s) => parse_date(s)?,
            None => Local::now().date_naive(),
        };

        let to = match to {
            Some(s) => parse_date(s)?,
            None => from + Duration::days(DEFAULT_AGENDA_DAYS - 1),
        };

        if to < from {
            return Err(CalError::InvalidDate(format!(
                "{} (end of range is before its start {})",
                to, from
            )));
        }

        Ok(Window::days(from, to))
    }

    pub fn contains(&self, dt: &NaiveDateTime) -> bool {
        *dt >= self.start && *dt < self.end
    }

    /// Whether any part of `item` lies inside the window.
    pub fn touches(&self, item: &impl Scheduled) -> bool {
        self.contains(&item.start()) || (item.start() < self.start && item.end() > self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn days_window_includes_last_day() {
        let window = Window::days(date(2024, 3, 1), date(2024, 3, 3));
        assert!(window.contains(&date(2024, 3, 3).and_hms_opt(23, 59, 0).unwrap()));
        assert!(!window.contains(&start_of_day(date(2024, 3, 4))));
    }

    #[test]
    fn touches_counts_events_running_into_the_window() {
        use crate::event::EventDraft;

        let window = Window::days(date(2024, 3, 2), date(2024, 3, 3));
        let at = |d: u32, h: u32| date(2024, 3, d).and_hms_opt(h, 0, 0).unwrap();

        assert!(window.touches(&EventDraft::new("Inside", at(2, 9), at(2, 10))));
        assert!(window.touches(&EventDraft::new("Overnight", at(1, 22), at(2, 1))));
        assert!(!window.touches(&EventDraft::new("Before", at(1, 9), at(1, 10))));
        assert!(!window.touches(&EventDraft::new("After", at(4, 0), at(4, 1))));
    }

    #[test]
    fn month_window_spans_calendar_month() {
        let window = Window::month(date(2024, 2, 17)).unwrap();
        assert_eq!(window.start, start_of_day(date(2024, 2, 1)));
        assert_eq!(window.end, start_of_day(date(2024, 3, 1)));
    }

    #[test]
    fn from_args_parses_dates() {
        let window = Window::from_args(Some("2024-03-01"), Some("2024-03-14")).unwrap();
        assert_eq!(window, Window::days(date(2024, 3, 1), date(2024, 3, 14)));
    }

    #[test]
    fn from_args_defaults_to_a_week() {
        let window = Window::from_args(Some("2024-03-01"), None).unwrap();
        assert_eq!(window.end - window.start, Duration::days(DEFAULT_AGENDA_DAYS));
    }

    #[test]
    fn from_args_rejects_bad_input() {
        assert!(Window::from_args(Some("03/01/2024"), None).is_err());
        assert!(Window::from_args(Some("2024-03-10"), Some("2024-03-01")).is_err());
    }
}
