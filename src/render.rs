//! Terminal rendering for gridcal types.
//!
//! Extension traits that add colored output to gridcal-core types using owo_colors.

use chrono::{NaiveDate, NaiveDateTime};
use gridcal_core::error::CalError;
use gridcal_core::event::{EventColor, EventDefinition, Occurrence};
use gridcal_core::month::{Day, Month};
use gridcal_core::recurrence::RecurrenceKind;
use gridcal_core::time::{format_time, is_same_day};
use owo_colors::OwoColorize;

/// Width of one grid column, in characters.
const CELL_WIDTH: usize = 14;

/// Titles listed per cell before collapsing into "+N more".
const MAX_CELL_EVENTS: usize = 3;

const WEEKDAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// Paint text with an event's color tag.
pub fn paint(color: EventColor, text: &str) -> String {
    match color {
        EventColor::Blue => text.blue().to_string(),
        EventColor::Green => text.green().to_string(),
        EventColor::Purple => text.magenta().to_string(),
        EventColor::Red => text.red().to_string(),
        EventColor::Yellow => text.yellow().to_string(),
        EventColor::Indigo => text.bright_blue().to_string(),
    }
}

impl Render for EventDefinition {
    fn render(&self) -> String {
        let mut lines = vec![
            format!("{} {}", paint(self.color, "●"), self.title.bold()),
            format!("  {}", format_span(self.start, self.end)),
        ];

        if self.recurrence.kind() != RecurrenceKind::None {
            lines.push(format!("  {}", format!("Repeats {}", self.recurrence).dimmed()));
        }
        if let Some(description) = &self.description {
            lines.push(format!("  {}", description));
        }
        lines.push(format!("  {}", format!("id: {}", self.id).dimmed()));

        lines.join("\n")
    }
}

impl Render for Occurrence {
    fn render(&self) -> String {
        let time = format!("{:>8}", format_time(&self.start));
        let repeat = if self.is_recurring_instance { " ↻" } else { "" };

        format!(
            "  {} {}{} {}",
            time,
            paint(self.color, &self.title),
            repeat.dimmed(),
            format!("[{}]", self.id).dimmed()
        )
    }
}

impl Render for Month {
    fn render(&self) -> String {
        let width = CELL_WIDTH * 7;
        let mut lines = Vec::new();

        let heading = format!("{} {}", self.name, self.year);
        lines.push(format!("{:^width$}", heading).bold().to_string());
        lines.push(
            WEEKDAYS
                .iter()
                .map(|d| fit(d, CELL_WIDTH).dimmed().to_string())
                .collect::<String>(),
        );

        for week in self.weeks() {
            lines.push(week.iter().map(render_day_number).collect());

            let cells: Vec<Vec<String>> = week.iter().map(cell_rows).collect();
            let rows = cells.iter().map(Vec::len).max().unwrap_or(0);
            for row in 0..rows {
                lines.push(
                    cells
                        .iter()
                        .map(|cell| cell.get(row).cloned().unwrap_or_else(|| " ".repeat(CELL_WIDTH)))
                        .collect(),
                );
            }
            lines.push(String::new());
        }

        lines.join("\n")
    }
}

fn render_day_number(day: &Day) -> String {
    let label = fit(&day.date.format("%-d").to_string(), CELL_WIDTH);

    if day.is_today {
        label.reversed().bold().to_string()
    } else if !day.is_current_month {
        label.dimmed().to_string()
    } else {
        label
    }
}

/// Title lines for one cell, each padded to the cell width before coloring.
fn cell_rows(day: &Day) -> Vec<String> {
    let mut rows: Vec<String> = day
        .events
        .iter()
        .take(MAX_CELL_EVENTS)
        .map(|event| {
            let text = fit(&event.title, CELL_WIDTH - 1);
            let cell = format!("{} ", text);
            if day.is_current_month {
                paint(event.color, &cell)
            } else {
                cell.dimmed().to_string()
            }
        })
        .collect();

    let hidden = day.events.len().saturating_sub(MAX_CELL_EVENTS);
    if hidden > 0 {
        rows.push(fit(&format!("+{} more", hidden), CELL_WIDTH).dimmed().to_string());
    }

    rows
}

/// Truncate or pad `text` to exactly `width` characters.
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    } else {
        format!("{}{}", text, " ".repeat(width - count))
    }
}

/// Human label for a day relative to `today` (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        -1 => "Yesterday".to_string(),
        _ => date.format("%a %b %-d").to_string(),
    }
}

/// "Mon Mar 4, 2024, 9:00 AM - 10:00 AM", with the end date spelled out when it differs.
pub fn format_span(start: NaiveDateTime, end: NaiveDateTime) -> String {
    let day = start.format("%a %b %-d, %Y");
    if is_same_day(&start, &end) {
        format!("{}, {} - {}", day, format_time(&start), format_time(&end))
    } else {
        format!(
            "{}, {} - {} {}",
            day,
            format_time(&start),
            end.format("%a %b %-d"),
            format_time(&end)
        )
    }
}

/// Turn a core error into the message the user sees, listing every conflict.
pub fn rejection(err: CalError) -> anyhow::Error {
    match err {
        CalError::Conflict(conflicts) => {
            let mut lines = vec!["This event conflicts with:".to_string()];
            lines.extend(conflicts.iter().map(|c| format!("  - {}", c)));
            anyhow::anyhow!(lines.join("\n"))
        }
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridcal_core::conflict::ConflictSummary;
    use gridcal_core::month::build_month;
    use gridcal_core::recurrence::RecurrenceRule;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn event(title: &str, d: u32) -> EventDefinition {
        EventDefinition {
            id: format!("id-{}", title),
            title: title.to_string(),
            start: date(d).and_hms_opt(9, 0, 0).unwrap(),
            end: date(d).and_hms_opt(10, 0, 0).unwrap(),
            description: None,
            color: EventColor::Green,
            recurrence: RecurrenceRule::none(),
        }
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit("abc", 5), "abc  ");
        assert_eq!(fit("abcdefgh", 5), "abcd…");
        assert_eq!(fit("abcde", 5), "abcde");
    }

    #[test]
    fn date_labels_relative_to_today() {
        assert_eq!(date_label(date(4), date(4)), "Today");
        assert_eq!(date_label(date(5), date(4)), "Tomorrow");
        assert_eq!(date_label(date(3), date(4)), "Yesterday");
        assert_eq!(date_label(date(8), date(4)), "Fri Mar 8");
    }

    #[test]
    fn span_on_one_day_and_across_midnight() {
        let start = date(4).and_hms_opt(9, 0, 0).unwrap();
        assert_eq!(
            format_span(start, date(4).and_hms_opt(10, 30, 0).unwrap()),
            "Mon Mar 4, 2024, 9:00 AM - 10:30 AM"
        );

        let late = date(4).and_hms_opt(23, 0, 0).unwrap();
        assert_eq!(
            format_span(late, date(5).and_hms_opt(1, 0, 0).unwrap()),
            "Mon Mar 4, 2024, 11:00 PM - Tue Mar 5 1:00 AM"
        );
    }

    #[test]
    fn month_lists_titles_and_overflow() {
        let catalog = vec![
            event("One", 12),
            event("Two", 12),
            event("Three", 12),
            event("Four", 12),
        ];
        let rendered = build_month(date(1), &catalog, date(1)).render();

        assert!(rendered.contains("March 2024"));
        assert!(rendered.contains("Three"));
        assert!(!rendered.contains("Four"));
        assert!(rendered.contains("+1 more"));
    }

    #[test]
    fn rejection_lists_each_conflict() {
        let conflicts = vec![
            ConflictSummary::from(&event("Standup", 4)),
            ConflictSummary::from(&event("Review", 4)),
        ];
        let message = rejection(CalError::Conflict(conflicts)).to_string();

        assert!(message.starts_with("This event conflicts with:"));
        assert!(message.contains("\"Standup\" at 9:00 AM"));
        assert!(message.contains("\"Review\" at 9:00 AM"));
    }
}
