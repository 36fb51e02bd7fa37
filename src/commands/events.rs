use anyhow::Result;
use chrono::{Local, NaiveDate};
use gridcal_core::gridcal::Gridcal;
use gridcal_core::time::parse_date;
use gridcal_core::window::Window;
use owo_colors::OwoColorize;

use crate::render::{Render, date_label};

pub fn run(
    gridcal: &Gridcal,
    from: Option<&str>,
    to: Option<&str>,
    month: Option<&str>,
    json: bool,
) -> Result<()> {
    let window = match month {
        Some(anchor) => Window::month(parse_date(anchor)?)?,
        None => Window::from_args(from, to)?,
    };
    let occurrences = gridcal.store().load()?.occurrences(&window);

    if json {
        println!("{}", serde_json::to_string_pretty(&occurrences)?);
        return Ok(());
    }

    if occurrences.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let today = Local::now().date_naive();

    // Group occurrences by day and print
    let mut current_date: Option<NaiveDate> = None;

    for occurrence in &occurrences {
        let date = occurrence.start.date();

        if current_date != Some(date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_label(date, today).bold());
            current_date = Some(date);
        }

        println!("{}", occurrence.render());
    }

    Ok(())
}
