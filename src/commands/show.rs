use anyhow::Result;
use chrono::{Duration, Local};
use gridcal_core::gridcal::Gridcal;
use gridcal_core::window::Window;
use owo_colors::OwoColorize;

use crate::render::{Render, date_label};

/// How far ahead upcoming occurrences are listed.
const UPCOMING_DAYS: i64 = 30;

/// Upcoming occurrences listed at most.
const UPCOMING_LIMIT: usize = 5;

pub fn run(gridcal: &Gridcal, id: &str) -> Result<()> {
    let catalog = gridcal.store().load()?;
    let event = catalog.resolve(id)?;

    println!("{}", event.render());

    if !event.is_recurring() {
        return Ok(());
    }

    let today = Local::now().date_naive();
    let window = Window::days(today, today + Duration::days(UPCOMING_DAYS - 1));
    let upcoming: Vec<_> = catalog
        .occurrences_of(&event.id, &window)?
        .into_iter()
        .filter(|occ| window.touches(occ))
        .collect();

    println!();
    if upcoming.is_empty() {
        println!("{}", format!("No occurrences in the next {} days", UPCOMING_DAYS).dimmed());
        return Ok(());
    }

    println!("{}", "Upcoming".bold());
    for occurrence in upcoming.iter().take(UPCOMING_LIMIT) {
        println!(
            "  {:<10}{}",
            date_label(occurrence.start.date(), today),
            occurrence.render()
        );
    }
    if upcoming.len() > UPCOMING_LIMIT {
        let more = format!("  +{} more", upcoming.len() - UPCOMING_LIMIT);
        println!("{}", more.dimmed());
    }

    Ok(())
}
