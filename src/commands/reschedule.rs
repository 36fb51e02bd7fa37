use anyhow::{Context, Result};
use gridcal_core::gridcal::Gridcal;
use gridcal_core::time::parse_date;
use owo_colors::OwoColorize;

use crate::render::{self, Render};

/// Move an event (or the series an occurrence belongs to) to another day.
pub fn run(gridcal: &Gridcal, id: &str, date: &str) -> Result<()> {
    let target = parse_date(date)?;

    let store = gridcal.store();
    let catalog = store.load()?;
    let base_id = catalog.resolve(id)?.id.clone();

    let (catalog, moved) = catalog
        .reschedule(&base_id, target)
        .map_err(render::rejection)?;
    store
        .save(&catalog)
        .with_context(|| format!("Failed to save events to {}", gridcal.display_path().display()))?;

    println!("{}", format!("Moved: {}", moved.title).green());
    println!("{}", moved.render());

    Ok(())
}
