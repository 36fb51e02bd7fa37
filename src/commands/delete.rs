use anyhow::{Context, Result};
use gridcal_core::gridcal::Gridcal;
use owo_colors::OwoColorize;

pub fn run(gridcal: &Gridcal, id: &str) -> Result<()> {
    let store = gridcal.store();
    let catalog = store.load()?;
    let base_id = catalog.resolve(id)?.id.clone();

    let (catalog, removed) = catalog.delete(&base_id)?;
    store
        .save(&catalog)
        .with_context(|| format!("Failed to save events to {}", gridcal.display_path().display()))?;

    let note = if removed.is_recurring() { " (all occurrences)" } else { "" };
    println!("{}{}", format!("Deleted: {}", removed.title).red(), note.dimmed());

    Ok(())
}
