use anyhow::Result;
use gridcal_core::gridcal::Gridcal;
use owo_colors::OwoColorize;

use crate::render::Render;

pub fn run(gridcal: &Gridcal, term: &str) -> Result<()> {
    let catalog = gridcal.store().load()?;
    let mut matches = catalog.search(term);

    if matches.is_empty() {
        println!("{}", format!("No events matching \"{}\"", term.trim()).dimmed());
        return Ok(());
    }

    matches.sort_by_key(|e| e.start);
    for (i, event) in matches.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}", event.render());
    }

    Ok(())
}
