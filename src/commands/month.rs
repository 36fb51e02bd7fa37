use anyhow::Result;
use chrono::Local;
use gridcal_core::gridcal::Gridcal;
use gridcal_core::month::{next_month, prev_month};
use gridcal_core::time::parse_date;

use crate::render::Render;

pub fn run(gridcal: &Gridcal, date: Option<&str>, next: bool, prev: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let mut anchor = match date {
        Some(s) => parse_date(s)?,
        None => today,
    };

    if next {
        anchor = next_month(anchor);
    } else if prev {
        anchor = prev_month(anchor);
    }

    let catalog = gridcal.store().load()?;
    println!("{}", catalog.month(anchor, today).render());

    Ok(())
}
