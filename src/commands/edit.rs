use anyhow::{Context, Result, bail};
use gridcal_core::event::{EventColor, EventDefinition, EventUpdate, Scheduled};
use gridcal_core::gridcal::Gridcal;
use gridcal_core::time::parse_datetime;
use owo_colors::OwoColorize;

use crate::RecurrenceArgs;
use crate::commands::new::parse_end;
use crate::render::{self, Render};

pub struct EditEvent {
    pub title: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub description: Option<String>,
    pub color: Option<EventColor>,
    pub recurrence: RecurrenceArgs,
}

/// Edit an event. An occurrence id edits the whole series.
pub fn run(gridcal: &Gridcal, id: &str, args: EditEvent) -> Result<()> {
    let store = gridcal.store();
    let catalog = store.load()?;
    let current = catalog.resolve(id)?;

    let update = build_update(current, &args)?;
    if update.is_empty() {
        bail!("Nothing to change. Pass at least one field to edit.");
    }

    let base_id = current.id.clone();
    let (catalog, edited) = catalog
        .update(&base_id, &update)
        .map_err(render::rejection)?;
    store
        .save(&catalog)
        .with_context(|| format!("Failed to save events to {}", gridcal.display_path().display()))?;

    println!("{}", format!("Updated: {}", edited.title).yellow());
    println!("{}", edited.render());

    Ok(())
}

/// Turn the given flags into an update of `current`.
///
/// A new start without a new end keeps the event's length. An empty
/// description clears it.
fn build_update(current: &EventDefinition, args: &EditEvent) -> Result<EventUpdate> {
    let start = args.start.as_deref().map(parse_datetime).transpose()?;
    let new_start = start.unwrap_or(current.start);

    let end = match (&args.end, start) {
        (Some(end), _) => Some(parse_end(end, new_start)?),
        (None, Some(start)) => Some(
            start
                .checked_add_signed(current.duration())
                .context("Event runs past the end of the calendar")?,
        ),
        (None, None) => None,
    };

    let description = args.description.as_ref().map(|d| {
        let trimmed = d.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    });

    let recurrence = if args.recurrence.is_empty() {
        None
    } else {
        Some(args.recurrence.to_rule(&current.recurrence)?)
    };

    Ok(EventUpdate {
        title: args.title.clone(),
        start,
        end,
        description,
        color: args.color,
        recurrence,
    })
}
