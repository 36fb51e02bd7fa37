use std::path::PathBuf;

use anyhow::{Context, Result};
use gridcal_core::event::EventColor;
use gridcal_core::gridcal::Gridcal;
use gridcal_core::gridcal_config::GridcalConfig;
use owo_colors::OwoColorize;

pub struct ConfigChanges {
    pub events_file: Option<PathBuf>,
    pub default_color: Option<EventColor>,
    pub default_duration: Option<String>,
}

impl ConfigChanges {
    fn is_empty(&self) -> bool {
        self.events_file.is_none() && self.default_color.is_none() && self.default_duration.is_none()
    }
}

pub fn run(gridcal: &Gridcal, changes: ConfigChanges) -> Result<()> {
    let config_path = GridcalConfig::config_path()?;

    if changes.is_empty() {
        let config = gridcal.config();
        println!("{}", "Paths".bold());
        println!("  Config:  {}", config_path.display());
        println!("  Events:  {}", gridcal.events_path().display());
        println!();
        println!("{}", "Defaults".bold());
        println!("  Color:     {}", config.default_color);
        println!("  Duration:  {}", config.default_duration);
        return Ok(());
    }

    // Start from the file alone so environment overrides are not written back.
    let current = GridcalConfig::read_file(&config_path)?;
    let updated = apply(current, changes)?;
    updated
        .save(&config_path)
        .with_context(|| format!("Failed to save {}", config_path.display()))?;

    println!("{}", format!("Saved {}", config_path.display()).green());
    Ok(())
}

fn apply(mut config: GridcalConfig, changes: ConfigChanges) -> Result<GridcalConfig> {
    if let Some(events_file) = changes.events_file {
        config.events_file = events_file;
    }
    if let Some(color) = changes.default_color {
        config.default_color = color;
    }
    if let Some(duration) = changes.default_duration {
        humantime::parse_duration(&duration)
            .with_context(|| format!("Could not parse duration: \"{}\"", duration))?;
        config.default_duration = duration;
    }

    Ok(config)
}
