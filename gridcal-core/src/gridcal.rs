//! Loaded configuration plus the paths and defaults derived from it.

use std::path::{Path, PathBuf};

use chrono::Duration;
use config::{Config, Environment, File};

use crate::error::{CalError, CalResult};
use crate::event::EventColor;
use crate::gridcal_config::GridcalConfig;
use crate::store::EventStore;

#[derive(Debug, Clone)]
pub struct Gridcal {
    config: GridcalConfig,
}

impl Gridcal {
    /// Load ~/.config/gridcal/config.toml, writing a commented default on first run.
    pub fn load() -> CalResult<Self> {
        let config_path = GridcalConfig::config_path()?;

        if !config_path.exists() {
            GridcalConfig::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load from a specific file. `GRIDCAL_*` environment variables override it.
    pub fn load_from(config_path: &Path) -> CalResult<Self> {
        let config: GridcalConfig = Config::builder()
            .add_source(File::from(config_path.to_path_buf()).required(false))
            .add_source(Environment::with_prefix("GRIDCAL"))
            .build()
            .map_err(|e| CalError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalError::Config(e.to_string()))?;

        Ok(Gridcal { config })
    }

    pub fn from_config(config: GridcalConfig) -> Self {
        Gridcal { config }
    }

    pub fn config(&self) -> &GridcalConfig {
        &self.config
    }

    pub fn events_path(&self) -> PathBuf {
        let full_path_str =
            shellexpand::tilde(&self.config.events_file.to_string_lossy()).into_owned();

        PathBuf::from(full_path_str)
    }

    /// The events file in display-friendly form, keeping `~` unexpanded.
    pub fn display_path(&self) -> PathBuf {
        self.config.events_file.clone()
    }

    pub fn store(&self) -> EventStore {
        EventStore::new(self.events_path())
    }

    pub fn default_color(&self) -> EventColor {
        self.config.default_color
    }

    pub fn default_duration(&self) -> CalResult<Duration> {
        let std_duration = humantime::parse_duration(&self.config.default_duration).map_err(|e| {
            CalError::Config(format!(
                "Invalid default_duration '{}': {}",
                self.config.default_duration, e
            ))
        })?;

        Duration::from_std(std_duration).map_err(|e| CalError::Config(e.to_string()))
    }
}
