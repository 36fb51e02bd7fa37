//! Global gridcal configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{CalError, CalResult};
use crate::event::EventColor;

static DEFAULT_EVENTS_FILE: &str = "~/.local/share/gridcal/events.json";
static DEFAULT_DURATION: &str = "1h";

fn default_events_file() -> PathBuf {
    PathBuf::from(DEFAULT_EVENTS_FILE)
}

fn is_default_events_file(p: &PathBuf) -> bool {
    *p == default_events_file()
}

fn default_duration() -> String {
    DEFAULT_DURATION.to_string()
}

fn is_default_duration(d: &String) -> bool {
    d == DEFAULT_DURATION
}

fn is_default_color(c: &EventColor) -> bool {
    *c == EventColor::default()
}

/// Configuration at ~/.config/gridcal/config.toml
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct GridcalConfig {
    /// Where the event catalog is stored.
    #[serde(default = "default_events_file", skip_serializing_if = "is_default_events_file")]
    pub events_file: PathBuf,

    /// Color for new events when none is given.
    #[serde(default, skip_serializing_if = "is_default_color")]
    pub default_color: EventColor,

    /// Length of new events when neither end nor duration is given (humantime, e.g. "45m").
    #[serde(default = "default_duration", skip_serializing_if = "is_default_duration")]
    pub default_duration: String,
}

impl Default for GridcalConfig {
    fn default() -> Self {
        GridcalConfig {
            events_file: default_events_file(),
            default_color: EventColor::default(),
            default_duration: default_duration(),
        }
    }
}

impl GridcalConfig {
    pub fn config_path() -> CalResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CalError::Config("Could not determine config directory".into()))?
            .join("gridcal");

        Ok(config_dir.join("config.toml"))
    }

    /// Read the file at `path` alone, without `GRIDCAL_*` overrides.
    /// A missing file gives the defaults.
    pub fn read_file(path: &Path) -> CalResult<Self> {
        if !path.exists() {
            return Ok(GridcalConfig::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| CalError::Config(format!("Could not read config file: {e}")))?;
        toml::from_str(&content).map_err(|e| CalError::Config(e.to_string()))
    }

    /// Save the current config to `path`.
    pub fn save(&self, path: &Path) -> CalResult<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| CalError::Config(e.to_string()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, content)
            .map_err(|e| CalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> CalResult<()> {
        let contents = format!(
            "\
# gridcal configuration

# Where your events are stored:
# events_file = \"{}\"

# Color for new events (blue, green, purple, red, yellow, indigo):
# default_color = \"blue\"

# Length of new events when no end is given:
# default_duration = \"{}\"
",
            DEFAULT_EVENTS_FILE, DEFAULT_DURATION
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                CalError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| CalError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}
