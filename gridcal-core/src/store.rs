//! Flat JSON file holding the event catalog.
//!
//! The file is a JSON array of event records:
//!
//! ```json
//! [{"id": "...", "title": "Standup", "start": "2024-03-04T09:00:00",
//!   "end": "2024-03-04T09:30:00", "color": "blue",
//!   "recurrence": {"type": "weekly", "interval": 1, "daysOfWeek": [1, 3],
//!                  "endDate": null, "count": null}}]
//! ```

use std::path::PathBuf;

use tracing::debug;

use crate::catalog::Catalog;
use crate::error::{CalError, CalResult};
use crate::event::EventDefinition;

#[derive(Debug, Clone)]
pub struct EventStore {
    path: PathBuf,
}

impl EventStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        EventStore { path: path.into() }
    }

    /// Load the catalog. A missing file is an empty catalog.
    pub fn load(&self) -> CalResult<Catalog> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "no event file yet");
            return Ok(Catalog::default());
        }

        let content = std::fs::read_to_string(&self.path)?;
        let events = decode_events(&content)
            .map_err(|e| CalError::Decode(format!("{}: {}", self.path.display(), e)))?;

        debug!(path = %self.path.display(), events = events.len(), "loaded events");
        Ok(Catalog::new(events))
    }

    pub fn save(&self, catalog: &Catalog) -> CalResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = encode_events(catalog.events())?;
        let temp = self.temp_path();
        std::fs::write(&temp, content)?;
        std::fs::rename(&temp, &self.path)?;

        debug!(path = %self.path.display(), events = catalog.len(), "saved events");
        Ok(())
    }

    /// Sibling file the catalog is written to before it replaces the real one.
    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

/// Decode stored records, naming the first record that does not parse.
pub fn decode_events(content: &str) -> Result<Vec<EventDefinition>, String> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let records: Vec<serde_json::Value> =
        serde_json::from_str(content).map_err(|e| format!("expected a JSON array of events ({})", e))?;

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let event: EventDefinition =
                serde_json::from_value(record).map_err(|e| format!("record {}: {}", index, e))?;

            if event.end < event.start {
                return Err(format!(
                    "record {} ('{}'): end {} is before start {}",
                    index, event.id, event.end, event.start
                ));
            }
            Ok(event)
        })
        .collect()
}

pub fn encode_events(events: &[EventDefinition]) -> CalResult<String> {
    serde_json::to_string_pretty(events).map_err(|e| CalError::Serialization(e.to_string()))
}
