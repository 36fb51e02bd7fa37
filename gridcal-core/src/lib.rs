//! Core of gridcal: recurrence expansion, conflict detection and month grids
//! over an immutable event catalog.
//!
//! - `recurrence` turns one event plus a window into its concrete occurrences
//! - `conflict` finds catalog entries that overlap a candidate on the same day
//! - `month` lays a catalog out on a Sunday-first month grid
//! - `catalog` is the single place the event list changes
//! - `store` and `gridcal` handle the events file and configuration

pub mod catalog;
pub mod conflict;
pub mod error;
pub mod event;
pub mod gridcal;
pub mod gridcal_config;
pub mod month;
pub mod recurrence;
pub mod store;
pub mod time;
pub mod window;

pub use catalog::Catalog;
pub use conflict::{ConflictSummary, find_conflicts};
pub use error::{CalError, CalResult, ValidationError};
pub use event::{EventColor, EventDefinition, EventDraft, EventUpdate, Occurrence, Scheduled};
pub use month::{Day, Month, build_month};
pub use recurrence::{RecurrenceKind, RecurrenceRule, expand};
pub use window::Window;
