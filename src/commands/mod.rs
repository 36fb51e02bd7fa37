pub mod config;
pub mod delete;
pub mod edit;
pub mod events;
pub mod month;
pub mod new;
pub mod reschedule;
pub mod search;
pub mod show;
