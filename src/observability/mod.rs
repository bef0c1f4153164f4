//! Observability subsystem for locusdb
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No async or background threads
//! 4. Deterministic output
//!
//! # Usage
//!
//! ```ignore
//! use locusdb::observability::{Event, Logger};
//!
//! Logger::info(Event::QueryExecuted, &[("matched", "42")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event with fields, deriving severity from the event
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    if event.is_fatal() {
        Logger::fatal(event, fields);
    } else {
        Logger::info(event, fields);
    }
}
