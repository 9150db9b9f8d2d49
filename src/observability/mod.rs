//! Logging: tracing initialization and the flat event log.

pub mod event_log;
pub mod logging;

pub use event_log::{EventLevel, EventLog};
