//! Flat event log file.
//!
//! One tab-delimited line per event: timestamp, level name, message, then
//! `key=value` context pairs. The format mirrors the log files the legacy
//! sites already ship to operators, so it must stay grep- and cut-friendly.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;

use chrono::Utc;

/// Severity of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventLevel {
    Info,
    Notice,
    Warning,
    Error,
}

impl EventLevel {
    fn name(self) -> &'static str {
        match self {
            EventLevel::Info => "INFO",
            EventLevel::Notice => "NOTICE",
            EventLevel::Warning => "WARNING",
            EventLevel::Error => "ERROR",
        }
    }
}

/// Append-only tab-delimited event log.
///
/// A disabled log (empty path) swallows events; every event is mirrored to
/// `tracing` either way.
#[derive(Debug)]
pub struct EventLog {
    writer: Option<Mutex<BufWriter<File>>>,
}

impl EventLog {
    /// Open the log file for appending, creating it when missing.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: Some(Mutex::new(BufWriter::new(file))),
        })
    }

    /// A log that only mirrors to `tracing`.
    pub fn disabled() -> Self {
        Self { writer: None }
    }

    /// Record one event.
    pub fn record(&self, level: EventLevel, message: &str, context: &[(&str, String)]) {
        match level {
            EventLevel::Info | EventLevel::Notice => tracing::info!(?context, "{message}"),
            EventLevel::Warning => tracing::warn!(?context, "{message}"),
            EventLevel::Error => tracing::error!(?context, "{message}"),
        }

        let Some(writer) = &self.writer else {
            return;
        };

        let mut line = format!(
            "[{}]\t{}\t{}",
            Utc::now().format("%Y-%m-%d %H:%M:%S"),
            level.name(),
            message
        );
        for (key, value) in context {
            line.push('\t');
            line.push_str(key);
            line.push('=');
            line.push_str(value);
        }
        line.push('\n');

        let mut writer = writer.lock().expect("event log mutex poisoned");
        if let Err(error) = writer.write_all(line.as_bytes()).and_then(|()| writer.flush()) {
            tracing::error!(%error, "Failed to write event log line");
        }
    }

    pub fn notice(&self, message: &str, context: &[(&str, String)]) {
        self.record(EventLevel::Notice, message, context);
    }
}
