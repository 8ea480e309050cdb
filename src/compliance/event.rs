//! Severity-levelled event emission
//!
//! The log stream is the checker's observable output: consumers filter on
//! severity (`info` compliant, `warn` non-compliant) to build reports.

use std::fmt;
use std::sync::Mutex;

use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
        };
        f.write_str(s)
    }
}

/// A single emitted record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub severity: Severity,
    pub message: String,
}

/// Receiver of checker events
pub trait EventSink: Send + Sync {
    fn emit(&self, severity: Severity, message: &str);
}

/// Forwards events to `tracing`
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Debug => debug!(target: "dep_compliance::check", "{}", message),
            Severity::Info => info!(target: "dep_compliance::check", "{}", message),
            Severity::Warn => warn!(target: "dep_compliance::check", "{}", message),
            Severity::Error => error!(target: "dep_compliance::check", "{}", message),
        }
    }
}

/// Keeps events in emission order, for hosts and tests that inspect them
#[derive(Default)]
pub struct RecordingSink {
    events: Mutex<Vec<Event>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }

    /// Messages emitted at exactly `severity`
    pub fn messages_at(&self, severity: Severity) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|e| e.severity == severity)
            .map(|e| e.message)
            .collect()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, severity: Severity, message: &str) {
        if let Ok(mut events) = self.events.lock() {
            events.push(Event {
                severity,
                message: message.to_string(),
            });
        }
    }
}
