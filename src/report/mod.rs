//! Logging sink for reconciliation checks.
//!
//! The reconciliation engine never talks to process-global logging state
//! directly; it reports through a [`CheckSink`] handed in by the caller.
//! The binary installs a [`TracingSink`], tests can capture events with a
//! [`MemorySink`].

use std::sync::Mutex;
use tracing::{debug, error, info, warn};

/// Severity of a recorded sink event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// Sink for per-declaration progress and outcome messages.
pub trait CheckSink: Send + Sync {
    fn debug(&self, message: &str);
    fn info(&self, message: &str);
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Sink that forwards every message to the `tracing` macros.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl CheckSink for TracingSink {
    fn debug(&self, message: &str) {
        debug!("{message}");
    }

    fn info(&self, message: &str) {
        info!("{message}");
    }

    fn warn(&self, message: &str) {
        warn!("{message}");
    }

    fn error(&self, message: &str) {
        error!("{message}");
    }
}

/// Sink that records events in memory, for inspecting engine behavior in
/// tests without a global subscriber.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<(SinkLevel, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded events in order.
    pub fn events(&self) -> Vec<(SinkLevel, String)> {
        self.events.lock().expect("sink lock poisoned").clone()
    }

    /// All recorded messages at the given level.
    pub fn messages_at(&self, level: SinkLevel) -> Vec<String> {
        self.events()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, m)| m)
            .collect()
    }

    fn record(&self, level: SinkLevel, message: &str) {
        self.events
            .lock()
            .expect("sink lock poisoned")
            .push((level, message.to_string()));
    }
}

impl CheckSink for MemorySink {
    fn debug(&self, message: &str) {
        self.record(SinkLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.record(SinkLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.record(SinkLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.record(SinkLevel::Error, message);
    }
}
