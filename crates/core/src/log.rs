//! Telemetry log shown alongside the device table.
//!
//! Entries are kept newest first. The log is bounded: once `capacity` is
//! reached the oldest entry is discarded for every new one.

use std::collections::VecDeque;

use serde::Serialize;

use crate::types::Timestamp;

/// Default number of retained log entries.
pub const DEFAULT_LOG_CAPACITY: usize = 500;

/// What produced a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Telemetry,
    Alert,
    Ping,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogEntry {
    pub timestamp: Timestamp,
    pub kind: LogKind,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct TelemetryLog {
    entries: VecDeque<LogEntry>,
    capacity: usize,
}

impl Default for TelemetryLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_LOG_CAPACITY)
    }
}

impl TelemetryLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    /// Prepend an entry and return a reference to it.
    pub fn push(
        &mut self,
        kind: LogKind,
        message: impl Into<String>,
        timestamp: Timestamp,
    ) -> &LogEntry {
        self.entries.push_front(LogEntry {
            timestamp,
            kind,
            message: message.into(),
        });
        self.entries.truncate(self.capacity);
        &self.entries[0]
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    #[test]
    fn newest_entry_comes_first() {
        let mut log = TelemetryLog::default();
        log.push(LogKind::Telemetry, "first", Utc::now());
        log.push(LogKind::Ping, "Pinged dev-1", Utc::now());

        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["Pinged dev-1", "first"]);
    }

    #[test]
    fn capacity_drops_oldest() {
        let mut log = TelemetryLog::with_capacity(2);
        for i in 0..5 {
            log.push(LogKind::Telemetry, format!("line {i}"), Utc::now());
        }
        let messages: Vec<&str> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["line 4", "line 3"]);
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = TelemetryLog::default();
        log.push(LogKind::Alert, "⚠ Rule hot triggered on dev-1", Utc::now());
        log.clear();
        assert!(log.is_empty());
    }
}
