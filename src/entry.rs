//! History entry type for Retrace
//!
//! A [`HistoryEntry`] is one recorded shell command invocation, carrying
//! the sequence number the shell assigned to it. The number doubles as the
//! name of the command's output trace file on disk, which is how the
//! correlator decides whether a recorded trace exists for an entry.

use chrono::{DateTime, Utc};

/// Represents a single command entry in the history
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct HistoryEntry {
    /// Sequence number assigned by the shell, unique within a session
    pub number: u64,
    /// The command that was executed
    pub command: String,
    /// Timestamp when the command was executed
    pub timestamp: DateTime<Utc>,
    /// Whether an output trace file exists on disk for this command
    pub has_history: bool,
}

impl HistoryEntry {
    /// Create a new history entry
    pub fn new(number: u64, command: String, timestamp: DateTime<Utc>) -> Self {
        Self {
            number,
            command,
            timestamp,
            has_history: false,
        }
    }

    /// Name of the trace file that would hold this command's output
    pub fn trace_name(&self) -> String {
        self.number.to_string()
    }

    /// Get the command as a string for display
    pub fn display_command(&self) -> &str {
        &self.command
    }

    /// Get formatted timestamp
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }

    /// Marker shown next to entries that have a recorded trace
    pub fn history_marker(&self) -> &'static str {
        if self.has_history { "*" } else { " " }
    }
}
