//! Shell history file parsing
//!
//! Produces the stream of [`HistoryEntry`] values a retrieval run
//! consumes. Supports the zsh extended history format and plain bash
//! history files; entries get monotone sequence numbers starting at 1,
//! matching how the shell itself numbers them.

use crate::entry::HistoryEntry;
use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read a shell history file into numbered entries.
///
/// `shell` selects the line format: `"zsh"` or `"bash"`. Anything else is
/// an argument error rather than a silent fallback.
pub fn load(path: &Path, shell: &str) -> Result<Vec<HistoryEntry>> {
    if !path.exists() {
        return Err(Error::HistoryFileNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path)?;
    let reader = BufReader::new(file);

    match shell {
        "zsh" => parse_zsh(reader),
        "bash" => parse_bash(reader),
        other => Err(Error::invalid_arguments(format!(
            "unsupported shell '{other}', expected zsh or bash"
        ))),
    }
}

/// Parse the zsh extended format: `: <timestamp>:<duration>;<command>`.
///
/// Lines that do not match the header are continuations of a multiline
/// command and get folded into the previous entry.
fn parse_zsh<R: BufRead>(reader: R) -> Result<Vec<HistoryEntry>> {
    let re = Regex::new(r"^: (\d+):\d+;(.*)")?;
    let mut entries: Vec<HistoryEntry> = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        if let Some(caps) = re.captures(&line) {
            let timestamp_str = &caps[1];
            let timestamp = timestamp_str
                .parse::<i64>()
                .ok()
                .and_then(|seconds| DateTime::from_timestamp(seconds, 0))
                .ok_or_else(|| Error::InvalidTimestamp {
                    timestamp: timestamp_str.to_string(),
                })?;

            let number = entries.len() as u64 + 1;
            entries.push(HistoryEntry::new(number, caps[2].to_string(), timestamp));
        } else if let Some(previous) = entries.last_mut() {
            previous.command.push('\n');
            previous.command.push_str(&line);
        }
        // A continuation before any header has nothing to attach to.
    }

    Ok(entries)
}

/// Parse a plain bash history file: one command per line.
///
/// Bash has no per-entry timestamps here; `#`-prefixed timestamp comments
/// are skipped and entries are stamped with the read time.
fn parse_bash<R: BufRead>(reader: R) -> Result<Vec<HistoryEntry>> {
    let mut entries = Vec::new();

    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() || line.starts_with('#') {
            continue;
        }

        let number = entries.len() as u64 + 1;
        entries.push(HistoryEntry::new(number, line, Utc::now()));
    }

    Ok(entries)
}
