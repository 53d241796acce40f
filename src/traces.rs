//! Trace file storage for Retrace
//!
//! This module defines the [`TraceStore`] trait that the garbage collector
//! and the existence correlator use to reach the on-disk trace directory,
//! plus the production filesystem implementation. Keeping the seam as a
//! trait lets tests drive both consumers against an in-memory store.

use crate::error::{Error, Result};
use std::fs;
use std::path::PathBuf;
use std::time::UNIX_EPOCH;

/// One trace file on disk, snapshotted at listing time.
///
/// A listing is taken fresh per operation and never cached across calls,
/// so a record is only meaningful relative to the listing it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceFileRecord {
    /// File name, unique within the trace directory
    pub name: String,
    /// Modification time in seconds since the Unix epoch
    pub mod_time: i64,
}

/// Access to the trace directory
///
/// Listing failures are fatal to the calling operation; removal failures
/// affect only the file they name.
pub trait TraceStore {
    /// List every trace file with its modification time
    #[must_use = "Listing results should be used"]
    fn list(&self) -> Result<Vec<TraceFileRecord>>;

    /// Remove a single trace file by name
    fn remove(&self, name: &str) -> Result<()>;
}

/// Filesystem-backed trace store rooted at a directory
#[derive(Debug, Clone)]
pub struct FsTraceStore {
    dir: PathBuf,
}

impl FsTraceStore {
    /// Create a store rooted at the given trace directory
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The directory this store reads and deletes in
    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }

    fn listing_error(&self, source: std::io::Error) -> Error {
        Error::TraceListing {
            path: self.dir.clone(),
            source,
        }
    }
}

impl TraceStore for FsTraceStore {
    fn list(&self) -> Result<Vec<TraceFileRecord>> {
        let dir_entries = fs::read_dir(&self.dir).map_err(|e| self.listing_error(e))?;

        let mut records = Vec::new();
        for dir_entry in dir_entries {
            let dir_entry = dir_entry.map_err(|e| self.listing_error(e))?;
            let metadata = dir_entry.metadata().map_err(|e| self.listing_error(e))?;
            if !metadata.is_file() {
                continue;
            }

            let mod_time = metadata
                .modified()
                .map_err(|e| self.listing_error(e))?
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs() as i64)
                .unwrap_or(0);

            records.push(TraceFileRecord {
                name: dir_entry.file_name().to_string_lossy().into_owned(),
                mod_time,
            });
        }

        Ok(records)
    }

    fn remove(&self, name: &str) -> Result<()> {
        fs::remove_file(self.dir.join(name))?;
        Ok(())
    }
}
