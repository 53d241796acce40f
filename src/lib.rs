//! Retrace - shell history retrieval with per-command output traces
//!
//! This library provides functionality for:
//! - Streaming shell history entries into mode-specific retrieval shapes
//! - Marking entries whose command output trace still exists on disk
//! - Garbage-collecting old trace files under configurable retention
//!
//! # Examples
//!
//! ```rust,no_run
//! use retrace::{FsTraceStore, RetentionPolicy, gc};
//!
//! let store = FsTraceStore::new(retrace::default_traces_dir()?);
//! let deleted = gc::prune(&store, RetentionPolicy::KeepLatest(100))?;
//! println!("removed {} traces", deleted.len());
//! # Ok::<(), retrace::Error>(())
//! ```

use std::path::PathBuf;

pub mod cli;
pub mod config;
pub mod correlate;
pub mod entry;
pub mod error;
pub mod gc;
pub mod histfile;
pub mod keeper;
pub mod process;
pub mod traces;

pub use config::Config;
pub use entry::HistoryEntry;
pub use error::{Error, Result};
pub use gc::RetentionPolicy;
pub use keeper::{Harvest, Keeper, RetrievalMode};
pub use traces::{FsTraceStore, TraceFileRecord, TraceStore};

/// Get the default trace directory path
pub fn default_traces_dir() -> Result<PathBuf> {
    let home = home::home_dir().ok_or(Error::HomeDirectoryNotFound)?;
    Ok(home.join(config::DEFAULT_TRACES_DIR))
}
