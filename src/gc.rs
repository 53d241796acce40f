//! Garbage collection of trace files
//!
//! Old output traces accumulate one file per recorded command, so the
//! trace directory needs periodic pruning. This module orders the
//! directory listing by modification time and deletes exactly the files
//! that fall outside the configured retention window.

use crate::error::Result;
use crate::traces::{TraceFileRecord, TraceStore};
use chrono::Utc;

const SECONDS_IN_DAY: i64 = 60 * 60 * 24;

/// Rule determining which trace files survive a garbage collection run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetentionPolicy {
    /// Delete every trace file
    All,
    /// Retain only the `n` most recently modified trace files
    KeepLatest(usize),
    /// Delete trace files whose modification time is strictly older than
    /// `now - days * 86400`; a file exactly at the cutoff is retained
    OlderThan(u32),
}

/// Delete the trace files selected by `policy`, evaluated against the
/// current directory listing.
///
/// Returns the names of the files actually deleted. Obtaining the listing
/// is a hard precondition: if it fails, nothing is touched and the error
/// propagates. Individual deletions are best-effort; a failure is logged
/// and the remaining files are still processed.
pub fn prune(store: &dyn TraceStore, policy: RetentionPolicy) -> Result<Vec<String>> {
    prune_at(store, policy, Utc::now().timestamp())
}

/// Like [`prune`], with an explicit notion of "now" for the
/// [`RetentionPolicy::OlderThan`] cutoff.
pub fn prune_at(store: &dyn TraceStore, policy: RetentionPolicy, now: i64) -> Result<Vec<String>> {
    let mut records = store.list()?;
    // Stable sort keeps repeated runs over the same listing deterministic.
    records.sort_by_key(|record| record.mod_time);

    let doomed = select_expired(&records, policy, now);

    let mut deleted = Vec::with_capacity(doomed.len());
    for record in doomed {
        tracing::info!(filename = %record.name, "removing trace file");
        match store.remove(&record.name) {
            Ok(()) => deleted.push(record.name.clone()),
            Err(err) => {
                tracing::warn!(filename = %record.name, error = %err, "failed to remove trace file");
            }
        }
    }

    Ok(deleted)
}

/// Pick the prefix of the ascending-sorted listing that the policy expires.
///
/// `records` must already be sorted by `mod_time`; monotonicity is what
/// makes the `OlderThan` binary search valid.
fn select_expired(records: &[TraceFileRecord], policy: RetentionPolicy, now: i64) -> &[TraceFileRecord] {
    match policy {
        RetentionPolicy::All => records,
        RetentionPolicy::KeepLatest(keep) => {
            if keep >= records.len() {
                &[]
            } else {
                &records[..records.len() - keep]
            }
        }
        RetentionPolicy::OlderThan(days) => {
            let cutoff = now - SECONDS_IN_DAY * i64::from(days);
            // Smallest index whose file is new enough to keep. Files at
            // exactly the cutoff are not yet old enough to delete.
            let index = records.partition_point(|record| record.mod_time < cutoff);
            &records[..index]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::cell::RefCell;
    use std::collections::HashSet;

    /// In-memory store: fixed listing, records removals, optionally fails.
    struct FakeStore {
        records: Vec<TraceFileRecord>,
        removed: RefCell<Vec<String>>,
        fail_listing: bool,
        fail_removal_of: HashSet<String>,
    }

    impl FakeStore {
        fn with_records(records: Vec<TraceFileRecord>) -> Self {
            Self {
                records,
                removed: RefCell::new(Vec::new()),
                fail_listing: false,
                fail_removal_of: HashSet::new(),
            }
        }

        fn removed(&self) -> Vec<String> {
            self.removed.borrow().clone()
        }
    }

    impl TraceStore for FakeStore {
        fn list(&self) -> Result<Vec<TraceFileRecord>> {
            if self.fail_listing {
                return Err(Error::TraceListing {
                    path: "/fake/traces".into(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
                });
            }
            Ok(self.records.clone())
        }

        fn remove(&self, name: &str) -> Result<()> {
            if self.fail_removal_of.contains(name) {
                return Err(Error::custom(format!("cannot remove {name}")));
            }
            self.removed.borrow_mut().push(name.to_string());
            Ok(())
        }
    }

    fn record(name: &str, mod_time: i64) -> TraceFileRecord {
        TraceFileRecord {
            name: name.to_string(),
            mod_time,
        }
    }

    fn abc_listing() -> Vec<TraceFileRecord> {
        vec![record("b", 200), record("c", 300), record("a", 100)]
    }

    #[test]
    fn test_all_deletes_everything() {
        let store = FakeStore::with_records(abc_listing());
        let deleted = prune_at(&store, RetentionPolicy::All, 300).unwrap();
        assert_eq!(deleted, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_keep_latest_retains_most_recent() {
        let store = FakeStore::with_records(abc_listing());
        let deleted = prune_at(&store, RetentionPolicy::KeepLatest(1), 300).unwrap();
        assert_eq!(deleted, vec!["a", "b"]);
        assert_eq!(store.removed(), vec!["a", "b"]);
    }

    #[test]
    fn test_keep_latest_with_short_listing_deletes_nothing() {
        let store = FakeStore::with_records(abc_listing());
        let deleted = prune_at(&store, RetentionPolicy::KeepLatest(3), 300).unwrap();
        assert!(deleted.is_empty());

        let store = FakeStore::with_records(abc_listing());
        let deleted = prune_at(&store, RetentionPolicy::KeepLatest(10), 300).unwrap();
        assert!(deleted.is_empty());
    }

    #[test]
    fn test_older_than_retains_file_exactly_at_cutoff() {
        // now = 300, days = 0: cutoff is 300; c sits exactly on it.
        let store = FakeStore::with_records(abc_listing());
        let deleted = prune_at(&store, RetentionPolicy::OlderThan(0), 300).unwrap();
        assert_eq!(deleted, vec!["a", "b"]);
    }

    #[test]
    fn test_older_than_uses_day_granularity() {
        let day = 60 * 60 * 24;
        let store = FakeStore::with_records(vec![
            record("old", 0),
            record("edge", day),
            record("new", 3 * day),
        ]);
        // cutoff = 3*day - 2*day = day: "edge" survives, "old" does not.
        let deleted = prune_at(&store, RetentionPolicy::OlderThan(2), 3 * day).unwrap();
        assert_eq!(deleted, vec!["old"]);
    }

    #[test]
    fn test_empty_listing_is_a_noop() {
        let store = FakeStore::with_records(Vec::new());
        let deleted = prune_at(&store, RetentionPolicy::All, 300).unwrap();
        assert!(deleted.is_empty());
    }

    #[test]
    fn test_listing_failure_aborts_without_deleting() {
        let mut store = FakeStore::with_records(abc_listing());
        store.fail_listing = true;
        let err = prune_at(&store, RetentionPolicy::All, 300).unwrap_err();
        assert_eq!(err.category(), "traces");
        assert!(store.removed().is_empty());
    }

    #[test]
    fn test_removal_failure_does_not_abort_siblings() {
        let mut store = FakeStore::with_records(abc_listing());
        store.fail_removal_of.insert("b".to_string());
        let deleted = prune_at(&store, RetentionPolicy::All, 300).unwrap();
        assert_eq!(deleted, vec!["a", "c"]);
    }

    #[test]
    fn test_selection_never_touches_recent_files() {
        let records = {
            let mut r = abc_listing();
            r.sort_by_key(|rec| rec.mod_time);
            r
        };

        let expired = select_expired(&records, RetentionPolicy::KeepLatest(2), 300);
        assert!(expired.iter().all(|r| r.mod_time <= 100));

        let expired = select_expired(&records, RetentionPolicy::OlderThan(0), 250);
        assert!(expired.iter().all(|r| r.mod_time < 250));
    }
}
