//! Trace existence correlation
//!
//! While a retrieval run streams history entries into a keeper, a
//! background worker cross-references each committed entry against a
//! point-in-time snapshot of the trace directory, so the caller can tell
//! which commands still have a recorded output trace.
//!
//! The worker never mutates the entries it is told about. It accumulates
//! the sequence numbers whose trace exists and hands them back in a
//! [`CorrelationReport`] once its feed closes; the driving loop applies
//! the marks to its own buffer after receiving the report, which is the
//! happens-before edge that makes the exchange race-free.

use crate::entry::HistoryEntry;
use crate::traces::TraceStore;
use crossbeam_channel::{Receiver, Sender, bounded};
use std::collections::HashSet;
use std::thread;

struct CorrelationRequest {
    number: u64,
    trace_name: String,
}

/// Sending half handed to the keeper's commit path.
///
/// Dropping the last feed closes the worker's input and lets it publish
/// its report.
pub struct CorrelationFeed {
    tx: Sender<CorrelationRequest>,
}

impl CorrelationFeed {
    /// Announce one committed entry to the correlator.
    pub fn push(&self, entry: &HistoryEntry) {
        // A worker that bailed out after a failed listing has already
        // dropped its receiver; entries then simply go unmarked.
        let _ = self.tx.send(CorrelationRequest {
            number: entry.number,
            trace_name: entry.trace_name(),
        });
    }

    /// Feed with no worker behind it; every push is dropped.
    #[cfg(test)]
    pub(crate) fn detached() -> Self {
        let (tx, _) = bounded(1);
        Self { tx }
    }
}

/// Outcome of one correlation run
#[derive(Debug, Default)]
pub struct CorrelationReport {
    matched: HashSet<u64>,
    degraded: bool,
}

impl CorrelationReport {
    /// Whether the snapshot listing failed and no entries were correlated
    pub fn is_degraded(&self) -> bool {
        self.degraded
    }

    /// Whether the entry with this sequence number has a trace on disk
    pub fn has_trace(&self, number: u64) -> bool {
        self.matched.contains(&number)
    }

    /// Mark every entry whose trace was found in the snapshot.
    pub fn apply(&self, entries: &mut [HistoryEntry]) {
        for entry in entries {
            if self.matched.contains(&entry.number) {
                entry.has_history = true;
            }
        }
    }
}

/// Handle on a running correlation worker
pub struct Correlator {
    done: Receiver<CorrelationReport>,
    handle: thread::JoinHandle<()>,
}

impl Correlator {
    /// Block until the worker has drained its feed and collect its report.
    ///
    /// The caller must drop every [`CorrelationFeed`] clone first, or this
    /// will wait forever. A worker that died without reporting is treated
    /// as a degraded run.
    pub fn finish(self) -> CorrelationReport {
        let report = self.done.recv().unwrap_or_else(|_| CorrelationReport {
            matched: HashSet::new(),
            degraded: true,
        });
        let _ = self.handle.join();
        report
    }
}

/// Start a correlation worker against a snapshot of `store`.
///
/// The snapshot is taken once, when the worker starts, and never
/// refreshed: traces created mid-stream are not detected. If the listing
/// fails the worker logs a warning and reports a degraded run instead of
/// stalling its caller. `depth` bounds the feed channel, putting
/// backpressure on a producer that outruns the worker.
pub fn spawn<S>(store: S, depth: usize) -> (CorrelationFeed, Correlator)
where
    S: TraceStore + Send + 'static,
{
    let (tx, rx) = bounded::<CorrelationRequest>(depth.max(1));
    let (done_tx, done_rx) = bounded(1);

    let handle = thread::spawn(move || {
        let mut report = CorrelationReport::default();

        let names: HashSet<String> = match store.list() {
            Ok(records) => records.into_iter().map(|record| record.name).collect(),
            Err(err) => {
                tracing::warn!(error = %err, "trace directory listing failed, entries will not be correlated");
                report.degraded = true;
                let _ = done_tx.send(report);
                return;
            }
        };

        // FIFO drain, in commit order, until every feed is dropped.
        for request in rx {
            if names.contains(&request.trace_name) {
                report.matched.insert(request.number);
            }
        }

        let _ = done_tx.send(report);
    });

    (
        CorrelationFeed { tx },
        Correlator {
            done: done_rx,
            handle,
        },
    )
}
