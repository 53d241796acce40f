//! Retrieval driving loop
//!
//! Glues the three moving parts of a retrieval together: an entry source,
//! the keeper selected for the requested mode, and the background
//! existence correlator. The loop feeds entries into the keeper until the
//! keeper has what it wants or the source runs dry, closes the
//! correlation feed, waits for the correlator's report, and only then
//! annotates the harvested entries.

use crate::correlate;
use crate::error::Result;
use crate::keeper::{self, Harvest, RetrievalMode};
use crate::traces::TraceStore;

/// Run one retrieval over `source` in the given mode.
///
/// `capacity` sizes both the all-history buffer and the correlation feed
/// channel. The correlator runs for every mode; modes that do not track
/// trace existence simply never feed it, and its empty report is a no-op.
pub fn collect<I, S>(source: I, mode: RetrievalMode, store: S, capacity: usize) -> Result<Harvest>
where
    I: IntoIterator<Item = crate::entry::HistoryEntry>,
    S: TraceStore + Send + 'static,
{
    let (feed, correlator) = correlate::spawn(store, capacity);
    let mut keeper = keeper::keeper_for(mode, capacity);

    keeper.init();
    for entry in source {
        keeper.commit(entry, &feed);
        if !keeper.wants_more() {
            break;
        }
    }

    // Closing the feed is the only termination signal the worker gets.
    drop(feed);
    let report = correlator.finish();

    let mut harvest = keeper.harvest()?;
    // The report is only applied after finish(): the completion channel
    // is what orders the worker's writes before this read.
    report.apply(harvest.entries_mut());
    Ok(harvest)
}
