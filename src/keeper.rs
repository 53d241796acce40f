//! Retrieval strategies for streamed history entries
//!
//! A [`Keeper`] consumes the stream of history entries one commit at a
//! time and accumulates a mode-specific shape: the last entry, one precise
//! entry by number, everything, or a positional range. The set of
//! strategies is closed; [`keeper_for`] selects one per retrieval and the
//! match over [`RetrievalMode`] is exhaustive, so an unhandled mode cannot
//! reach runtime.
//!
//! A keeper lives for exactly one retrieval: `init`, a run of `commit`
//! calls gated by `wants_more`, then a single `harvest`.

use crate::correlate::CorrelationFeed;
use crate::entry::HistoryEntry;
use crate::error::{Error, Result};

/// Default number of entries an all-history retrieval pre-allocates.
/// Overridable through the `HISTFILESIZE` environment variable.
pub const DEFAULT_CAPACITY: usize = 5000;

/// Which shape of history a retrieval call wants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalMode {
    /// Only the most recent entry
    Single,
    /// The entry carrying exactly this sequence number
    PreciseNumber(u64),
    /// Every entry in the stream
    All,
    /// Entries at stream positions `start..=finish` (zero-based)
    Range { start: usize, finish: usize },
}

/// What a keeper accumulated over one retrieval
#[derive(Debug, PartialEq)]
pub enum Harvest {
    /// A single entry (`Single` and `PreciseNumber` modes)
    Single(HistoryEntry),
    /// Collected entries in commit order (`All` and `Range` modes)
    Entries(Vec<HistoryEntry>),
}

impl Harvest {
    /// View the harvest as a mutable slice for post-run annotation.
    pub fn entries_mut(&mut self) -> &mut [HistoryEntry] {
        match self {
            Harvest::Single(entry) => std::slice::from_mut(entry),
            Harvest::Entries(entries) => entries,
        }
    }
}

/// One strategy for accumulating streamed history entries
pub trait Keeper {
    /// Prepare internal buffers. Called once, before the first commit.
    fn init(&mut self);

    /// Absorb one entry from the stream, forwarding it to the correlation
    /// feed when the strategy tracks trace existence.
    fn commit(&mut self, entry: HistoryEntry, feed: &CorrelationFeed);

    /// Whether the driving loop should keep feeding entries
    fn wants_more(&self) -> bool;

    /// Consume the keeper and yield whatever it accumulated.
    ///
    /// Only valid after the driving loop has finished; intermediate state
    /// is not a consistent result.
    fn harvest(self: Box<Self>) -> Result<Harvest>;
}

/// Retains only the most recently committed entry
struct SingleKeeper {
    current: Option<HistoryEntry>,
}

impl Keeper for SingleKeeper {
    fn init(&mut self) {
        self.current = None;
    }

    fn commit(&mut self, entry: HistoryEntry, _feed: &CorrelationFeed) {
        self.current = Some(entry);
    }

    fn wants_more(&self) -> bool {
        true
    }

    fn harvest(self: Box<Self>) -> Result<Harvest> {
        let entry = self
            .current
            .ok_or_else(|| Error::custom("history is empty"))?;
        Ok(Harvest::Single(entry))
    }
}

/// Runs the stream until the entry with the target number arrives
struct PreciseNumberKeeper {
    current: Option<HistoryEntry>,
    target: u64,
}

impl Keeper for PreciseNumberKeeper {
    fn init(&mut self) {
        self.current = None;
    }

    fn commit(&mut self, entry: HistoryEntry, _feed: &CorrelationFeed) {
        self.current = Some(entry);
    }

    fn wants_more(&self) -> bool {
        self.current
            .as_ref()
            .is_none_or(|entry| entry.number != self.target)
    }

    fn harvest(self: Box<Self>) -> Result<Harvest> {
        match self.current {
            Some(entry) if entry.number == self.target => Ok(Harvest::Single(entry)),
            // Source exhausted before the target number came by.
            _ => Err(Error::EntryNotFound {
                number: self.target,
            }),
        }
    }
}

/// Collects every committed entry
struct AllKeeper {
    capacity: usize,
    entries: Vec<HistoryEntry>,
}

impl Keeper for AllKeeper {
    fn init(&mut self) {
        // Growth past the initial capacity is amortized by Vec; the
        // pre-size only tunes the common case.
        self.entries = Vec::with_capacity(self.capacity);
    }

    fn commit(&mut self, entry: HistoryEntry, feed: &CorrelationFeed) {
        feed.push(&entry);
        self.entries.push(entry);
    }

    fn wants_more(&self) -> bool {
        true
    }

    fn harvest(self: Box<Self>) -> Result<Harvest> {
        Ok(Harvest::Entries(self.entries))
    }
}

/// Collects the entries at stream positions `start..=finish`
struct RangeKeeper {
    start: usize,
    finish: usize,
    index: usize,
    entries: Vec<HistoryEntry>,
}

impl Keeper for RangeKeeper {
    fn init(&mut self) {
        let capacity = if self.start > self.finish {
            // Inverted bounds collect nothing.
            0
        } else {
            self.finish - self.start + 1
        };
        self.entries = Vec::with_capacity(capacity);
        self.index = 0;
    }

    fn commit(&mut self, entry: HistoryEntry, feed: &CorrelationFeed) {
        feed.push(&entry);
        if (self.start..=self.finish).contains(&self.index) {
            self.entries.push(entry);
        }
        self.index += 1;
    }

    fn wants_more(&self) -> bool {
        self.index <= self.finish
    }

    fn harvest(self: Box<Self>) -> Result<Harvest> {
        Ok(Harvest::Entries(self.entries))
    }
}

/// Select the keeper implementation for a retrieval mode.
///
/// `capacity` is the initial buffer size used by [`RetrievalMode::All`];
/// other modes size themselves.
pub fn keeper_for(mode: RetrievalMode, capacity: usize) -> Box<dyn Keeper> {
    match mode {
        RetrievalMode::Single => Box::new(SingleKeeper { current: None }),
        RetrievalMode::PreciseNumber(target) => Box::new(PreciseNumberKeeper {
            current: None,
            target,
        }),
        RetrievalMode::All => Box::new(AllKeeper {
            capacity,
            entries: Vec::new(),
        }),
        RetrievalMode::Range { start, finish } => Box::new(RangeKeeper {
            start,
            finish,
            index: 0,
            entries: Vec::new(),
        }),
    }
}
