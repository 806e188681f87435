//! Per-location clipboard history.

use cliprelay_types::ClipboardEntry;
use dashmap::DashMap;

/// Maximum entries kept per location.
///
/// The cap is only checked when a genuinely new entry is inserted, and it
/// keeps 6 elements even though the check fires at 5. This reproduces the
/// long-standing behavior clients were written against; see the design
/// notes in DESIGN.md before "fixing" it.
pub const HISTORY_CAP: usize = 6;

/// Bounded, deduplicating, most-recent-first clipboard log per console
/// location. The store is the sole owner of each sequence; callers get
/// snapshots and never mutate them in place.
#[derive(Default)]
pub struct ClipboardHistoryStore {
    histories: DashMap<String, Vec<ClipboardEntry>>,
}

impl ClipboardHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `entry` for `location` and return the updated history.
    ///
    /// A duplicate (kind, content) moves to the front, preserving the
    /// relative order of everything else; a new entry is prepended and the
    /// sequence truncated to [`HISTORY_CAP`]. The entry lock is held for
    /// the whole update, so each record is atomic per location.
    pub fn record(&self, location: &str, entry: ClipboardEntry) -> Vec<ClipboardEntry> {
        let mut history = self.histories.entry(location.to_string()).or_default();

        match history.iter().position(|e| *e == entry) {
            Some(i) => {
                history.remove(i);
                history.insert(0, entry);
            }
            None => {
                history.insert(0, entry);
                if history.len() > HISTORY_CAP - 1 {
                    history.truncate(HISTORY_CAP);
                }
            }
        }

        history.clone()
    }

    /// Current history for `location`, empty if nothing was ever recorded.
    pub fn snapshot(&self, location: &str) -> Vec<ClipboardEntry> {
        self.histories
            .get(location)
            .map(|h| h.clone())
            .unwrap_or_default()
    }
}
