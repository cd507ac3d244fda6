#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic analytics system that folds world events into session statistics.

mod stats;

use lone_tower_core::Event;

pub use stats::SessionStats;

/// Pure analytics system that accumulates statistics for the current session.
#[derive(Debug, Default)]
pub struct Analytics {
    stats: SessionStats,
}

impl Analytics {
    /// Creates a new analytics system with zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Statistics gathered since the session started or was last reset.
    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Consumes the events emitted by the world during one update.
    ///
    /// `Event::SessionReset` discards everything observed so far.
    pub fn handle(&mut self, events: &[Event]) {
        for event in events {
            if matches!(event, Event::SessionReset) {
                self.stats = SessionStats::default();
            } else {
                self.stats.record(event);
            }
        }
    }
}
