use tracing::{debug, warn};

use stint_api::domain::{TimeTrackingEntry, TimeTrackingSummary};

use crate::{provider::ProviderError, TimerSnapshot};

/// Whether the local clock is advancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ClockState {
    Idle,
    Ticking,
}

/// The summary cache, entry list, and local clock counter, plus the
/// reconciliation rules that govern how fetched state replaces them.
///
/// Pure state transitions; the actor in `engine.rs` drives this from
/// timers and channels, so the rules stay testable without a runtime.
/// Every fetched response carries a monotonic sequence number, and a
/// response older than the last applied one is discarded rather than
/// allowed to overwrite newer state.
#[derive(Debug)]
pub(crate) struct EngineState {
    summary: Option<TimeTrackingSummary>,
    entries: Vec<TimeTrackingEntry>,
    elapsed_seconds: u64,
    clock: ClockState,
    last_summary_seq: u64,
    last_entries_seq: u64,
}

impl EngineState {
    pub(crate) fn new() -> Self {
        Self {
            summary: None,
            entries: Vec::new(),
            elapsed_seconds: 0,
            clock: ClockState::Idle,
            last_summary_seq: 0,
            last_entries_seq: 0,
        }
    }

    pub(crate) fn clock(&self) -> ClockState {
        self.clock
    }

    /// Advance the local clock one second. Display smoothing only: the
    /// next applied summary discards whatever this accumulates.
    pub(crate) fn tick(&mut self) {
        if self.clock == ClockState::Ticking {
            self.elapsed_seconds += 1;
        }
    }

    /// Replace the cached summary wholesale and reseed the local clock
    /// from the fresh authoritative total.
    ///
    /// Returns true when the summary was taken (fresh and parsed); the
    /// caller restarts the tick schedule off the reseeded value then.
    /// Stale and failed responses leave the cache untouched.
    pub(crate) fn apply_summary(
        &mut self,
        seq: u64,
        result: Result<TimeTrackingSummary, ProviderError>,
    ) -> bool {
        match result {
            Ok(summary) => {
                if seq < self.last_summary_seq {
                    debug!(seq, last = self.last_summary_seq, "discarding stale summary");
                    return false;
                }
                self.last_summary_seq = seq;

                self.elapsed_seconds = summary.total_seconds;
                self.clock = if summary.is_timer_running {
                    ClockState::Ticking
                } else {
                    ClockState::Idle
                };
                self.summary = Some(summary);
                true
            }
            Err(err) => {
                // Transient: keep the last good value and let the next
                // scheduled poll retry.
                warn!(seq, "summary fetch failed, keeping stale cache: {}", err);
                false
            }
        }
    }

    /// Replace the entry list wholesale.
    pub(crate) fn apply_entries(
        &mut self,
        seq: u64,
        result: Result<Vec<TimeTrackingEntry>, ProviderError>,
    ) {
        match result {
            Ok(entries) => {
                if seq < self.last_entries_seq {
                    debug!(seq, last = self.last_entries_seq, "discarding stale entry list");
                    return;
                }
                self.last_entries_seq = seq;
                self.entries = entries;
            }
            Err(err) => {
                warn!(seq, "entry list fetch failed, keeping stale list: {}", err);
            }
        }
    }

    /// Project the current state for presentation adapters.
    pub(crate) fn snapshot(&self) -> TimerSnapshot {
        match &self.summary {
            Some(summary) => TimerSnapshot {
                elapsed_seconds: self.elapsed_seconds,
                is_running: summary.is_timer_running,
                entries: self.entries.clone(),
                entry_count: summary.entry_count,
                hydrated: true,
            },
            None => TimerSnapshot {
                entries: self.entries.clone(),
                ..TimerSnapshot::default()
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{closed_entry, running_summary, stopped_summary};

    #[test]
    fn starts_empty_and_unhydrated() {
        let state = EngineState::new();
        let snapshot = state.snapshot();
        assert!(!snapshot.hydrated);
        assert!(!snapshot.is_running);
        assert_eq!(snapshot.elapsed_seconds, 0);
        assert!(snapshot.entries.is_empty());
    }

    #[test]
    fn stopped_summary_pins_display_and_disables_ticking() {
        let mut state = EngineState::new();
        let applied = state.apply_summary(1, Ok(stopped_summary(120, 2)));

        assert!(applied);
        assert_eq!(state.clock(), ClockState::Idle);
        let snapshot = state.snapshot();
        assert!(snapshot.hydrated);
        assert_eq!(snapshot.elapsed_seconds, 120);
        assert_eq!(snapshot.formatted_elapsed(), "00:02:00");
        assert_eq!(snapshot.entry_count, 2);

        // Ticks while idle are no-ops.
        state.tick();
        assert_eq!(state.snapshot().elapsed_seconds, 120);
    }

    #[test]
    fn running_summary_seeds_counter_and_ticks() {
        let mut state = EngineState::new();
        assert!(state.apply_summary(1, Ok(running_summary(120, 1, "e1"))));
        assert_eq!(state.clock(), ClockState::Ticking);

        state.tick();
        state.tick();
        state.tick();
        let snapshot = state.snapshot();
        assert!(snapshot.is_running);
        assert_eq!(snapshot.formatted_elapsed(), "00:02:03");
    }

    #[test]
    fn fresh_poll_discards_local_drift() {
        let mut state = EngineState::new();
        state.apply_summary(1, Ok(running_summary(120, 1, "e1")));
        state.tick();
        state.tick();
        state.tick();

        // Still running: the reseed overrides the +3, never adds to it.
        assert!(state.apply_summary(2, Ok(running_summary(130, 1, "e1"))));
        assert_eq!(state.snapshot().elapsed_seconds, 130);
        assert_eq!(state.snapshot().formatted_elapsed(), "00:02:10");
    }

    #[test]
    fn stop_discards_local_overshoot() {
        let mut state = EngineState::new();
        state.apply_summary(1, Ok(running_summary(120, 1, "e1")));
        state.tick();
        state.tick();

        state.apply_summary(2, Ok(stopped_summary(125, 2)));
        assert_eq!(state.clock(), ClockState::Idle);
        assert_eq!(state.snapshot().elapsed_seconds, 125);
        assert!(!state.snapshot().is_running);
    }

    #[test]
    fn failed_summary_keeps_last_good_value() {
        let mut state = EngineState::new();
        state.apply_summary(1, Ok(stopped_summary(120, 2)));
        let before = state.snapshot();

        state.apply_summary(2, Err(ProviderError::Request("boom".to_string())));
        assert_eq!(state.snapshot(), before);
    }

    #[test]
    fn malformed_summary_is_treated_as_transient() {
        let mut state = EngineState::new();
        state.apply_summary(1, Ok(stopped_summary(120, 2)));
        let before = state.snapshot();

        // An unparseable body is skipped like any other failed poll.
        assert!(!state.apply_summary(2, Err(ProviderError::Malformed("not json".to_string()))));
        assert_eq!(state.snapshot(), before);

        // The sequence slot stays open for the retry.
        assert!(state.apply_summary(2, Ok(stopped_summary(125, 2))));
        assert_eq!(state.snapshot().elapsed_seconds, 125);
    }

    #[test]
    fn failed_entry_list_keeps_last_good_list() {
        let mut state = EngineState::new();
        state.apply_entries(1, Ok(vec![closed_entry("e1", 60)]));
        state.apply_entries(2, Err(ProviderError::Request("boom".to_string())));

        assert_eq!(state.snapshot().entries.len(), 1);
        assert_eq!(state.snapshot().entries[0].id, "e1");
    }

    #[test]
    fn stale_summary_is_discarded() {
        let mut state = EngineState::new();
        state.apply_summary(2, Ok(stopped_summary(130, 3)));
        // An older response arriving late must not overwrite the newer one.
        state.apply_summary(1, Ok(stopped_summary(120, 2)));

        assert_eq!(state.snapshot().elapsed_seconds, 130);
        assert_eq!(state.snapshot().entry_count, 3);
    }

    #[test]
    fn stale_entry_list_is_discarded() {
        let mut state = EngineState::new();
        state.apply_entries(2, Ok(vec![closed_entry("e1", 60), closed_entry("e2", 30)]));
        state.apply_entries(1, Ok(vec![closed_entry("e1", 60)]));

        assert_eq!(state.snapshot().entries.len(), 2);
    }

    #[test]
    fn entry_list_is_replaced_wholesale() {
        let mut state = EngineState::new();
        state.apply_entries(1, Ok(vec![closed_entry("e1", 60)]));
        state.apply_entries(2, Ok(vec![closed_entry("e2", 30)]));

        let entries = &state.snapshot().entries;
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].id, "e2");
    }

    #[test]
    fn apply_reports_whether_summary_was_taken() {
        let mut state = EngineState::new();
        assert!(state.apply_summary(2, Ok(stopped_summary(15, 1))));
        assert!(!state.apply_summary(1, Ok(running_summary(10, 1, "e1"))));
        assert!(!state.apply_summary(3, Err(ProviderError::Request("boom".to_string()))));
        assert!(state.apply_summary(3, Ok(running_summary(15, 2, "e2"))));
    }
}
