use stint_api::domain::TimeTrackingEntry;

use crate::format_duration;

/// What the engine publishes to presentation adapters.
///
/// `elapsed_seconds` is the locally ticked counter while a timer is
/// running and the authoritative total otherwise. `entries` is always the
/// last successful fetch, never locally mutated in place.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TimerSnapshot {
    pub elapsed_seconds: u64,
    pub is_running: bool,
    pub entries: Vec<TimeTrackingEntry>,
    pub entry_count: u32,
    /// False until the first successful summary response arrives.
    pub hydrated: bool,
}

impl TimerSnapshot {
    /// Elapsed time as `HH:MM:SS`, for adapters that just want the string.
    pub fn formatted_elapsed(&self) -> String {
        format_duration(self.elapsed_seconds)
    }
}
