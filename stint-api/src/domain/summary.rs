use serde::{Deserialize, Serialize};

use super::TimeTrackingEntry;

/// Authoritative aggregate of one task's tracked time, as served by
/// `GET …/time-tracking/summary/`.
///
/// `running_entry_id` is present exactly when `is_timer_running` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTrackingSummary {
    pub total_seconds: u64,
    /// Server-derived display string; never used for arithmetic.
    pub formatted_total: String,
    pub entry_count: u32,
    pub is_timer_running: bool,
    pub running_entry_id: Option<String>,
}

impl TimeTrackingSummary {
    /// The entry this summary says is running, if the given list has it.
    pub fn running_entry<'a>(
        &self,
        entries: &'a [TimeTrackingEntry],
    ) -> Option<&'a TimeTrackingEntry> {
        let id = self.running_entry_id.as_deref()?;
        entries.iter().find(|e| e.id == id && e.is_running)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_stopped_summary() {
        let summary: TimeTrackingSummary = serde_json::from_str(
            r#"{
                "total_seconds": 120,
                "formatted_total": "00:02:00",
                "entry_count": 3,
                "is_timer_running": false,
                "running_entry_id": null
            }"#,
        )
        .unwrap();

        assert_eq!(summary.total_seconds, 120);
        assert!(!summary.is_timer_running);
        assert!(summary.running_entry_id.is_none());
    }

    #[test]
    fn running_entry_resolves_against_entry_list() {
        let summary: TimeTrackingSummary = serde_json::from_str(
            r#"{
                "total_seconds": 120,
                "formatted_total": "00:02:00",
                "entry_count": 1,
                "is_timer_running": true,
                "running_entry_id": "e1"
            }"#,
        )
        .unwrap();
        let entries: Vec<TimeTrackingEntry> = serde_json::from_str(
            r#"[{
                "id": "e1",
                "start_time": "2026-08-29T09:00:00Z",
                "duration_seconds": 120,
                "formatted_duration": "00:02:00",
                "is_running": true,
                "user_name": "ada"
            }]"#,
        )
        .unwrap();

        let running = summary.running_entry(&entries).unwrap();
        assert_eq!(running.id, "e1");
    }

    #[test]
    fn running_entry_is_none_when_stopped() {
        let summary = TimeTrackingSummary {
            total_seconds: 0,
            formatted_total: "00:00:00".to_string(),
            entry_count: 0,
            is_timer_running: false,
            running_entry_id: None,
        };
        assert!(summary.running_entry(&[]).is_none());
    }
}
