use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// One discrete tracked interval: a timer session or a manual addition.
///
/// At most one entry per task has `is_running = true`, and that entry's id
/// matches the summary's `running_entry_id`. The server owns that
/// invariant; clients only observe it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeTrackingEntry {
    pub id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub start_time: OffsetDateTime,
    /// Absent while the entry is still running.
    #[serde(with = "time::serde::rfc3339::option", default)]
    pub end_time: Option<OffsetDateTime>,
    /// Frozen once `end_time` is set. For a running entry this is the
    /// server's last-known value, not a live counter.
    pub duration_seconds: u64,
    /// Server-derived display string; never used for arithmetic.
    pub formatted_duration: String,
    #[serde(default)]
    pub description: Option<String>,
    pub is_running: bool,
    pub user_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_running_entry_without_end_time() {
        let entry: TimeTrackingEntry = serde_json::from_str(
            r#"{
                "id": "e1",
                "start_time": "2026-08-29T09:00:00Z",
                "duration_seconds": 42,
                "formatted_duration": "00:00:42",
                "is_running": true,
                "user_name": "ada"
            }"#,
        )
        .unwrap();

        assert!(entry.is_running);
        assert!(entry.end_time.is_none());
        assert!(entry.description.is_none());
        assert_eq!(entry.duration_seconds, 42);
    }

    #[test]
    fn deserializes_closed_entry() {
        let entry: TimeTrackingEntry = serde_json::from_str(
            r#"{
                "id": "e2",
                "start_time": "2026-08-29T09:00:00Z",
                "end_time": "2026-08-29T10:30:00Z",
                "duration_seconds": 5400,
                "formatted_duration": "01:30:00",
                "description": "research",
                "is_running": false,
                "user_name": "ada"
            }"#,
        )
        .unwrap();

        assert!(!entry.is_running);
        assert!(entry.end_time.is_some());
        assert_eq!(entry.description.as_deref(), Some("research"));
        assert_eq!(entry.duration_seconds, 5400);
    }
}
