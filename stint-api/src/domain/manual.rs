use serde::{Deserialize, Serialize};

/// Body of `POST …/time-tracking/manual/`, creating a closed entry with a
/// caller-supplied duration.
///
/// Hours and minutes pass through unclamped; the server validates them.
/// The web client always posts zero seconds, and so do we.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewManualEntry {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
}

impl NewManualEntry {
    pub fn new(hours: u32, minutes: u32, description: Option<String>) -> Self {
        Self {
            hours,
            minutes,
            seconds: 0,
            description,
        }
    }

    /// The duration this entry will be stored with.
    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * 3600 + u64::from(self.minutes) * 60 + u64::from(self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_zero_seconds() {
        let entry = NewManualEntry::new(1, 30, Some("research".to_string()));
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"hours": 1, "minutes": 30, "seconds": 0, "description": "research"})
        );
    }

    #[test]
    fn omits_absent_description() {
        let entry = NewManualEntry::new(0, 5, None);
        assert_eq!(
            serde_json::to_value(&entry).unwrap(),
            json!({"hours": 0, "minutes": 5, "seconds": 0})
        );
    }

    #[test]
    fn total_seconds_does_not_clamp_minutes() {
        // Minutes are conventionally 0-59 but pass through as given.
        assert_eq!(NewManualEntry::new(1, 30, None).total_seconds(), 5400);
        assert_eq!(NewManualEntry::new(0, 90, None).total_seconds(), 5400);
    }
}
