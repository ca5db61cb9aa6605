//! Mock provider implementation for headless engine tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::macros::datetime;
use time::OffsetDateTime;

use stint_api::domain::{NewManualEntry, TimeTrackingEntry, TimeTrackingSummary};

use super::{ProviderError, TimeTrackingProvider};

/// Scriptable provider for driving the engine without a server.
///
/// Serves whatever summary and entry list were last scripted, counts every
/// call, and can be told to fail the next fetch or reject a mutation.
/// Cloneable; clones share state so a test can re-script mid-run.
#[derive(Clone, Default)]
pub struct MockProvider {
    inner: Arc<MockInner>,
}

struct MockInner {
    summary: Mutex<TimeTrackingSummary>,
    entries: Mutex<Vec<TimeTrackingEntry>>,
    fail_next_summary: AtomicBool,
    fail_next_entries: AtomicBool,
    reject_start: Mutex<Option<String>>,
    reject_stop: Mutex<Option<String>>,
    reject_manual: Mutex<Option<String>>,
    summary_calls: AtomicUsize,
    entries_calls: AtomicUsize,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    manual_calls: AtomicUsize,
    manual_received: Mutex<Vec<NewManualEntry>>,
}

impl Default for MockInner {
    fn default() -> Self {
        Self {
            summary: Mutex::new(stopped_summary(0, 0)),
            entries: Mutex::new(Vec::new()),
            fail_next_summary: AtomicBool::new(false),
            fail_next_entries: AtomicBool::new(false),
            reject_start: Mutex::new(None),
            reject_stop: Mutex::new(None),
            reject_manual: Mutex::new(None),
            summary_calls: AtomicUsize::new(0),
            entries_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            manual_calls: AtomicUsize::new(0),
            manual_received: Mutex::new(Vec::new()),
        }
    }
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that serves the given summary from the first poll.
    pub fn returning(summary: TimeTrackingSummary) -> Self {
        let mock = Self::new();
        mock.set_summary(summary);
        mock
    }

    /// Replace the summary served to subsequent fetches.
    pub fn set_summary(&self, summary: TimeTrackingSummary) {
        *self.inner.summary.lock().expect("mock lock poisoned") = summary;
    }

    /// Replace the entry list served to subsequent fetches.
    pub fn set_entries(&self, entries: Vec<TimeTrackingEntry>) {
        *self.inner.entries.lock().expect("mock lock poisoned") = entries;
    }

    /// Make the next summary fetch fail with a request error.
    pub fn fail_next_summary(&self) {
        self.inner.fail_next_summary.store(true, Ordering::SeqCst);
    }

    /// Make the next entry-list fetch fail with a request error.
    pub fn fail_next_entries(&self) {
        self.inner.fail_next_entries.store(true, Ordering::SeqCst);
    }

    /// Reject every `start_timer` call with the given message.
    pub fn reject_start(&self, message: impl Into<String>) {
        *self.inner.reject_start.lock().expect("mock lock poisoned") = Some(message.into());
    }

    /// Reject every `stop_timer` call with the given message.
    pub fn reject_stop(&self, message: impl Into<String>) {
        *self.inner.reject_stop.lock().expect("mock lock poisoned") = Some(message.into());
    }

    /// Reject every `add_manual_entry` call with the given message.
    pub fn reject_manual(&self, message: impl Into<String>) {
        *self.inner.reject_manual.lock().expect("mock lock poisoned") = Some(message.into());
    }

    pub fn summary_calls(&self) -> usize {
        self.inner.summary_calls.load(Ordering::SeqCst)
    }

    pub fn entries_calls(&self) -> usize {
        self.inner.entries_calls.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.inner.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.inner.stop_calls.load(Ordering::SeqCst)
    }

    pub fn manual_calls(&self) -> usize {
        self.inner.manual_calls.load(Ordering::SeqCst)
    }

    /// Manual-entry payloads received so far, in call order.
    pub fn manual_received(&self) -> Vec<NewManualEntry> {
        self.inner
            .manual_received
            .lock()
            .expect("mock lock poisoned")
            .clone()
    }
}

#[async_trait]
impl TimeTrackingProvider for MockProvider {
    async fn fetch_summary(&self) -> Result<TimeTrackingSummary, ProviderError> {
        self.inner.summary_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_next_summary.swap(false, Ordering::SeqCst) {
            return Err(ProviderError::Request("scripted failure".to_string()));
        }
        Ok(self.inner.summary.lock().expect("mock lock poisoned").clone())
    }

    async fn fetch_entries(&self) -> Result<Vec<TimeTrackingEntry>, ProviderError> {
        self.inner.entries_calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.fail_next_entries.swap(false, Ordering::SeqCst) {
            return Err(ProviderError::Request("scripted failure".to_string()));
        }
        Ok(self.inner.entries.lock().expect("mock lock poisoned").clone())
    }

    async fn start_timer(&self) -> Result<(), ProviderError> {
        self.inner.start_calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.reject_start.lock().expect("mock lock poisoned").clone() {
            Some(message) => Err(ProviderError::Request(message)),
            None => Ok(()),
        }
    }

    async fn stop_timer(&self) -> Result<(), ProviderError> {
        self.inner.stop_calls.fetch_add(1, Ordering::SeqCst);
        match self.inner.reject_stop.lock().expect("mock lock poisoned").clone() {
            Some(message) => Err(ProviderError::Request(message)),
            None => Ok(()),
        }
    }

    async fn add_manual_entry(&self, entry: &NewManualEntry) -> Result<(), ProviderError> {
        self.inner.manual_calls.fetch_add(1, Ordering::SeqCst);
        self.inner
            .manual_received
            .lock()
            .expect("mock lock poisoned")
            .push(entry.clone());
        match self.inner.reject_manual.lock().expect("mock lock poisoned").clone() {
            Some(message) => Err(ProviderError::Request(message)),
            None => Ok(()),
        }
    }
}

/// A summary with no running timer.
pub fn stopped_summary(total_seconds: u64, entry_count: u32) -> TimeTrackingSummary {
    TimeTrackingSummary {
        total_seconds,
        formatted_total: crate::format_duration(total_seconds),
        entry_count,
        is_timer_running: false,
        running_entry_id: None,
    }
}

/// A summary whose timer is running on the given entry.
pub fn running_summary(
    total_seconds: u64,
    entry_count: u32,
    running_entry_id: &str,
) -> TimeTrackingSummary {
    TimeTrackingSummary {
        total_seconds,
        formatted_total: crate::format_duration(total_seconds),
        entry_count,
        is_timer_running: true,
        running_entry_id: Some(running_entry_id.to_string()),
    }
}

const ENTRY_EPOCH: OffsetDateTime = datetime!(2026-08-29 09:00 UTC);

/// A closed entry with the given duration.
pub fn closed_entry(id: &str, duration_seconds: u64) -> TimeTrackingEntry {
    TimeTrackingEntry {
        id: id.to_string(),
        start_time: ENTRY_EPOCH,
        end_time: Some(ENTRY_EPOCH + time::Duration::seconds(duration_seconds as i64)),
        duration_seconds,
        formatted_duration: crate::format_duration(duration_seconds),
        description: None,
        is_running: false,
        user_name: "mock".to_string(),
    }
}

/// A still-running entry whose stored duration is the server's last-known
/// value.
pub fn running_entry(id: &str, duration_seconds: u64) -> TimeTrackingEntry {
    TimeTrackingEntry {
        id: id.to_string(),
        start_time: ENTRY_EPOCH,
        end_time: None,
        duration_seconds,
        formatted_duration: crate::format_duration(duration_seconds),
        description: None,
        is_running: true,
        user_name: "mock".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_scripted_summary_and_counts_calls() {
        let mock = MockProvider::returning(running_summary(120, 1, "e1"));

        let first = mock.fetch_summary().await.unwrap();
        assert!(first.is_timer_running);
        assert_eq!(first.total_seconds, 120);

        mock.set_summary(stopped_summary(130, 2));
        let second = mock.fetch_summary().await.unwrap();
        assert!(!second.is_timer_running);
        assert_eq!(mock.summary_calls(), 2);
    }

    #[tokio::test]
    async fn fail_next_summary_is_one_shot() {
        let mock = MockProvider::new();
        mock.fail_next_summary();

        assert!(mock.fetch_summary().await.is_err());
        assert!(mock.fetch_summary().await.is_ok());
        assert_eq!(mock.summary_calls(), 2);
    }

    #[tokio::test]
    async fn scripted_rejection_still_records_payload() {
        let mock = MockProvider::new();
        mock.reject_manual("task is read-only");

        let entry = NewManualEntry::new(1, 30, Some("research".to_string()));
        assert!(mock.add_manual_entry(&entry).await.is_err());
        assert_eq!(mock.manual_received(), vec![entry]);
    }
}
