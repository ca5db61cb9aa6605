mod mock;

pub use mock::{closed_entry, running_entry, running_summary, stopped_summary, MockProvider};

use async_trait::async_trait;
use thiserror::Error;

use stint_api::domain::{NewManualEntry, TimeTrackingEntry, TimeTrackingSummary};

/// Outbound port for the remote time-tracking store.
///
/// One provider instance is already scoped to a single task, so no
/// identifiers are passed per call. The remote store is the sole source of
/// truth; everything the engine holds is a disposable projection of what
/// these methods return.
#[async_trait]
pub trait TimeTrackingProvider: Send + Sync + 'static {
    /// Authoritative aggregate for the task. The engine polls this.
    async fn fetch_summary(&self) -> Result<TimeTrackingSummary, ProviderError>;

    /// Entry list, most-recent-first.
    async fn fetch_entries(&self) -> Result<Vec<TimeTrackingEntry>, ProviderError>;

    /// Ask the store to open a new running entry. Fails when one is
    /// already running; the store enforces that invariant, not the client.
    async fn start_timer(&self) -> Result<(), ProviderError>;

    /// Close the running entry if there is one. No-op safe.
    async fn stop_timer(&self) -> Result<(), ProviderError>;

    /// Create a closed entry with a caller-supplied duration.
    async fn add_manual_entry(&self, entry: &NewManualEntry) -> Result<(), ProviderError>;
}

/// Errors a provider can return.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("request failed: {0}")]
    Request(String),
    #[error("malformed response: {0}")]
    Malformed(String),
}
