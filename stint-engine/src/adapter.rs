use async_trait::async_trait;

use stint_api::{
    domain::{NewManualEntry, TimeTrackingEntry, TimeTrackingSummary},
    FetchError, TaskScope, TrackerClient,
};

use crate::provider::{ProviderError, TimeTrackingProvider};

/// A `stint-api` client bound to one task, usable as the engine's
/// provider.
#[derive(Debug, Clone)]
pub struct ScopedTracker {
    client: TrackerClient,
    scope: TaskScope,
}

impl ScopedTracker {
    pub fn new(client: TrackerClient, scope: TaskScope) -> Self {
        Self { client, scope }
    }

    pub fn scope(&self) -> &TaskScope {
        &self.scope
    }
}

#[async_trait]
impl TimeTrackingProvider for ScopedTracker {
    async fn fetch_summary(&self) -> Result<TimeTrackingSummary, ProviderError> {
        self.client
            .fetch_summary(&self.scope)
            .await
            .map_err(Into::into)
    }

    async fn fetch_entries(&self) -> Result<Vec<TimeTrackingEntry>, ProviderError> {
        self.client
            .fetch_entries(&self.scope)
            .await
            .map_err(Into::into)
    }

    async fn start_timer(&self) -> Result<(), ProviderError> {
        self.client.start_timer(&self.scope).await.map_err(Into::into)
    }

    async fn stop_timer(&self) -> Result<(), ProviderError> {
        self.client.stop_timer(&self.scope).await.map_err(Into::into)
    }

    async fn add_manual_entry(&self, entry: &NewManualEntry) -> Result<(), ProviderError> {
        self.client
            .add_manual_entry(&self.scope, entry)
            .await
            .map_err(Into::into)
    }
}

impl From<FetchError> for ProviderError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::Unauthorized => ProviderError::Unauthorized,
            FetchError::Parsing(msg) => ProviderError::Malformed(msg),
            FetchError::Response(msg) | FetchError::Other(msg) => ProviderError::Request(msg),
        }
    }
}
