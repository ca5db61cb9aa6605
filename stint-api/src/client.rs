use std::sync::Arc;

use reqwest::{cookie::Jar, Client, Response, StatusCode, Url};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::{
    domain::{NewManualEntry, TimeTrackingEntry, TimeTrackingSummary},
    TaskScope, TrackerUrl,
};

/// Name of the platform session cookie sent with every request.
const SESSION_COOKIE: &str = "session-id";

/// HTTP client for the platform's per-task time-tracking endpoints.
///
/// Holds the session cookie in a jar so all calls are authenticated the
/// same way the web client is (`credentials: include`). Cloneable; clones
/// share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct TrackerClient {
    client: Client,
    base_url: TrackerUrl,
}

impl TrackerClient {
    pub fn new(base_url: TrackerUrl, session_id: &str) -> Result<Self, FetchError> {
        let url = Url::parse(base_url.as_ref())
            .map_err(|e| FetchError::Other(format!("invalid base URL: {}", e)))?;

        let jar = Arc::new(Jar::default());
        jar.add_cookie_str(
            &format!("{}={}; Path=/", SESSION_COOKIE, session_id),
            &url,
        );

        let client = Client::builder()
            .cookie_provider(jar)
            .build()
            .map_err(|e| FetchError::Other(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, base_url })
    }

    async fn fetch<T: DeserializeOwned>(&self, url: impl AsRef<str>) -> Result<T, FetchError> {
        let resp = self
            .client
            .get(url.as_ref())
            .send()
            .await
            .map_err(|e| FetchError::Response(e.to_string()))?;
        let resp = check_status(resp)?;

        resp.json::<T>().await.map_err(|e| {
            FetchError::Parsing(format!("failed to parse response as JSON: {}", e))
        })
    }

    async fn post_empty(&self, url: impl AsRef<str>) -> Result<(), FetchError> {
        let resp = self
            .client
            .post(url.as_ref())
            .send()
            .await
            .map_err(|e| FetchError::Response(e.to_string()))?;
        check_status(resp)?;
        Ok(())
    }

    async fn post_json<B: Serialize>(
        &self,
        url: impl AsRef<str>,
        body: &B,
    ) -> Result<(), FetchError> {
        let resp = self
            .client
            .post(url.as_ref())
            .json(body)
            .send()
            .await
            .map_err(|e| FetchError::Response(e.to_string()))?;
        check_status(resp)?;
        Ok(())
    }

    /// `GET …/time-tracking/summary/` — the poll target.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_summary(
        &self,
        scope: &TaskScope,
    ) -> Result<TimeTrackingSummary, FetchError> {
        let url = self.base_url.time_tracking(scope).append_path("summary/");
        self.fetch(url).await
    }

    /// `GET …/time-tracking/` — entry list, most-recent-first.
    #[tracing::instrument(skip(self))]
    pub async fn fetch_entries(
        &self,
        scope: &TaskScope,
    ) -> Result<Vec<TimeTrackingEntry>, FetchError> {
        let url = self.base_url.time_tracking(scope);
        self.fetch(url).await
    }

    /// `POST …/time-tracking/start/`. Fails if a timer is already running
    /// on this task; the server enforces that, not us.
    #[tracing::instrument(skip(self))]
    pub async fn start_timer(&self, scope: &TaskScope) -> Result<(), FetchError> {
        let url = self.base_url.time_tracking(scope).append_path("start/");
        self.post_empty(url).await
    }

    /// `POST …/time-tracking/stop/`. No-op safe against an already-stopped
    /// timer.
    #[tracing::instrument(skip(self))]
    pub async fn stop_timer(&self, scope: &TaskScope) -> Result<(), FetchError> {
        let url = self.base_url.time_tracking(scope).append_path("stop/");
        self.post_empty(url).await
    }

    /// `POST …/time-tracking/manual/` — create a closed entry.
    #[tracing::instrument(skip(self))]
    pub async fn add_manual_entry(
        &self,
        scope: &TaskScope,
        entry: &NewManualEntry,
    ) -> Result<(), FetchError> {
        let url = self.base_url.time_tracking(scope).append_path("manual/");
        self.post_json(url, entry).await
    }
}

fn check_status(resp: Response) -> Result<Response, FetchError> {
    match resp.status() {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(FetchError::Unauthorized),
        status if !status.is_success() => {
            Err(FetchError::Response(format!("server returned {}", status)))
        }
        _ => Ok(resp),
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("ResponseError: {0}")]
    Response(String),
    #[error("ParsingError: {0}")]
    Parsing(String),
    #[error("Other: {0}")]
    Other(String),
}
