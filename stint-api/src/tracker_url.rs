use std::env;

use crate::TaskScope;

/// Base URL of the platform API plus path-building helpers.
#[derive(Debug, Clone)]
pub struct TrackerUrl(String);

impl AsRef<str> for TrackerUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TrackerUrl {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into().trim_end_matches('/').to_string())
    }

    /// Creates a new TrackerUrl from the environment variable `STINT_API_URL`.
    pub fn from_env() -> Self {
        Self::new(env::var("STINT_API_URL").expect("STINT_API_URL must be set in env"))
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }

    /// Root of the time-tracking endpoints for one task. The server expects
    /// the trailing slash.
    pub fn time_tracking(&self, scope: &TaskScope) -> Self {
        self.append_path(&format!(
            "api/v1/workspaces/{}/projects/{}/issues/{}/time-tracking/",
            scope.workspace_slug, scope.project_id, scope.issue_id
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope() -> TaskScope {
        TaskScope::new("acme", "proj-1", "issue-9")
    }

    #[test]
    fn time_tracking_root_is_scoped() {
        let url = TrackerUrl::new("https://api.example.com/").time_tracking(&scope());
        assert_eq!(
            url.as_ref(),
            "https://api.example.com/api/v1/workspaces/acme/projects/proj-1/issues/issue-9/time-tracking/"
        );
    }

    #[test]
    fn append_path_keeps_single_separator() {
        let url = TrackerUrl::new("https://api.example.com")
            .time_tracking(&scope())
            .append_path("summary/");
        assert!(url.as_ref().ends_with("/time-tracking/summary/"));
        assert!(!url.as_ref().contains("//summary"));
    }
}
