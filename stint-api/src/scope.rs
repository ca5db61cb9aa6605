use std::fmt;

/// Identifies one task's time-tracking surface on the platform.
///
/// Every request in this crate is scoped by one of these, and the
/// reconciliation engine owns exactly one per instance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TaskScope {
    pub workspace_slug: String,
    pub project_id: String,
    pub issue_id: String,
}

impl TaskScope {
    pub fn new(
        workspace_slug: impl Into<String>,
        project_id: impl Into<String>,
        issue_id: impl Into<String>,
    ) -> Self {
        Self {
            workspace_slug: workspace_slug.into(),
            project_id: project_id.into(),
            issue_id: issue_id.into(),
        }
    }
}

impl fmt::Display for TaskScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{}/{}",
            self.workspace_slug, self.project_id, self.issue_id
        )
    }
}
