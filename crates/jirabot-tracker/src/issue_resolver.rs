use async_trait::async_trait;

use crate::{Issue, JiraApiClient, TrackerError};

#[async_trait]
/// Trait contract for `IssueResolver` behavior.
///
/// Every call is an independent lookup; implementations must be safe to share
/// across concurrently running message tasks.
pub trait IssueResolver: Send + Sync {
    async fn resolve(&self, issue_key: &str) -> Result<Issue, TrackerError>;
}

#[async_trait]
impl IssueResolver for JiraApiClient {
    async fn resolve(&self, issue_key: &str) -> Result<Issue, TrackerError> {
        self.fetch_issue(issue_key).await
    }
}
