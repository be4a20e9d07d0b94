use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use jirabot_slack::SlackError;
use jirabot_tracker::{Issue, IssueResolver, IssueType, TrackerError, UNASSIGNED_DISPLAY_NAME};

use crate::{
    DispatchError, NotificationCard, NotificationDispatcher, NotificationRenderer,
    ReferenceMatcher, RuntimeContext,
};

pub(crate) fn issue(key: &str, status: &str) -> Issue {
    Issue {
        key: key.to_string(),
        summary: format!("Summary of {key}"),
        issue_type: IssueType {
            name: "Task".to_string(),
            icon_url: None,
        },
        creator: "Reporter".to_string(),
        assignee: UNASSIGNED_DISPLAY_NAME.to_string(),
        priority: "Medium".to_string(),
        status: status.to_string(),
    }
}

/// In-memory resolver. Unknown keys fail with a 404 lookup error.
#[derive(Default)]
pub(crate) struct FakeResolver {
    issues: HashMap<String, Issue>,
    not_found: HashSet<String>,
    panicking: HashSet<String>,
    delay: Option<Duration>,
    calls: Mutex<Vec<String>>,
}

impl FakeResolver {
    pub(crate) fn with_issues(issues: impl IntoIterator<Item = Issue>) -> Self {
        Self {
            issues: issues
                .into_iter()
                .map(|issue| (issue.key.clone(), issue))
                .collect(),
            ..Self::default()
        }
    }

    pub(crate) fn with_not_found(mut self, key: &str) -> Self {
        self.not_found.insert(key.to_string());
        self
    }

    pub(crate) fn with_panic(mut self, key: &str) -> Self {
        self.panicking.insert(key.to_string());
        self
    }

    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("calls lock").clone()
    }
}

#[async_trait]
impl IssueResolver for FakeResolver {
    async fn resolve(&self, issue_key: &str) -> Result<Issue, TrackerError> {
        self.calls
            .lock()
            .expect("calls lock")
            .push(issue_key.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.panicking.contains(issue_key) {
            panic!("resolver blew up on {issue_key}");
        }
        if self.not_found.contains(issue_key) {
            return Err(TrackerError::NotFound {
                key: issue_key.to_string(),
            });
        }
        self.issues
            .get(issue_key)
            .cloned()
            .ok_or_else(|| TrackerError::Lookup {
                operation: "get issue",
                status: 404,
                body: "Issue Does Not Exist".to_string(),
            })
    }
}

/// Records every dispatched card; channels listed as failing get an API error.
#[derive(Default)]
pub(crate) struct FakeDispatcher {
    failing_channels: HashSet<String>,
    sent: Mutex<Vec<(String, NotificationCard)>>,
}

impl FakeDispatcher {
    pub(crate) fn failing_on(channel: &str) -> Self {
        let mut dispatcher = Self::default();
        dispatcher.failing_channels.insert(channel.to_string());
        dispatcher
    }

    pub(crate) fn sent(&self) -> Vec<(String, NotificationCard)> {
        self.sent.lock().expect("sent lock").clone()
    }

    pub(crate) fn sent_titles(&self) -> Vec<String> {
        let mut titles = self
            .sent()
            .into_iter()
            .map(|(_, card)| card.title)
            .collect::<Vec<_>>();
        titles.sort();
        titles
    }
}

#[async_trait]
impl NotificationDispatcher for FakeDispatcher {
    async fn dispatch(&self, channel: &str, card: &NotificationCard) -> Result<(), DispatchError> {
        if self.failing_channels.contains(channel) {
            return Err(DispatchError {
                channel: channel.to_string(),
                source: SlackError::Api {
                    method: "chat.postMessage",
                    code: "channel_not_found".to_string(),
                },
            });
        }
        self.sent
            .lock()
            .expect("sent lock")
            .push((channel.to_string(), card.clone()));
        Ok(())
    }
}

pub(crate) fn runtime_context(
    keys: &[&str],
    resolver: Arc<FakeResolver>,
    dispatcher: Arc<FakeDispatcher>,
) -> RuntimeContext {
    RuntimeContext::new(
        ReferenceMatcher::build(keys).expect("matcher"),
        resolver,
        dispatcher,
        NotificationRenderer::new("https://jira.example.com", "https://jira.test/logo.png", "Jira"),
    )
}
