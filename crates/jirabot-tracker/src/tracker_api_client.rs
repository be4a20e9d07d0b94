//! Jira REST v2 client used for the startup project listing and issue lookups.

use std::time::Duration;

use serde::de::DeserializeOwned;

use crate::issue_model::JiraIssuePayload;
use crate::{Issue, JiraProject, TrackerError};

const PROJECTS_PATH: &str = "/rest/api/2/project";
const ISSUE_PATH: &str = "/rest/api/2/issue/";

#[derive(Clone)]
/// Public struct `JiraApiClient` used across jirabot components.
///
/// Cloning is cheap and shares the underlying connection pool; the client
/// holds no mutable state, so one instance serves every concurrent lookup.
pub struct JiraApiClient {
    http: reqwest::Client,
    base_url: String,
    username: String,
    password: String,
}

impl std::fmt::Debug for JiraApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JiraApiClient")
            .field("base_url", &self.base_url)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl JiraApiClient {
    pub fn new(
        base_url: &str,
        username: &str,
        password: &str,
        request_timeout_ms: u64,
    ) -> Result<Self, TrackerError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        let parsed = reqwest::Url::parse(&base_url).map_err(|error| {
            TrackerError::InvalidConfig(format!("invalid tracker url '{base_url}': {error}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(TrackerError::InvalidConfig(format!(
                "tracker url '{base_url}' must use http or https"
            )));
        }

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static("jirabot"),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(request_timeout_ms.max(1)))
            .build()
            .map_err(|error| {
                TrackerError::InvalidConfig(format!("failed to create tracker client: {error}"))
            })?;

        Ok(Self {
            http,
            base_url,
            username: username.trim().to_string(),
            password: password.to_string(),
        })
    }

    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn list_projects(&self) -> Result<Vec<JiraProject>, TrackerError> {
        self.request_json("list projects", format!("{}{PROJECTS_PATH}", self.base_url))
            .await
    }

    /// Fetches one issue by key and normalizes absent display fields.
    pub async fn fetch_issue(&self, issue_key: &str) -> Result<Issue, TrackerError> {
        let issue_key = issue_key.trim();
        let payload: JiraIssuePayload = self
            .request_json("get issue", format!("{}{ISSUE_PATH}{issue_key}", self.base_url))
            .await?;
        payload.into_issue(issue_key)
    }

    async fn request_json<T>(&self, operation: &'static str, url: String) -> Result<T, TrackerError>
    where
        T: DeserializeOwned,
    {
        tracing::debug!(operation, url = %url, "tracker request");
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
            .map_err(|source| TrackerError::Transport { operation, source })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TrackerError::Lookup {
                operation,
                status: status.as_u16(),
                body: truncate_for_error(&body, 800),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|source| TrackerError::Transport { operation, source })?;
        serde_json::from_slice::<T>(&bytes).map_err(|source| TrackerError::Decode { operation, source })
    }
}

fn truncate_for_error(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated = value.chars().take(max_chars).collect::<String>();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::{truncate_for_error, JiraApiClient};
    use crate::{TrackerError, UNASSIGNED_DISPLAY_NAME};

    fn test_client(base_url: &str) -> JiraApiClient {
        JiraApiClient::new(base_url, "user", "pass", 2_000).expect("client")
    }

    #[test]
    fn unit_new_rejects_invalid_and_non_http_urls() {
        let error = JiraApiClient::new("not a url", "user", "pass", 1_000).expect_err("invalid");
        assert!(matches!(error, TrackerError::InvalidConfig(_)));
        let error =
            JiraApiClient::new("ftp://jira.example.com", "user", "pass", 1_000).expect_err("ftp");
        assert!(error.to_string().contains("must use http or https"));
    }

    #[test]
    fn unit_new_trims_trailing_slash_from_base_url() {
        let client = test_client("https://jira.example.com/");
        assert_eq!(client.base_url(), "https://jira.example.com");
    }

    #[test]
    fn regression_truncate_for_error_preserves_unicode_boundaries() {
        assert_eq!(truncate_for_error("short", 10), "short");
        assert_eq!(truncate_for_error("ééééé", 2), "éé...");
    }

    #[tokio::test]
    async fn integration_list_projects_sends_basic_auth_and_preserves_order() {
        let server = MockServer::start();
        let projects = server.mock(|when, then| {
            when.method(GET)
                .path("/rest/api/2/project")
                .header("authorization", "Basic dXNlcjpwYXNz")
                .header("accept", "application/json");
            then.status(200).json_body(json!([
                {"id": "10002", "key": "OPS", "name": "Operations"},
                {"id": "10001", "key": "PROJ", "name": "Project"}
            ]));
        });

        let listed = test_client(&server.base_url())
            .list_projects()
            .await
            .expect("projects");
        projects.assert_calls(1);
        let keys = listed.iter().map(|p| p.key.as_str()).collect::<Vec<_>>();
        assert_eq!(keys, vec!["OPS", "PROJ"]);
        assert_eq!(listed[0].id, "10002");
    }

    #[tokio::test]
    async fn integration_list_projects_reports_lookup_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/project");
            then.status(401).body("unauthorized");
        });

        let error = test_client(&server.base_url())
            .list_projects()
            .await
            .expect_err("401");
        assert_eq!(error.status(), Some(401));
        assert!(error.to_string().contains("unauthorized"));
    }

    #[tokio::test]
    async fn integration_fetch_issue_with_and_without_assignee() {
        let server = MockServer::start();
        let assigned = server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/issue/PROJ-42");
            then.status(200).json_body(json!({
                "key": "PROJ-42",
                "fields": {
                    "issuetype": {"name": "Task"},
                    "summary": "Ship it",
                    "creator": {"displayName": "Casey"},
                    "assignee": {"displayName": "Robin"},
                    "priority": {"name": "Medium"},
                    "status": {"name": "Done"}
                }
            }));
        });
        let unassigned = server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/issue/PROJ-43");
            then.status(200).json_body(json!({
                "key": "PROJ-43",
                "fields": {
                    "issuetype": {"name": "Bug"},
                    "summary": "Nobody owns this",
                    "creator": {"displayName": "Casey"},
                    "assignee": null,
                    "priority": {"name": "Low"},
                    "status": {"name": "Open"}
                }
            }));
        });

        let client = test_client(&server.base_url());
        let issue = client.fetch_issue("PROJ-42").await.expect("assigned issue");
        assert_eq!(issue.assignee, "Robin");
        assert_eq!(issue.status, "Done");

        let issue = client.fetch_issue("PROJ-43").await.expect("unassigned issue");
        assert_eq!(issue.assignee, UNASSIGNED_DISPLAY_NAME);
        assigned.assert_calls(1);
        unassigned.assert_calls(1);
    }

    #[tokio::test]
    async fn regression_fetch_issue_classifies_failures() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/issue/PROJ-404");
            then.status(404)
                .json_body(json!({"errorMessages": ["Issue does not exist"]}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/issue/PROJ-1");
            then.status(200).json_body(json!({"key": "", "fields": null}));
        });
        server.mock(|when, then| {
            when.method(GET).path("/rest/api/2/issue/PROJ-2");
            then.status(200).body("<html>not json</html>");
        });

        let client = test_client(&server.base_url());
        let error = client.fetch_issue("PROJ-404").await.expect_err("404");
        assert_eq!(error.kind(), "lookup");
        assert_eq!(error.status(), Some(404));

        let error = client.fetch_issue("PROJ-1").await.expect_err("empty key");
        assert_eq!(error.kind(), "not_found");

        let error = client.fetch_issue("PROJ-2").await.expect_err("bad body");
        assert_eq!(error.kind(), "decode");
    }

    #[tokio::test]
    async fn regression_fetch_issue_reports_transport_errors() {
        let client = test_client("http://127.0.0.1:9");
        let error = client.fetch_issue("PROJ-1").await.expect_err("unreachable");
        assert_eq!(error.kind(), "transport");
    }
}
