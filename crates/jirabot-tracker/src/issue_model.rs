use serde::Deserialize;

use crate::TrackerError;

/// Display name used when the tracker reports no assignee.
pub const UNASSIGNED_DISPLAY_NAME: &str = "Unassigned";
/// Priority name used when the tracker reports no priority.
pub const NO_PRIORITY_NAME: &str = "None";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
/// Public struct `JiraProject` returned by the project listing endpoint.
pub struct JiraProject {
    #[serde(default)]
    pub id: String,
    pub key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Issue type shown in the card footer.
pub struct IssueType {
    pub name: String,
    pub icon_url: Option<String>,
}

/// Resolved tracker issue with every display field present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub key: String,
    pub summary: String,
    pub issue_type: IssueType,
    pub creator: String,
    pub assignee: String,
    pub priority: String,
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct JiraIssuePayload {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    fields: Option<JiraIssueFields>,
}

#[derive(Debug, Default, Deserialize)]
struct JiraIssueFields {
    #[serde(default)]
    issuetype: Option<JiraNamedField>,
    #[serde(default)]
    summary: Option<String>,
    #[serde(default)]
    creator: Option<JiraUser>,
    #[serde(default)]
    assignee: Option<JiraUser>,
    #[serde(default)]
    priority: Option<JiraNamedField>,
    #[serde(default)]
    status: Option<JiraNamedField>,
}

#[derive(Debug, Default, Deserialize)]
struct JiraUser {
    #[serde(default, rename = "displayName")]
    display_name: String,
}

#[derive(Debug, Default, Deserialize)]
struct JiraNamedField {
    #[serde(default)]
    name: String,
    #[serde(default, rename = "iconUrl")]
    icon_url: Option<String>,
}

impl JiraIssuePayload {
    /// Converts the wire payload into an `Issue`, filling absent optional fields.
    ///
    /// A payload without a key means the tracker answered without an issue and
    /// is reported as `TrackerError::NotFound` for `requested_key`.
    pub(crate) fn into_issue(self, requested_key: &str) -> Result<Issue, TrackerError> {
        let key = match self.key {
            Some(key) if !key.trim().is_empty() => key,
            _ => {
                return Err(TrackerError::NotFound {
                    key: requested_key.to_string(),
                })
            }
        };
        let fields = self.fields.unwrap_or_default();
        let issue_type = fields.issuetype.unwrap_or_default();
        let assignee = fields
            .assignee
            .map(|user| user.display_name)
            .unwrap_or_else(|| UNASSIGNED_DISPLAY_NAME.to_string());
        let priority = fields
            .priority
            .map(|priority| priority.name)
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| NO_PRIORITY_NAME.to_string());

        Ok(Issue {
            key,
            summary: fields.summary.unwrap_or_default(),
            issue_type: IssueType {
                name: issue_type.name,
                icon_url: issue_type.icon_url.filter(|url| !url.trim().is_empty()),
            },
            creator: fields
                .creator
                .map(|user| user.display_name)
                .unwrap_or_default(),
            assignee,
            priority,
            status: fields.status.map(|status| status.name).unwrap_or_default(),
        })
    }
}
