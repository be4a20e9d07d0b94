//! Issue card rendering for chat notifications.

use jirabot_tracker::Issue;

/// Color for statuses that mean work is queued or underway.
pub const IN_PROGRESS_COLOR: &str = "#496686";
/// Color for statuses that mean work is finished.
pub const COMPLETE_COLOR: &str = "#048A25";
/// Fallback color for every other status name.
pub const ATTENTION_COLOR: &str = "#FFD442";

/// Maps a tracker status name to a card color. Matching is exact and case-sensitive.
pub fn status_color(status: &str) -> &'static str {
    match status {
        "Open" | "Reopened" | "To Do" => IN_PROGRESS_COLOR,
        "Resolved" | "Closed" | "Done" => COMPLETE_COLOR,
        _ => ATTENTION_COLOR,
    }
}

/// Render-only card describing one resolved issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationCard {
    pub title: String,
    pub title_link: String,
    pub fallback: String,
    pub text: String,
    pub color: String,
    pub icon_url: String,
    pub sender_name: String,
    pub footer: Option<String>,
    pub footer_icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationRenderer {
    tracker_base_url: String,
    icon_url: String,
    sender_name: String,
}

impl NotificationRenderer {
    pub fn new(tracker_base_url: &str, icon_url: &str, sender_name: &str) -> Self {
        Self {
            tracker_base_url: tracker_base_url.trim().trim_end_matches('/').to_string(),
            icon_url: icon_url.trim().to_string(),
            sender_name: sender_name.trim().to_string(),
        }
    }

    pub fn render(&self, issue: &Issue) -> NotificationCard {
        let summary = if issue.summary.trim().is_empty() {
            "(no summary)".to_string()
        } else {
            escape_slack_text(issue.summary.trim())
        };
        let text = format!(
            "*{summary}*\n*Assignee* {}\n*Priority* {}",
            escape_slack_text(&issue.assignee),
            escape_slack_text(&issue.priority)
        );
        let issue_type = issue.issue_type.name.trim();

        NotificationCard {
            title: issue.key.clone(),
            title_link: format!("{}/browse/{}", self.tracker_base_url, issue.key),
            fallback: format!("{}: {}", issue.key, issue.summary.trim()),
            text,
            color: status_color(&issue.status).to_string(),
            icon_url: self.icon_url.clone(),
            sender_name: self.sender_name.clone(),
            footer: (!issue_type.is_empty()).then(|| issue_type.to_string()),
            footer_icon: issue.issue_type.icon_url.clone(),
        }
    }
}

/// Escapes the three characters Slack reserves for control sequences.
fn escape_slack_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use jirabot_tracker::{Issue, IssueType, UNASSIGNED_DISPLAY_NAME};

    use super::{
        status_color, NotificationRenderer, ATTENTION_COLOR, COMPLETE_COLOR, IN_PROGRESS_COLOR,
    };

    fn issue(status: &str) -> Issue {
        Issue {
            key: "PROJ-42".to_string(),
            summary: "Fix the <login> & signup flow".to_string(),
            issue_type: IssueType {
                name: "Bug".to_string(),
                icon_url: Some("https://jira.test/bug.png".to_string()),
            },
            creator: "Casey".to_string(),
            assignee: UNASSIGNED_DISPLAY_NAME.to_string(),
            priority: "High".to_string(),
            status: status.to_string(),
        }
    }

    #[test]
    fn unit_status_color_maps_known_and_unknown_statuses() {
        for status in ["Open", "Reopened", "To Do"] {
            assert_eq!(status_color(status), IN_PROGRESS_COLOR, "{status}");
        }
        for status in ["Resolved", "Closed", "Done"] {
            assert_eq!(status_color(status), COMPLETE_COLOR, "{status}");
        }
        for status in ["Backlog", "In Progress", "done", "OPEN", "", "Erledigt"] {
            assert_eq!(status_color(status), ATTENTION_COLOR, "{status}");
        }
    }

    #[test]
    fn functional_render_builds_card_fields() {
        let renderer = NotificationRenderer::new(
            "https://jira.example.com/",
            "https://jira.test/logo.png",
            " Jira ",
        );
        let card = renderer.render(&issue("Done"));

        assert_eq!(card.title, "PROJ-42");
        assert_eq!(card.title_link, "https://jira.example.com/browse/PROJ-42");
        assert_eq!(card.color, COMPLETE_COLOR);
        assert_eq!(card.icon_url, "https://jira.test/logo.png");
        assert_eq!(card.sender_name, "Jira");
        assert_eq!(
            card.text,
            "*Fix the &lt;login&gt; &amp; signup flow*\n*Assignee* Unassigned\n*Priority* High"
        );
        assert_eq!(card.fallback, "PROJ-42: Fix the <login> & signup flow");
        assert_eq!(card.footer.as_deref(), Some("Bug"));
        assert_eq!(card.footer_icon.as_deref(), Some("https://jira.test/bug.png"));
    }

    #[test]
    fn regression_render_uses_fallback_color_and_placeholders() {
        let renderer = NotificationRenderer::new("https://jira.example.com", "icon", "bot");
        let mut backlog = issue("Backlog");
        backlog.summary = "   ".to_string();
        backlog.issue_type.name = String::new();
        backlog.issue_type.icon_url = None;

        let card = renderer.render(&backlog);
        assert_eq!(card.color, ATTENTION_COLOR);
        assert!(card.text.starts_with("*(no summary)*\n"));
        assert_eq!(card.footer, None);
        assert_eq!(card.footer_icon, None);

        assert_eq!(renderer.render(&issue("Open")).color, IN_PROGRESS_COLOR);
    }
}
