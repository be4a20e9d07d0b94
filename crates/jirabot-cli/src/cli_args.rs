use clap::Parser;

pub const DEFAULT_SLACK_API_BASE: &str = "https://slack.com/api";
pub const DEFAULT_BOT_NAME: &str = "Jira";
pub const DEFAULT_ICON_URL: &str = "https://globus.atlassian.net/images/64jira.png";

fn parse_positive_u64(value: &str) -> Result<u64, String> {
    let parsed = value
        .parse::<u64>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

fn parse_positive_usize(value: &str) -> Result<usize, String> {
    let parsed = value
        .parse::<usize>()
        .map_err(|error| format!("failed to parse integer: {error}"))?;
    if parsed == 0 {
        return Err("value must be greater than 0".to_string());
    }
    Ok(parsed)
}

#[derive(Debug, Clone, Parser)]
#[command(
    name = "jirabot",
    about = "Posts Jira issue summaries for ticket keys mentioned in Slack",
    version
)]
/// Public struct `Cli` used across jirabot components.
pub struct Cli {
    #[arg(
        long = "jira-url",
        env = "JIRA_URL",
        help = "Base URL of the Jira server, e.g. https://jira.example.com"
    )]
    pub jira_url: String,

    #[arg(long = "jira-user", env = "JIRA_USER", help = "Jira username for basic auth")]
    pub jira_user: String,

    #[arg(
        long = "jira-password",
        env = "JIRA_PASSWORD",
        hide_env_values = true,
        help = "Jira password or API token for basic auth"
    )]
    pub jira_password: String,

    #[arg(
        long = "jira-request-timeout-ms",
        env = "JIRABOT_JIRA_REQUEST_TIMEOUT_MS",
        default_value_t = 10_000,
        value_parser = parse_positive_u64,
        help = "Per-request timeout for Jira API calls"
    )]
    pub jira_request_timeout_ms: u64,

    #[arg(
        long = "slack-token",
        env = "SLACK_TOKEN",
        hide_env_values = true,
        help = "Slack bot token (xoxb-...) used to post issue cards"
    )]
    pub slack_token: String,

    #[arg(
        long = "slack-app-token",
        env = "SLACK_APP_TOKEN",
        hide_env_values = true,
        help = "Slack app-level token (xapp-...) used to open Socket Mode connections"
    )]
    pub slack_app_token: String,

    #[arg(
        long = "slack-api-base",
        env = "JIRABOT_SLACK_API_BASE",
        default_value = DEFAULT_SLACK_API_BASE,
        help = "Slack Web API base URL"
    )]
    pub slack_api_base: String,

    #[arg(
        long = "slack-request-timeout-ms",
        env = "JIRABOT_SLACK_REQUEST_TIMEOUT_MS",
        default_value_t = 10_000,
        value_parser = parse_positive_u64,
        help = "Per-request timeout for Slack Web API calls"
    )]
    pub slack_request_timeout_ms: u64,

    #[arg(
        long = "slack-reconnect-delay-ms",
        env = "JIRABOT_SLACK_RECONNECT_DELAY_MS",
        default_value_t = 1_000,
        value_parser = parse_positive_u64,
        help = "Delay before reopening a dropped Socket Mode connection"
    )]
    pub slack_reconnect_delay_ms: u64,

    #[arg(
        long = "event-buffer",
        env = "JIRABOT_EVENT_BUFFER",
        default_value_t = 1_024,
        value_parser = parse_positive_usize,
        help = "Capacity of the channel between the Slack transport and the event loop"
    )]
    pub event_buffer: usize,

    #[arg(
        long = "bot-name",
        env = "JIRABOT_BOT_NAME",
        default_value = DEFAULT_BOT_NAME,
        help = "Display name used when posting issue cards"
    )]
    pub bot_name: String,

    #[arg(
        long = "icon-url",
        env = "JIRABOT_ICON_URL",
        default_value = DEFAULT_ICON_URL,
        help = "Icon shown next to posted issue cards"
    )]
    pub icon_url: String,
}
