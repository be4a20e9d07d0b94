use anyhow::{bail, Context, Result};
use reqwest::Url;

use crate::Cli;

/// Rejects configurations that would only fail later at startup.
pub fn validate_cli(cli: &Cli) -> Result<()> {
    validate_http_url("--jira-url", &cli.jira_url)?;
    validate_http_url("--slack-api-base", &cli.slack_api_base)?;

    for (flag, value) in [
        ("--jira-user", &cli.jira_user),
        ("--jira-password", &cli.jira_password),
        ("--slack-token", &cli.slack_token),
        ("--slack-app-token", &cli.slack_app_token),
        ("--bot-name", &cli.bot_name),
    ] {
        if value.trim().is_empty() {
            bail!("{flag} cannot be empty");
        }
    }
    Ok(())
}

fn validate_http_url(flag: &str, value: &str) -> Result<()> {
    let url = Url::parse(value.trim()).with_context(|| format!("{flag} is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!("{flag} must use http or https, got '{}'", url.scheme());
    }
    if url.host_str().is_none() {
        bail!("{flag} must include a host");
    }
    Ok(())
}
