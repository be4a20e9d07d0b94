//! Slack Web API client helpers used by socket connection and posting flows.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::SlackError;

#[derive(Debug, Clone, Deserialize)]
struct SlackOpenSocketResponse {
    ok: bool,
    url: Option<String>,
    error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct SlackChatMessageResponse {
    ok: bool,
    ts: Option<String>,
    channel: Option<String>,
    error: Option<String>,
}

/// One legacy message attachment as accepted by `chat.postMessage`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlackAttachment {
    pub fallback: String,
    pub title: String,
    pub title_link: String,
    pub text: String,
    pub color: String,
    pub mrkdwn_in: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer_icon: Option<String>,
}

/// Attachment-only message posted under a custom sender identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackAttachmentMessage {
    pub channel: String,
    pub username: String,
    pub icon_url: String,
    pub attachments: Vec<SlackAttachment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlackPostedMessage {
    pub channel: String,
    pub ts: String,
}

#[derive(Clone)]
/// Public struct `SlackApiClient` used across jirabot components.
pub struct SlackApiClient {
    http: reqwest::Client,
    api_base: String,
    app_token: String,
    bot_token: String,
}

impl std::fmt::Debug for SlackApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SlackApiClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl SlackApiClient {
    pub fn new(
        api_base: &str,
        app_token: &str,
        bot_token: &str,
        request_timeout_ms: u64,
    ) -> Result<Self, SlackError> {
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
                SlackError::InvalidConfig(format!("failed to create slack api client: {error}"))
            })?;

        Ok(Self {
            http,
            api_base: api_base.trim().trim_end_matches('/').to_string(),
            app_token: app_token.trim().to_string(),
            bot_token: bot_token.trim().to_string(),
        })
    }

    /// Requests a fresh Socket Mode websocket URL with the app-level token.
    pub async fn open_socket_connection(&self) -> Result<String, SlackError> {
        const METHOD: &str = "apps.connections.open";
        let response: SlackOpenSocketResponse = self
            .request_json(
                METHOD,
                self.http
                    .post(format!("{}/{METHOD}", self.api_base))
                    .bearer_auth(&self.app_token),
            )
            .await?;
        if !response.ok {
            return Err(api_error(METHOD, response.error));
        }
        response
            .url
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| SlackError::Api {
                method: METHOD,
                code: "missing_url".to_string(),
            })
    }

    pub async fn post_attachment_message(
        &self,
        message: &SlackAttachmentMessage,
    ) -> Result<SlackPostedMessage, SlackError> {
        const METHOD: &str = "chat.postMessage";
        let payload = json!({
            "channel": message.channel,
            "text": "",
            "username": message.username,
            "icon_url": message.icon_url,
            "attachments": message.attachments,
            "unfurl_links": false,
            "unfurl_media": false,
        });

        let response: SlackChatMessageResponse = self
            .request_json(
                METHOD,
                self.http
                    .post(format!("{}/{METHOD}", self.api_base))
                    .bearer_auth(&self.bot_token)
                    .json(&payload),
            )
            .await?;
        if !response.ok {
            return Err(api_error(METHOD, response.error));
        }

        Ok(SlackPostedMessage {
            channel: response
                .channel
                .unwrap_or_else(|| message.channel.clone()),
            ts: response.ts.unwrap_or_default(),
        })
    }

    async fn request_json<T>(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SlackError>
    where
        T: DeserializeOwned,
    {
        let response = request
            .send()
            .await
            .map_err(|source| SlackError::Transport { method, source })?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::HttpStatus {
                method,
                status: status.as_u16(),
                body: truncate_for_error(&body, 800),
            });
        }
        response
            .json::<T>()
            .await
            .map_err(|source| SlackError::Decode { method, source })
    }
}

fn api_error(method: &'static str, code: Option<String>) -> SlackError {
    SlackError::Api {
        method,
        code: code.unwrap_or_else(|| "unknown_error".to_string()),
    }
}

pub(crate) fn truncate_for_error(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    let mut truncated = String::new();
    for ch in value.chars().take(max_chars) {
        truncated.push(ch);
    }
    truncated.push_str("...");
    truncated
}
