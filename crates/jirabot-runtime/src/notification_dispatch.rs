//! Delivery seam between rendered cards and the chat platform.

use async_trait::async_trait;
use jirabot_slack::{SlackApiClient, SlackAttachment, SlackAttachmentMessage, SlackError};
use thiserror::Error;

use crate::NotificationCard;

#[derive(Debug, Error)]
#[error("failed to dispatch notification to channel {channel}: {source}")]
/// Public struct `DispatchError` used across jirabot components.
pub struct DispatchError {
    pub channel: String,
    #[source]
    pub source: SlackError,
}

impl DispatchError {
    pub fn kind(&self) -> &'static str {
        if self.source.is_auth_failure() {
            "dispatch_auth"
        } else {
            "dispatch"
        }
    }
}

/// Posts one rendered card into a channel. Implementations must not retry.
#[async_trait]
pub trait NotificationDispatcher: Send + Sync {
    async fn dispatch(&self, channel: &str, card: &NotificationCard) -> Result<(), DispatchError>;
}

pub(crate) fn card_to_slack_message(
    channel: &str,
    card: &NotificationCard,
) -> SlackAttachmentMessage {
    SlackAttachmentMessage {
        channel: channel.to_string(),
        username: card.sender_name.clone(),
        icon_url: card.icon_url.clone(),
        attachments: vec![SlackAttachment {
            fallback: card.fallback.clone(),
            title: card.title.clone(),
            title_link: card.title_link.clone(),
            text: card.text.clone(),
            color: card.color.clone(),
            mrkdwn_in: vec!["text".to_string(), "pretext".to_string()],
            footer: card.footer.clone(),
            footer_icon: card.footer_icon.clone(),
        }],
    }
}

#[async_trait]
impl NotificationDispatcher for SlackApiClient {
    async fn dispatch(&self, channel: &str, card: &NotificationCard) -> Result<(), DispatchError> {
        let message = card_to_slack_message(channel, card);
        let posted = self
            .post_attachment_message(&message)
            .await
            .map_err(|source| DispatchError {
                channel: channel.to_string(),
                source,
            })?;
        tracing::debug!(
            channel = %posted.channel,
            ts = %posted.ts,
            issue_key = %card.title,
            "notification posted"
        );
        Ok(())
    }
}
