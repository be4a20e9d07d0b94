//! Typed chat events decoded from Slack Socket Mode envelopes.

use serde::Deserialize;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message as WsMessage;

use crate::SlackError;

/// A channel message as seen by the event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub channel: String,
    pub user: Option<String>,
    pub text: String,
    pub subtype: Option<String>,
    pub bot_id: Option<String>,
    pub ts: Option<String>,
}

impl ChatMessage {
    /// Plain user message with no subtype, mostly useful for tests and fakes.
    pub fn from_user(channel: &str, user: &str, text: &str) -> Self {
        Self {
            channel: channel.to_string(),
            user: Some(user.to_string()),
            text: text.to_string(),
            subtype: None,
            bot_id: None,
            ts: None,
        }
    }

    /// Bot posts (including our own cards) must never be processed again.
    pub fn is_bot_authored(&self) -> bool {
        self.subtype.as_deref() == Some("bot_message")
            || self
                .bot_id
                .as_deref()
                .is_some_and(|bot_id| !bot_id.trim().is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Enumerates supported `ChatEvent` values.
pub enum ChatEvent {
    Message(ChatMessage),
    InvalidAuth { reason: String },
    Other { kind: String },
}

impl ChatEvent {
    pub fn kind(&self) -> &str {
        match self {
            Self::Message(_) => "message",
            Self::InvalidAuth { .. } => "invalid_auth",
            Self::Other { kind } => kind.as_str(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct SlackSocketEnvelope {
    #[serde(default)]
    pub(crate) envelope_id: Option<String>,
    #[serde(rename = "type")]
    pub(crate) envelope_type: String,
    #[serde(default)]
    pub(crate) reason: Option<String>,
    #[serde(default)]
    pub(crate) payload: Value,
}

/// What the socket session should do with one decoded envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EnvelopeAction {
    Forward(ChatEvent),
    Reconnect { reason: String },
}

#[derive(Debug, Deserialize)]
struct SlackEventCallbackEnvelope {
    #[serde(rename = "type")]
    callback_type: String,
    event: SlackEventPayload,
}

#[derive(Debug, Deserialize)]
struct SlackEventPayload {
    #[serde(rename = "type")]
    event_type: String,
    #[serde(default)]
    subtype: Option<String>,
    #[serde(default)]
    user: Option<String>,
    #[serde(default)]
    bot_id: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    channel: Option<String>,
    #[serde(default)]
    ts: Option<String>,
}

pub(crate) fn parse_socket_envelope(
    message: WsMessage,
) -> Result<Option<SlackSocketEnvelope>, SlackError> {
    match message {
        WsMessage::Text(text) => Ok(Some(serde_json::from_str::<SlackSocketEnvelope>(&text)?)),
        WsMessage::Binary(bytes) => Ok(Some(serde_json::from_slice::<SlackSocketEnvelope>(
            &bytes,
        )?)),
        WsMessage::Ping(_) | WsMessage::Pong(_) => Ok(None),
        WsMessage::Close(_) => Ok(None),
        WsMessage::Frame(_) => Ok(None),
    }
}

pub(crate) fn classify_envelope(envelope: &SlackSocketEnvelope) -> Result<EnvelopeAction, SlackError> {
    match envelope.envelope_type.as_str() {
        "events_api" => {}
        "disconnect" => {
            return Ok(EnvelopeAction::Reconnect {
                reason: envelope
                    .reason
                    .clone()
                    .unwrap_or_else(|| "unspecified".to_string()),
            })
        }
        other => {
            return Ok(EnvelopeAction::Forward(ChatEvent::Other {
                kind: other.to_string(),
            }))
        }
    }

    let callback = serde_json::from_value::<SlackEventCallbackEnvelope>(envelope.payload.clone())?;
    if callback.callback_type != "event_callback" {
        return Ok(EnvelopeAction::Forward(ChatEvent::Other {
            kind: callback.callback_type,
        }));
    }

    let event = callback.event;
    if event.event_type != "message" {
        return Ok(EnvelopeAction::Forward(ChatEvent::Other {
            kind: event.event_type,
        }));
    }
    let channel = match event.channel {
        Some(channel) if !channel.trim().is_empty() => channel,
        _ => {
            return Ok(EnvelopeAction::Forward(ChatEvent::Other {
                kind: "message_without_channel".to_string(),
            }))
        }
    };

    Ok(EnvelopeAction::Forward(ChatEvent::Message(ChatMessage {
        channel,
        user: event.user.filter(|user| !user.trim().is_empty()),
        text: event.text.unwrap_or_default(),
        subtype: event.subtype,
        bot_id: event.bot_id,
        ts: event.ts,
    })))
}
