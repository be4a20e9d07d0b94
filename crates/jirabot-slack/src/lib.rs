//! Slack transport for jirabot.
//!
//! Provides the Web API client used to post issue cards, the Socket Mode
//! transport that turns the websocket stream into typed [`ChatEvent`]s, and
//! the error type shared by both.

pub mod chat_events;
pub mod slack_api_client;
pub mod slack_errors;
pub mod slack_socket_transport;

pub use chat_events::{ChatEvent, ChatMessage};
pub use slack_api_client::{
    SlackApiClient, SlackAttachment, SlackAttachmentMessage, SlackPostedMessage,
};
pub use slack_errors::SlackError;
pub use slack_socket_transport::{SlackSocketTransport, TransportExit};
