//! Slack Socket Mode transport feeding typed chat events into the event loop.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::json;
use tokio::sync::{mpsc, watch};
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use crate::chat_events::{classify_envelope, parse_socket_envelope, EnvelopeAction};
use crate::{ChatEvent, SlackApiClient, SlackError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `TransportExit` values.
pub enum TransportExit {
    Shutdown,
    InvalidAuth,
    ReceiverClosed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum SessionEnd {
    Shutdown,
    ReceiverClosed,
    Reconnect { reason: String },
}

/// Keeps a Socket Mode connection open and forwards every decoded event.
#[derive(Debug, Clone)]
pub struct SlackSocketTransport {
    client: SlackApiClient,
    reconnect_delay: Duration,
}

impl SlackSocketTransport {
    pub fn new(client: SlackApiClient, reconnect_delay: Duration) -> Self {
        Self {
            client,
            reconnect_delay,
        }
    }

    /// Runs until shutdown, until the event receiver goes away, or until Slack
    /// rejects the app token. Rejection is forwarded as `ChatEvent::InvalidAuth`.
    pub async fn run(
        &self,
        events: mpsc::Sender<ChatEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) -> TransportExit {
        loop {
            if *shutdown.borrow() {
                return TransportExit::Shutdown;
            }

            let socket_url = match self.client.open_socket_connection().await {
                Ok(url) => url,
                Err(error) if error.is_auth_failure() => {
                    tracing::error!(%error, "slack rejected the app token");
                    let reason = error.to_string();
                    if events.send(ChatEvent::InvalidAuth { reason }).await.is_err() {
                        return TransportExit::ReceiverClosed;
                    }
                    return TransportExit::InvalidAuth;
                }
                Err(error) => {
                    tracing::warn!(%error, "slack socket connection could not be opened");
                    if self.pause_before_reconnect(&mut shutdown).await {
                        return TransportExit::Shutdown;
                    }
                    continue;
                }
            };

            match self
                .run_socket_session(&socket_url, &events, &mut shutdown)
                .await
            {
                Ok(SessionEnd::Shutdown) => return TransportExit::Shutdown,
                Ok(SessionEnd::ReceiverClosed) => return TransportExit::ReceiverClosed,
                Ok(SessionEnd::Reconnect { reason }) => {
                    tracing::info!(reason = %reason, "slack socket session ended; reconnecting");
                }
                Err(error) => {
                    tracing::warn!(%error, "slack socket session error");
                }
            }

            if self.pause_before_reconnect(&mut shutdown).await {
                return TransportExit::Shutdown;
            }
        }
    }

    /// Returns true when shutdown was requested while waiting.
    async fn pause_before_reconnect(&self, shutdown: &mut watch::Receiver<bool>) -> bool {
        tokio::select! {
            _ = shutdown_requested(shutdown) => true,
            _ = tokio::time::sleep(self.reconnect_delay) => false,
        }
    }

    async fn run_socket_session(
        &self,
        socket_url: &str,
        events: &mpsc::Sender<ChatEvent>,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<SessionEnd, SlackError> {
        let (stream, _response) =
            connect_async(socket_url)
                .await
                .map_err(|source| SlackError::Socket {
                    context: "connect",
                    source,
                })?;
        let (mut sink, mut source) = stream.split();
        tracing::info!("slack socket connected");

        loop {
            tokio::select! {
                _ = shutdown_requested(shutdown) => {
                    let _ = sink.close().await;
                    return Ok(SessionEnd::Shutdown);
                }
                maybe_message = source.next() => {
                    let Some(message_result) = maybe_message else {
                        return Ok(SessionEnd::Reconnect {
                            reason: "socket closed".to_string(),
                        });
                    };
                    let message = message_result.map_err(|source| SlackError::Socket {
                        context: "read",
                        source,
                    })?;
                    let Some(envelope) = parse_socket_envelope(message)? else {
                        continue;
                    };
                    if let Some(envelope_id) = envelope.envelope_id.as_deref() {
                        ack_envelope(&mut sink, envelope_id).await?;
                    }
                    match classify_envelope(&envelope)? {
                        EnvelopeAction::Forward(event) => {
                            tracing::debug!(kind = event.kind(), "slack event received");
                            if events.send(event).await.is_err() {
                                return Ok(SessionEnd::ReceiverClosed);
                            }
                        }
                        EnvelopeAction::Reconnect { reason } => {
                            return Ok(SessionEnd::Reconnect { reason });
                        }
                    }
                }
            }
        }
    }
}

/// Resolves once shutdown is requested or the signal's sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|requested| *requested).await;
}

async fn ack_envelope<S>(sink: &mut S, envelope_id: &str) -> Result<(), SlackError>
where
    S: futures_util::Sink<WsMessage, Error = tokio_tungstenite::tungstenite::Error> + Unpin,
{
    let ack = json!({ "envelope_id": envelope_id }).to_string();
    sink.send(WsMessage::Text(ack.into()))
        .await
        .map_err(|source| SlackError::Socket {
            context: "ack",
            source,
        })
}
