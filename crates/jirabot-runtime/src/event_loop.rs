//! Chat event consumption with per-message fan-out and drain-on-exit.

use std::sync::Arc;

use jirabot_slack::{ChatEvent, ChatMessage};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinSet};

use crate::{process_message, MessageReport, RuntimeContext};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Enumerates supported `EventLoopExit` values.
pub enum EventLoopExit {
    /// Chat credentials were rejected; the process should exit non-zero.
    AuthInvalidated,
    Shutdown,
    /// The transport dropped its sender.
    StreamClosed,
}

/// Totals gathered while the loop ran, including work drained on exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventLoopReport {
    pub exit: EventLoopExit,
    pub messages_spawned: usize,
    pub skipped_bot_messages: usize,
    pub ignored_events: usize,
    pub panicked_tasks: usize,
    pub totals: MessageReport,
}

impl EventLoopReport {
    fn new() -> Self {
        Self {
            exit: EventLoopExit::StreamClosed,
            messages_spawned: 0,
            skipped_bot_messages: 0,
            ignored_events: 0,
            panicked_tasks: 0,
            totals: MessageReport::default(),
        }
    }

    fn record_task(&mut self, result: Result<MessageReport, JoinError>) {
        match result {
            Ok(report) => self.totals.merge(&report),
            Err(error) if error.is_panic() => {
                self.panicked_tasks += 1;
                tracing::error!(%error, "message task panicked");
            }
            Err(error) => {
                tracing::warn!(%error, "message task cancelled");
            }
        }
    }
}

enum LoopStep {
    Event(ChatEvent),
    Closed,
    Shutdown,
}

/// Consumes chat events until auth is invalidated, shutdown is signalled or
/// the event stream ends, then waits for every in-flight message task.
pub async fn run_event_loop(
    context: Arc<RuntimeContext>,
    mut events: mpsc::Receiver<ChatEvent>,
    mut shutdown: watch::Receiver<bool>,
) -> EventLoopReport {
    let mut report = EventLoopReport::new();
    let mut tasks = JoinSet::new();

    let exit = loop {
        while let Some(result) = tasks.try_join_next() {
            report.record_task(result);
        }

        let step = tokio::select! {
            _ = shutdown_requested(&mut shutdown) => LoopStep::Shutdown,
            event = events.recv() => match event {
                Some(event) => LoopStep::Event(event),
                None => LoopStep::Closed,
            },
        };

        let event = match step {
            LoopStep::Event(event) => event,
            LoopStep::Closed => {
                tracing::info!("chat event stream closed");
                break EventLoopExit::StreamClosed;
            }
            LoopStep::Shutdown => {
                tracing::info!("shutdown requested");
                break EventLoopExit::Shutdown;
            }
        };

        match event {
            ChatEvent::Message(message) if message.is_bot_authored() => {
                report.skipped_bot_messages += 1;
            }
            ChatEvent::Message(message) => {
                report.messages_spawned += 1;
                spawn_message_task(&mut tasks, Arc::clone(&context), message);
            }
            ChatEvent::InvalidAuth { reason } => {
                tracing::error!(reason = %reason, "chat authentication invalidated");
                break EventLoopExit::AuthInvalidated;
            }
            ChatEvent::Other { kind } => {
                tracing::trace!(kind = %kind, "ignoring chat event");
                report.ignored_events += 1;
            }
        }
    };

    if !tasks.is_empty() {
        tracing::info!(in_flight = tasks.len(), "draining message tasks");
    }
    while let Some(result) = tasks.join_next().await {
        report.record_task(result);
    }

    report.exit = exit;
    tracing::info!(
        exit = ?report.exit,
        messages = report.messages_spawned,
        dispatched = report.totals.dispatched,
        resolution_failures = report.totals.resolution_failures,
        dispatch_failures = report.totals.dispatch_failures,
        "event loop stopped"
    );
    report
}

fn spawn_message_task(
    tasks: &mut JoinSet<MessageReport>,
    context: Arc<RuntimeContext>,
    message: ChatMessage,
) {
    tasks.spawn(async move { process_message(&context, &message.text, &message.channel).await });
}

/// Resolves once shutdown is requested or every shutdown sender is gone.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|requested| *requested).await;
}
