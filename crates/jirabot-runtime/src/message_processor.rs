//! Per-message pipeline: extract, resolve concurrently, render, dispatch.

use futures_util::future::join_all;

use crate::{IssueReference, RuntimeContext};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Outcome counters for one processed message.
pub struct MessageReport {
    pub references: usize,
    pub resolved: usize,
    pub dispatched: usize,
    pub resolution_failures: usize,
    pub dispatch_failures: usize,
}

impl MessageReport {
    pub fn merge(&mut self, other: &MessageReport) {
        self.references += other.references;
        self.resolved += other.resolved;
        self.dispatched += other.dispatched;
        self.resolution_failures += other.resolution_failures;
        self.dispatch_failures += other.dispatch_failures;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ReferenceOutcome {
    Dispatched,
    DispatchFailed,
    ResolutionFailed,
}

/// Handles every reference found in `text` and returns once all have settled.
///
/// A failing reference is logged and counted; it never stops its siblings.
pub async fn process_message(
    context: &RuntimeContext,
    text: &str,
    channel: &str,
) -> MessageReport {
    let references = context.matcher.find_all(text);
    let mut report = MessageReport {
        references: references.len(),
        ..MessageReport::default()
    };
    if references.is_empty() {
        return report;
    }
    tracing::debug!(channel = %channel, references = references.len(), "issue references found");

    let outcomes = join_all(
        references
            .iter()
            .map(|reference| handle_reference(context, reference, channel)),
    )
    .await;

    for outcome in outcomes {
        match outcome {
            ReferenceOutcome::Dispatched => {
                report.resolved += 1;
                report.dispatched += 1;
            }
            ReferenceOutcome::DispatchFailed => {
                report.resolved += 1;
                report.dispatch_failures += 1;
            }
            ReferenceOutcome::ResolutionFailed => report.resolution_failures += 1,
        }
    }
    report
}

async fn handle_reference(
    context: &RuntimeContext,
    reference: &IssueReference,
    channel: &str,
) -> ReferenceOutcome {
    let issue_key = reference.to_string();
    let issue = match context.resolver.resolve(&issue_key).await {
        Ok(issue) => issue,
        Err(error) => {
            tracing::warn!(
                issue_key = %issue_key,
                channel = %channel,
                error_kind = error.kind(),
                %error,
                "issue lookup failed"
            );
            return ReferenceOutcome::ResolutionFailed;
        }
    };

    let card = context.renderer.render(&issue);
    match context.dispatcher.dispatch(channel, &card).await {
        Ok(()) => ReferenceOutcome::Dispatched,
        Err(error) => {
            tracing::warn!(
                issue_key = %issue_key,
                channel = %channel,
                error_kind = error.kind(),
                %error,
                "notification dispatch failed"
            );
            ReferenceOutcome::DispatchFailed
        }
    }
}
