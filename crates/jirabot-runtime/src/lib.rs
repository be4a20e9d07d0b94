//! Message ingestion and issue-resolution pipeline for jirabot.
//!
//! Chat events flow through [`run_event_loop`], which fans each user message
//! out to [`process_message`]: references are extracted by the
//! [`ReferenceMatcher`], resolved concurrently through the tracker, rendered
//! into [`NotificationCard`]s and posted back to the originating channel.

pub mod event_loop;
pub mod message_processor;
pub mod notification_dispatch;
pub mod notification_render;
pub mod reference_matcher;
pub mod runtime_context;

#[cfg(test)]
mod test_support;

pub use event_loop::{run_event_loop, EventLoopExit, EventLoopReport};
pub use message_processor::{process_message, MessageReport};
pub use notification_dispatch::{DispatchError, NotificationDispatcher};
pub use notification_render::{
    status_color, NotificationCard, NotificationRenderer, ATTENTION_COLOR, COMPLETE_COLOR,
    IN_PROGRESS_COLOR,
};
pub use reference_matcher::{IssueReference, MatcherBuildError, ReferenceMatcher};
pub use runtime_context::RuntimeContext;
