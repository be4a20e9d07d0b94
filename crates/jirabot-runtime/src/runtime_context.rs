use std::sync::Arc;

use jirabot_tracker::IssueResolver;

use crate::{NotificationDispatcher, NotificationRenderer, ReferenceMatcher};

/// Read-only state shared by every message task.
///
/// Built once at startup and never mutated afterwards, so tasks hold it
/// behind an `Arc` without any locking.
#[derive(Clone)]
pub struct RuntimeContext {
    pub matcher: ReferenceMatcher,
    pub resolver: Arc<dyn IssueResolver>,
    pub dispatcher: Arc<dyn NotificationDispatcher>,
    pub renderer: NotificationRenderer,
}

impl RuntimeContext {
    pub fn new(
        matcher: ReferenceMatcher,
        resolver: Arc<dyn IssueResolver>,
        dispatcher: Arc<dyn NotificationDispatcher>,
        renderer: NotificationRenderer,
    ) -> Self {
        Self {
            matcher,
            resolver,
            dispatcher,
            renderer,
        }
    }
}

impl std::fmt::Debug for RuntimeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuntimeContext")
            .field("matcher", &self.matcher)
            .field("renderer", &self.renderer)
            .finish_non_exhaustive()
    }
}
