//! Jira tracker access for jirabot.
//!
//! Hosts the REST v2 client, the startup project directory, the issue model
//! with its normalization rules, and the `IssueResolver` seam consumed by the
//! message pipeline.

pub mod issue_model;
pub mod issue_resolver;
pub mod project_directory;
pub mod tracker_api_client;
pub mod tracker_errors;

pub use issue_model::{Issue, IssueType, JiraProject, NO_PRIORITY_NAME, UNASSIGNED_DISPLAY_NAME};
pub use issue_resolver::IssueResolver;
pub use project_directory::{load_projects, ProjectDirectory};
pub use tracker_api_client::JiraApiClient;
pub use tracker_errors::TrackerError;
