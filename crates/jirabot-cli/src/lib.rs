//! Command-line and environment configuration for jirabot.

pub mod cli_args;
pub mod cli_validation;

pub use cli_args::{Cli, DEFAULT_BOT_NAME, DEFAULT_ICON_URL, DEFAULT_SLACK_API_BASE};
pub use cli_validation::validate_cli;
