use thiserror::Error;

#[derive(Debug, Error)]
/// Enumerates supported `TrackerError` values.
pub enum TrackerError {
    #[error("invalid tracker configuration: {0}")]
    InvalidConfig(String),
    #[error("tracker {operation} request failed: {source}")]
    Transport {
        operation: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("tracker {operation} failed with status {status}: {body}")]
    Lookup {
        operation: &'static str,
        status: u16,
        body: String,
    },
    #[error("no issue found for {key}")]
    NotFound { key: String },
    #[error("failed to decode tracker {operation}: {source}")]
    Decode {
        operation: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

impl TrackerError {
    /// Stable label used as a structured logging field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidConfig(_) => "invalid_config",
            Self::Transport { .. } => "transport",
            Self::Lookup { .. } => "lookup",
            Self::NotFound { .. } => "not_found",
            Self::Decode { .. } => "decode",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Lookup { status, .. } => Some(*status),
            _ => None,
        }
    }
}
