use thiserror::Error;

/// Slack error codes that mean the configured token can no longer be used.
const AUTH_FAILURE_CODES: &[&str] = &[
    "invalid_auth",
    "not_authed",
    "account_inactive",
    "token_revoked",
    "token_expired",
];

#[derive(Debug, Error)]
/// Enumerates supported `SlackError` values.
pub enum SlackError {
    #[error("invalid slack configuration: {0}")]
    InvalidConfig(String),
    #[error("slack api {method} request failed: {source}")]
    Transport {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("slack api {method} failed with status {status}: {body}")]
    HttpStatus {
        method: &'static str,
        status: u16,
        body: String,
    },
    #[error("slack {method} failed: {code}")]
    Api { method: &'static str, code: String },
    #[error("failed to decode slack {method}: {source}")]
    Decode {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },
    #[error("slack socket {context}: {source}")]
    Socket {
        context: &'static str,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("failed to parse slack socket envelope: {0}")]
    Envelope(#[from] serde_json::Error),
}

impl SlackError {
    /// Returns true when Slack rejected the credentials themselves.
    pub fn is_auth_failure(&self) -> bool {
        match self {
            Self::Api { code, .. } => AUTH_FAILURE_CODES.contains(&code.as_str()),
            Self::HttpStatus { status, .. } => *status == 401,
            _ => false,
        }
    }
}
