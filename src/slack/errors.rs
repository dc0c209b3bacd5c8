use thiserror::Error;

#[derive(Debug, Error)]
pub enum SlackError {
    #[error("HTTP request to Slack failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Slack {method} returned HTTP {status}: {body}")]
    Status {
        method: &'static str,
        status: u16,
        body: String,
    },
    #[error("Slack {method} failed: {error}")]
    Api { method: &'static str, error: String },
    #[error("Slack {method} response is missing `{field}`")]
    MissingField {
        method: &'static str,
        field: &'static str,
    },
}

impl SlackError {
    /// Slack's machine-readable error code (`users_not_found`, `channel_not_found`, ...)
    pub fn api_error(&self) -> Option<&str> {
        match self {
            SlackError::Api { error, .. } => Some(error),
            _ => None,
        }
    }
}
