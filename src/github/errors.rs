use octocrab::Error as OctocrabError;
use thiserror::Error;

/// Why an SSO identity lookup produced no email.
///
/// None of these stop a run; the caller falls back to the commit metadata email.
#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("GitHub API error: {0}")]
    Api(#[from] OctocrabError),
    #[error("GraphQL query failed: {}", .messages.join("; "))]
    GraphQl { messages: Vec<String> },
    #[error("no external identity for {login} in organization {org}")]
    NoExternalIdentity { org: String, login: String },
}

impl IdentityError {
    /// Short description of an octocrab failure for log lines
    pub fn summary(&self) -> String {
        match self {
            IdentityError::Api(OctocrabError::GitHub { source, .. }) => {
                format!("HTTP {}: {}", source.status_code, source.message)
            }
            IdentityError::Api(OctocrabError::Service { source, .. }) => {
                format!("network connection to GitHub API failed: {source}")
            }
            IdentityError::Api(OctocrabError::Hyper { source, .. }) => {
                format!("network connection to GitHub API failed: {source}")
            }
            IdentityError::Api(OctocrabError::Http { source, .. }) => {
                format!("invalid request to GitHub API: {source}")
            }
            IdentityError::Api(OctocrabError::Json { source, .. }) => {
                format!("unexpected response from GitHub API at {}: {}", source.path(), source.inner())
            }
            IdentityError::Api(OctocrabError::Serde { source, .. }) => {
                format!("unexpected response from GitHub API: {source}")
            }
            // octocrab appends a backtrace to the remaining variants
            IdentityError::Api(other) => other
                .to_string()
                .lines()
                .next()
                .unwrap_or_default()
                .to_string(),
            other => other.to_string(),
        }
    }
}
