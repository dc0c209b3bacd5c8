use async_trait::async_trait;
use octocrab::service::middleware::retry::RetryConfig;
use octocrab::Octocrab;
use tracing::{debug, info, warn};

#[cfg(test)]
use mockall::automock;

use super::errors::IdentityError;
use super::types::{ExternalIdentityResponse, GraphQlRequest};

/// Identity-provider lookups used to find a committer's organization email
#[cfg_attr(test, automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// SAML `nameId` (the organization email) linked to `login` within `org`
    async fn query_identity(&self, org: &str, login: &str) -> Result<String, IdentityError>;
}

/// GitHub GraphQL client for SAML SSO identities
#[derive(Debug)]
pub struct GitHubSsoClient {
    octocrab: Octocrab,
}

impl GitHubSsoClient {
    pub fn new(token: &str, api_url: &str) -> Result<Self, IdentityError> {
        // Single attempt per lookup; octocrab would otherwise retry server errors
        let octocrab = Octocrab::builder()
            .personal_token(token.to_string())
            .add_retry_config(RetryConfig::None)
            .base_uri(api_url)?
            .build()?;

        Ok(Self { octocrab })
    }
}

#[async_trait]
impl IdentityProvider for GitHubSsoClient {
    async fn query_identity(&self, org: &str, login: &str) -> Result<String, IdentityError> {
        debug!(org, login, "Querying GitHub SAML external identity");

        let request = GraphQlRequest::external_identity(org, login);
        let response: ExternalIdentityResponse = self.octocrab.graphql(&request).await?;

        if let Some(name_id) = response.first_name_id() {
            return Ok(name_id.to_string());
        }

        if !response.errors.is_empty() {
            return Err(IdentityError::GraphQl {
                messages: response.errors.into_iter().map(|e| e.message).collect(),
            });
        }

        Err(IdentityError::NoExternalIdentity {
            org: org.to_string(),
            login: login.to_string(),
        })
    }
}

/// Resolve the author's organization email, falling back to `fallback_email`.
///
/// Resolution is advisory: every failure is logged and absorbed, so the
/// caller only ever sees which email came back.
pub async fn resolve_author_email(
    provider: &dyn IdentityProvider,
    org: &str,
    username: &str,
    fallback_email: &str,
) -> String {
    if username.is_empty() {
        debug!("No commit author username, keeping commit metadata email");
        return fallback_email.to_string();
    }

    match provider.query_identity(org, username).await {
        Ok(email) => {
            info!(username, email = %email, "Resolved author email from GitHub SSO");
            email
        }
        Err(e) => {
            warn!(
                username,
                error = %e.summary(),
                "Could not get email from GitHub SSO, using commit metadata email"
            );
            fallback_email.to_string()
        }
    }
}
