use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

#[cfg(test)]
use mockall::automock;

use super::errors::SlackError;
use super::types::{
    ApiResponse, LookupByEmailPayload, PostMessage, PostMessagePayload, PostedMessage, SlackUser,
};

/// The two Slack Web API capabilities the notifier needs
#[cfg_attr(test, automock)]
#[async_trait]
pub trait SlackApi: Send + Sync {
    /// `users.lookupByEmail`
    async fn lookup_user_by_email(&self, email: &str) -> Result<SlackUser, SlackError>;

    /// `chat.postMessage`
    async fn post_message(&self, message: &PostMessage) -> Result<PostedMessage, SlackError>;
}

/// Slack Web API client authenticated with a bot token
#[derive(Debug, Clone)]
pub struct SlackClient {
    client: reqwest::Client,
    token: String,
    api_url: String,
}

impl SlackClient {
    pub fn new(token: &str, api_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            token: token.to_string(),
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/{}", self.api_url, method)
    }

    /// Send an API call and unwrap Slack's `ok`/`error` envelope.
    ///
    /// Slack reports most failures with HTTP 200 and `ok: false`, so both the
    /// status code and the envelope are checked.
    async fn call<T: DeserializeOwned>(
        &self,
        method: &'static str,
        request: reqwest::RequestBuilder,
    ) -> Result<T, SlackError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SlackError::Status {
                method,
                status: status.as_u16(),
                body,
            });
        }

        let envelope: ApiResponse<T> = response.json().await?;
        if !envelope.ok {
            return Err(SlackError::Api {
                method,
                error: envelope.error.unwrap_or_else(|| "unknown_error".to_string()),
            });
        }

        Ok(envelope.payload)
    }
}

#[async_trait]
impl SlackApi for SlackClient {
    async fn lookup_user_by_email(&self, email: &str) -> Result<SlackUser, SlackError> {
        const METHOD: &str = "users.lookupByEmail";
        debug!(email, "Looking up Slack user");

        let request = self
            .client
            .get(self.endpoint(METHOD))
            .query(&[("email", email)]);
        let payload: LookupByEmailPayload = self.call(METHOD, request).await?;

        payload.user.ok_or(SlackError::MissingField {
            method: METHOD,
            field: "user",
        })
    }

    async fn post_message(&self, message: &PostMessage) -> Result<PostedMessage, SlackError> {
        const METHOD: &str = "chat.postMessage";
        debug!(channel = %message.channel, "Posting Slack message");

        let request = self.client.post(self.endpoint(METHOD)).json(message);
        let payload: PostMessagePayload = self.call(METHOD, request).await?;

        let channel = payload.channel.ok_or(SlackError::MissingField {
            method: METHOD,
            field: "channel",
        })?;
        let ts = payload.ts.ok_or(SlackError::MissingField {
            method: METHOD,
            field: "ts",
        })?;

        Ok(PostedMessage { channel, ts })
    }
}
