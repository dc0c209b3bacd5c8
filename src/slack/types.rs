//! Slack Web API request and response shapes.

use serde::{Deserialize, Serialize};

/// `chat.postMessage` request body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostMessage {
    pub channel: String,
    pub text: String,
    pub as_user: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unfurl_links: Option<bool>,
}

impl PostMessage {
    pub fn new(channel: &str, text: &str) -> Self {
        Self {
            channel: channel.to_string(),
            text: text.to_string(),
            as_user: true,
            unfurl_links: None,
        }
    }

    pub fn without_link_unfurl(mut self) -> Self {
        self.unfurl_links = Some(false);
        self
    }
}

/// Where and when Slack stored a posted message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub channel: String,
    pub ts: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SlackUser {
    pub id: String,
}

/// Every Web API response carries `ok`, plus `error` when it is false
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub payload: T,
}

#[derive(Debug, Deserialize)]
pub struct LookupByEmailPayload {
    #[serde(default)]
    pub user: Option<SlackUser>,
}

#[derive(Debug, Deserialize)]
pub struct PostMessagePayload {
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub ts: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_post_message_body() {
        let body = serde_json::to_value(PostMessage::new("#ci", "hello").without_link_unfurl()).unwrap();
        assert_eq!(
            body,
            json!({"channel": "#ci", "text": "hello", "as_user": true, "unfurl_links": false})
        );
    }

    #[test]
    fn test_post_message_omits_unset_unfurl() {
        let body = serde_json::to_value(PostMessage::new("U123", "hi")).unwrap();
        assert!(body.get("unfurl_links").is_none());
    }

    #[test]
    fn test_error_response_parses() {
        let response: ApiResponse<LookupByEmailPayload> =
            serde_json::from_value(json!({"ok": false, "error": "users_not_found"})).unwrap();
        assert!(!response.ok);
        assert_eq!(response.error.as_deref(), Some("users_not_found"));
        assert!(response.payload.user.is_none());
    }

    #[test]
    fn test_post_response_parses() {
        let response: ApiResponse<PostMessagePayload> = serde_json::from_value(json!({
            "ok": true,
            "channel": "C0943A91UMD",
            "ts": "1712345678.000200",
            "message": {"text": "hi"}
        }))
        .unwrap();
        assert!(response.ok);
        assert_eq!(response.payload.channel.as_deref(), Some("C0943A91UMD"));
        assert_eq!(response.payload.ts.as_deref(), Some("1712345678.000200"));
    }
}
