//! Posting a rendered message to one destination and publishing its ids.

use std::fmt;
use tracing::{info, warn};

use crate::output::OutputSink;
use crate::slack::{PostMessage, SlackApi};

/// Where a notification goes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// A channel by name or id, posted with link unfurling disabled
    Channel(String),
    /// A direct message to the Slack user registered with this email
    User { email: String },
}

impl Destination {
    pub fn kind(&self) -> &'static str {
        match self {
            Destination::Channel(_) => "channel",
            Destination::User { .. } => "user",
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Destination::Channel(name) => write!(f, "channel {name}"),
            Destination::User { email } => write!(f, "user {email}"),
        }
    }
}

/// Ids Slack assigned to a delivered message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryReceipt {
    pub channel_id: String,
    pub message_ts: String,
    /// Slack user id of the recipient, set only for direct messages
    pub user_id: Option<String>,
}

/// Deliver `text` to `destination` and record the resulting ids in `sink`.
///
/// Returns `None` when nothing was delivered. Lookup and post failures are
/// logged here and end this delivery only; sink failures are logged and do
/// not change the result.
pub async fn deliver(
    slack: &dyn SlackApi,
    sink: &dyn OutputSink,
    destination: &Destination,
    text: &str,
) -> Option<DeliveryReceipt> {
    let (message, user_id) = match destination {
        Destination::Channel(name) => (PostMessage::new(name, text).without_link_unfurl(), None),
        Destination::User { email } => match slack.lookup_user_by_email(email).await {
            Ok(user) => (PostMessage::new(&user.id, text), Some(user.id)),
            Err(e) => {
                warn!(email = %email, error = %e, "Could not find Slack user by email, aborting");
                return None;
            }
        },
    };

    info!(destination = %destination, message = %text, "Sending Slack message");

    let posted = match slack.post_message(&message).await {
        Ok(posted) => posted,
        Err(e) => {
            warn!(
                destination = %destination,
                error = %e,
                "Failed to post Slack message"
            );
            return None;
        }
    };

    info!(
        kind = destination.kind(),
        channel_id = %posted.channel,
        ts = %posted.ts,
        "Slack message sent"
    );

    let receipt = DeliveryReceipt {
        channel_id: posted.channel,
        message_ts: posted.ts,
        user_id,
    };

    if let Err(e) = sink.write_outputs(&receipt) {
        warn!(error = %e, "Could not write outputs to $GITHUB_OUTPUT");
    }

    Some(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{MockOutputSink, OutputError, SinkStatus};
    use crate::slack::client::MockSlackApi;
    use crate::slack::{PostedMessage, SlackError, SlackUser};

    fn posted(channel: &str) -> PostedMessage {
        PostedMessage {
            channel: channel.to_string(),
            ts: "1712345678.000200".to_string(),
        }
    }

    #[tokio::test]
    async fn test_channel_delivery_disables_unfurl_and_writes_outputs() {
        let mut slack = MockSlackApi::new();
        slack.expect_lookup_user_by_email().times(0);
        slack
            .expect_post_message()
            .withf(|m| m.channel == "#ci-alerts" && m.unfurl_links == Some(false) && m.as_user)
            .times(1)
            .returning(|_| Ok(posted("C0943A91UMD")));

        let mut sink = MockOutputSink::new();
        sink.expect_write_outputs()
            .withf(|r| {
                r.channel_id == "C0943A91UMD"
                    && r.message_ts == "1712345678.000200"
                    && r.user_id.is_none()
            })
            .times(1)
            .returning(|_| Ok(SinkStatus::Written));

        let receipt = deliver(&slack, &sink, &Destination::Channel("#ci-alerts".to_string()), "boom").await;
        assert_eq!(receipt.unwrap().channel_id, "C0943A91UMD");
    }

    #[tokio::test]
    async fn test_user_delivery_posts_to_looked_up_id() {
        let mut slack = MockSlackApi::new();
        slack
            .expect_lookup_user_by_email()
            .withf(|email| email == "octocat@acme.com")
            .times(1)
            .returning(|_| Ok(SlackUser { id: "U123".to_string() }));
        slack
            .expect_post_message()
            .withf(|m| m.channel == "U123" && m.unfurl_links.is_none())
            .times(1)
            .returning(|_| Ok(posted("D456")));

        let mut sink = MockOutputSink::new();
        sink.expect_write_outputs()
            .withf(|r| r.user_id.as_deref() == Some("U123"))
            .times(1)
            .returning(|_| Ok(SinkStatus::Skipped));

        let destination = Destination::User {
            email: "octocat@acme.com".to_string(),
        };
        let receipt = deliver(&slack, &sink, &destination, "done").await.unwrap();
        assert_eq!(receipt.channel_id, "D456");
        assert_eq!(receipt.user_id.as_deref(), Some("U123"));
    }

    #[tokio::test]
    async fn test_failed_user_lookup_aborts_without_outputs() {
        let mut slack = MockSlackApi::new();
        slack.expect_lookup_user_by_email().times(1).returning(|_| {
            Err(SlackError::Api {
                method: "users.lookupByEmail",
                error: "users_not_found".to_string(),
            })
        });
        slack.expect_post_message().times(0);

        let mut sink = MockOutputSink::new();
        sink.expect_write_outputs().times(0);

        let destination = Destination::User {
            email: "ghost@acme.com".to_string(),
        };
        assert!(deliver(&slack, &sink, &destination, "done").await.is_none());
    }

    #[tokio::test]
    async fn test_failed_post_writes_no_outputs() {
        let mut slack = MockSlackApi::new();
        slack.expect_post_message().times(1).returning(|_| {
            Err(SlackError::Api {
                method: "chat.postMessage",
                error: "channel_not_found".to_string(),
            })
        });

        let mut sink = MockOutputSink::new();
        sink.expect_write_outputs().times(0);

        let receipt = deliver(&slack, &sink, &Destination::Channel("#nope".to_string()), "x").await;
        assert!(receipt.is_none());
    }

    #[tokio::test]
    async fn test_sink_failure_keeps_receipt() {
        let mut slack = MockSlackApi::new();
        slack
            .expect_post_message()
            .times(1)
            .returning(|_| Ok(posted("C1")));

        let mut sink = MockOutputSink::new();
        sink.expect_write_outputs().times(1).returning(|_| {
            Err(OutputError::Io {
                path: "/readonly/output".into(),
                source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
            })
        });

        let receipt = deliver(&slack, &sink, &Destination::Channel("#ci".to_string()), "x").await;
        assert_eq!(receipt.map(|r| r.channel_id), Some("C1".to_string()));
    }

    #[test]
    fn test_destination_display() {
        assert_eq!(Destination::Channel("#ci".to_string()).to_string(), "channel #ci");
        assert_eq!(
            Destination::User {
                email: "a@b.com".to_string()
            }
            .to_string(),
            "user a@b.com"
        );
    }
}
