//! Stand-in Slack client for local runs: logs instead of posting.

use async_trait::async_trait;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use super::client::SlackApi;
use super::errors::SlackError;
use super::types::{PostMessage, PostedMessage, SlackUser};

/// User id returned for every lookup
pub const DRY_RUN_USER_ID: &str = "U0DRYRUN";

#[derive(Debug, Default, Clone)]
pub struct DryRunSlack;

#[async_trait]
impl SlackApi for DryRunSlack {
    async fn lookup_user_by_email(&self, email: &str) -> Result<SlackUser, SlackError> {
        info!(email, user_id = DRY_RUN_USER_ID, "[dry-run] Slack user lookup");
        Ok(SlackUser {
            id: DRY_RUN_USER_ID.to_string(),
        })
    }

    async fn post_message(&self, message: &PostMessage) -> Result<PostedMessage, SlackError> {
        info!(
            channel = %message.channel,
            unfurl_links = ?message.unfurl_links,
            text = %message.text,
            "[dry-run] Slack message not sent"
        );
        Ok(PostedMessage {
            channel: message.channel.clone(),
            ts: synthetic_ts(),
        })
    }
}

/// Slack-style `seconds.micros` timestamp for the current time
fn synthetic_ts() -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{}.{:06}", now.as_secs(), now.subsec_micros())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dry_run_echoes_destination() {
        let slack = DryRunSlack;
        let posted = slack
            .post_message(&PostMessage::new("#ci-alerts", "hello"))
            .await
            .unwrap();

        assert_eq!(posted.channel, "#ci-alerts");
        let (secs, micros) = posted.ts.split_once('.').unwrap();
        assert!(secs.parse::<u64>().is_ok());
        assert_eq!(micros.len(), 6);
    }

    #[tokio::test]
    async fn test_dry_run_lookup_always_succeeds() {
        let user = DryRunSlack.lookup_user_by_email("anyone@acme.com").await.unwrap();
        assert_eq!(user.id, DRY_RUN_USER_ID);
    }
}
