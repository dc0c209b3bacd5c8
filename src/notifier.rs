//! One notifier run: resolve the author, pick destinations, deliver.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::NotifierConfig;
use crate::delivery::{deliver, DeliveryReceipt, Destination};
use crate::github::{resolve_author_email, GitHubSsoClient, IdentityProvider};
use crate::message::{render_channel_failure, render_direct_status};
use crate::model::{Commit, CommitStatus, StatusOutcome};
use crate::output::{GitHubOutputFile, OutputSink};
use crate::slack::{DryRunSlack, SlackApi, SlackClient};

/// A delivery the run attempted and what came of it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attempt {
    pub destination: Destination,
    pub receipt: Option<DeliveryReceipt>,
}

impl Attempt {
    pub fn delivered(&self) -> bool {
        self.receipt.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Author email after SSO resolution
    pub author_email: String,
    pub direct: Option<Attempt>,
    pub channel: Option<Attempt>,
}

impl RunReport {
    pub fn attempts(&self) -> impl Iterator<Item = &Attempt> {
        self.direct.iter().chain(self.channel.iter())
    }
}

pub struct Notifier {
    config: NotifierConfig,
    identity: Box<dyn IdentityProvider>,
    slack: Box<dyn SlackApi>,
    sink: Box<dyn OutputSink>,
}

impl Notifier {
    pub fn new(
        config: NotifierConfig,
        identity: Box<dyn IdentityProvider>,
        slack: Box<dyn SlackApi>,
        sink: Box<dyn OutputSink>,
    ) -> Self {
        Self {
            config,
            identity,
            slack,
            sink,
        }
    }

    /// Build a notifier with the real GitHub and Slack clients.
    ///
    /// With `dry_run` Slack calls are only logged; the GitHub lookup still runs.
    pub fn from_config(config: NotifierConfig, dry_run: bool) -> Result<Self> {
        for token in config.missing_tokens() {
            warn!(variable = token, "Access token is not set, API calls will fail");
        }

        let identity = GitHubSsoClient::new(&config.github_access_token, &config.github_api_url)
            .context("Failed to build GitHub API client")?;
        let slack: Box<dyn SlackApi> = if dry_run {
            info!("Dry run: Slack messages will be logged, not sent");
            Box::new(DryRunSlack)
        } else {
            Box::new(SlackClient::new(&config.slack_access_token, &config.slack_api_url))
        };
        let sink = GitHubOutputFile::new(config.github_output());

        Ok(Self::new(config, Box::new(identity), slack, Box::new(sink)))
    }

    pub fn config(&self) -> &NotifierConfig {
        &self.config
    }

    /// Run once. Every failure is logged and absorbed; the report says what happened.
    pub async fn run(&self) -> RunReport {
        info!("Running notify-slack-ci");

        let commit = self.resolve_commit().await;
        let status = self.config.commit_status();
        let channel = self.config.channel();
        let send_to_user = self.config.send_to_user();

        let mut report = RunReport {
            author_email: commit.author_email.clone(),
            ..RunReport::default()
        };

        if channel.is_none() && !send_to_user {
            info!("Neither a channel nor a direct message was requested, nothing to send");
            return report;
        }

        if channel.is_some() && send_to_user {
            warn!(
                "Both direct message and channel message will be sent, \
                 but only the last one will be outputted to GitHub Actions"
            );
        }

        if send_to_user {
            report.direct = Some(self.notify_author(&commit, &status).await);
        }

        if let Some(channel) = channel {
            report.channel = Some(self.notify_channel(channel, &commit, &status).await);
        }

        report
    }

    /// Commit from CI metadata with the author email swapped for the SSO one when found
    async fn resolve_commit(&self) -> Commit {
        let commit = self.config.commit();
        let email = resolve_author_email(
            self.identity.as_ref(),
            &self.config.github_org,
            &commit.author_username,
            &commit.author_email,
        )
        .await;
        commit.with_author_email(email)
    }

    async fn notify_author(&self, commit: &Commit, status: &CommitStatus) -> Attempt {
        info!(email = %commit.author_email, "Sending message to user");

        if status.outcome() == StatusOutcome::Unknown {
            warn!(conclusion = %status.conclusion, "Got unknown commit status");
        }
        let text = render_direct_status(commit, status);

        let destination = Destination::User {
            email: commit.author_email.clone(),
        };
        let receipt = deliver(self.slack.as_ref(), self.sink.as_ref(), &destination, &text).await;
        Attempt {
            destination,
            receipt,
        }
    }

    async fn notify_channel(&self, channel: &str, commit: &Commit, status: &CommitStatus) -> Attempt {
        info!(channel, "Sending message to channel");

        let slack_user_id = match self.slack.lookup_user_by_email(&commit.author_email).await {
            Ok(user) => Some(user.id),
            Err(e) => {
                info!(
                    email = %commit.author_email,
                    error = %e,
                    "Could not get Slack user by email, mentioning GitHub profile only"
                );
                None
            }
        };
        let text = render_channel_failure(commit, status, slack_user_id.as_deref());

        let destination = Destination::Channel(channel.to_string());
        let receipt = deliver(self.slack.as_ref(), self.sink.as_ref(), &destination, &text).await;
        Attempt {
            destination,
            receipt,
        }
    }
}
