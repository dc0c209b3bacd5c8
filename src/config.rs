use anyhow::{Context, Result};
use config::{Config, Environment};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::model::{Commit, CommitStatus};

/// Value of `SEND_MESSAGE_TO_CHANNEL` meaning "do not post to a channel"
pub const NO_CHANNEL_SENTINEL: &str = "null";

pub const DEFAULT_GITHUB_ORG: &str = "masmovil";
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";
pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

/// Environment variables the notifier reads
pub const ENV_KEYS: &[&str] = &[
    "SLACK_ACCESS_TOKEN",
    "GITHUB_ACCESS_TOKEN",
    "GITHUB_ORG",
    "GITHUB_API_URL",
    "SLACK_API_URL",
    "COMMIT_URL",
    "COMMIT_AUTHOR_USERNAME",
    "COMMIT_AUTHOR_EMAIL",
    "COMMIT_MESSAGE",
    "STATUS_NAME",
    "STATUS_DESCRIPTION",
    "STATUS_CONCLUSION",
    "STATUS_URL",
    "SEND_MESSAGE_TO_CHANNEL",
    "SEND_MESSAGE_TO_USER",
    "GITHUB_OUTPUT",
];

/// Everything one notifier run needs, read once from the environment.
///
/// Field names are the lower-cased environment variable names
/// (`SLACK_ACCESS_TOKEN` → `slack_access_token`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Slack bot token
    pub slack_access_token: String,
    /// GitHub token used for the SAML identity lookup
    pub github_access_token: String,
    /// Organization whose SAML provider maps logins to emails
    pub github_org: String,
    pub github_api_url: String,
    pub slack_api_url: String,

    pub commit_url: String,
    pub commit_author_username: String,
    pub commit_author_email: String,
    pub commit_message: String,

    pub status_name: String,
    pub status_description: String,
    pub status_conclusion: String,
    pub status_url: String,

    /// Channel to report failures to, or `"null"`
    pub send_message_to_channel: String,
    /// `"true"` to DM the commit author
    pub send_message_to_user: String,
    /// File collecting step outputs
    pub github_output: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            slack_access_token: String::new(),
            github_access_token: String::new(),
            github_org: DEFAULT_GITHUB_ORG.to_string(),
            github_api_url: DEFAULT_GITHUB_API_URL.to_string(),
            slack_api_url: DEFAULT_SLACK_API_URL.to_string(),
            commit_url: String::new(),
            commit_author_username: String::new(),
            commit_author_email: String::new(),
            commit_message: String::new(),
            status_name: String::new(),
            status_description: String::new(),
            status_conclusion: String::new(),
            status_url: String::new(),
            send_message_to_channel: NO_CHANNEL_SENTINEL.to_string(),
            send_message_to_user: String::new(),
            github_output: String::new(),
        }
    }
}

impl NotifierConfig {
    /// Load configuration from the process environment.
    ///
    /// Only the notifier's own variables are read. One of them holding a
    /// value that is not valid UTF-8 is ignored with a warning, as if unset.
    pub fn load() -> Result<Self> {
        let vars = std::env::vars_os().filter_map(|(key, value)| {
            let key = key
                .into_string()
                .ok()
                .filter(|key| ENV_KEYS.contains(&key.as_str()))?;
            match value.into_string() {
                Ok(value) => Some((key, value)),
                Err(_) => {
                    tracing::warn!(variable = %key, "Ignoring environment variable that is not valid UTF-8");
                    None
                }
            }
        });
        Self::from_vars(vars)
    }

    /// Load configuration from an explicit set of variables, as if they were
    /// the whole environment
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let source = vars
            .into_iter()
            .map(|(key, value)| (key.into().to_lowercase(), value.into()))
            .collect();
        // No separator or parsing: keys stay flat and every value stays a string,
        // so "true" and "null" reach the predicates below untouched.
        let config = Config::builder()
            .add_source(Environment::default().source(Some(source)))
            .build()
            .context("Failed to read notifier configuration from environment")?;

        config
            .try_deserialize()
            .context("Failed to deserialize notifier configuration")
    }

    /// Load a dotenv file. An explicit path must exist; without one, `.env`
    /// in the working directory is loaded when present.
    ///
    /// Runs before logging is set up so the file can carry `RUST_LOG`; the
    /// returned path lets the caller log what was loaded.
    pub fn load_env_file(path: Option<&Path>) -> Result<Option<PathBuf>> {
        match path {
            Some(path) => {
                dotenvy::from_path(path)
                    .with_context(|| format!("Failed to load env file {}", path.display()))?;
                Ok(Some(path.to_path_buf()))
            }
            None if Path::new(".env").exists() => {
                let loaded = dotenvy::dotenv().context("Failed to load .env file")?;
                Ok(Some(loaded))
            }
            None => Ok(None),
        }
    }

    /// Channel to post the failure report to, if any
    pub fn channel(&self) -> Option<&str> {
        match self.send_message_to_channel.as_str() {
            "" | NO_CHANNEL_SENTINEL => None,
            channel => Some(channel),
        }
    }

    pub fn send_to_user(&self) -> bool {
        self.send_message_to_user == "true"
    }

    pub fn github_output(&self) -> Option<&Path> {
        if self.github_output.is_empty() {
            None
        } else {
            Some(Path::new(&self.github_output))
        }
    }

    /// Commit as described by CI metadata, before any SSO lookup
    pub fn commit(&self) -> Commit {
        Commit::new(
            &self.commit_url,
            &self.commit_author_username,
            &self.commit_author_email,
            &self.commit_message,
        )
    }

    pub fn commit_status(&self) -> CommitStatus {
        CommitStatus::new(
            &self.status_name,
            &self.status_description,
            &self.status_conclusion,
            &self.status_url,
        )
    }

    /// Names of required tokens that are not set
    pub fn missing_tokens(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.slack_access_token.is_empty() {
            missing.push("SLACK_ACCESS_TOKEN");
        }
        if self.github_access_token.is_empty() {
            missing.push("GITHUB_ACCESS_TOKEN");
        }
        missing
    }
}
