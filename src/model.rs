//! Commit and CI status records assembled from the pipeline environment.

use serde::{Deserialize, Serialize};

/// The commit that triggered the CI job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub url: String,
    pub author_username: String,
    pub author_email: String,
    pub message: String,
}

impl Commit {
    pub fn new(url: &str, author_username: &str, author_email: &str, message: &str) -> Self {
        Self {
            url: url.to_string(),
            author_username: author_username.to_string(),
            author_email: author_email.to_string(),
            message: message.to_string(),
        }
    }

    /// First line of the commit message, up to the first `\n`
    pub fn title(&self) -> &str {
        match self.message.split_once('\n') {
            Some((title, _)) => title,
            None => &self.message,
        }
    }

    /// Replace the author email, e.g. with the one resolved through SSO
    pub fn with_author_email(self, author_email: String) -> Self {
        Self {
            author_email,
            ..self
        }
    }
}

/// Outcome of a status check as far as the notifier cares
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusOutcome {
    Succeeded,
    Failed,
    Unknown,
}

/// A CI status check reported for the commit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitStatus {
    pub name: String,
    pub description: String,
    pub conclusion: String,
    pub url: String,
}

impl CommitStatus {
    pub fn new(name: &str, description: &str, conclusion: &str, url: &str) -> Self {
        Self {
            name: name.to_string(),
            description: description.to_string(),
            conclusion: conclusion.to_string(),
            url: url.to_string(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.conclusion == "success"
    }

    pub fn failed(&self) -> bool {
        self.conclusion == "failure" || self.conclusion == "error"
    }

    pub fn outcome(&self) -> StatusOutcome {
        if self.succeeded() {
            StatusOutcome::Succeeded
        } else if self.failed() {
            StatusOutcome::Failed
        } else {
            StatusOutcome::Unknown
        }
    }
}
