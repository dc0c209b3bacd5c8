//! Step outputs for the CI runner (`$GITHUB_OUTPUT`).

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[cfg(test)]
use mockall::automock;

use crate::delivery::DeliveryReceipt;

/// Output key holding the Slack message timestamp
pub const MESSAGE_ID_KEY: &str = "slack_message_id";
/// Output key holding the Slack channel (or DM conversation) id
pub const CHANNEL_ID_KEY: &str = "slack_channel_id";

// Per-destination keys; unlike the shared pair above they survive a run
// that posts to both destinations.
pub const DIRECT_MESSAGE_ID_KEY: &str = "direct_slack_message_id";
pub const DIRECT_USER_ID_KEY: &str = "direct_slack_user_id";
pub const CHANNEL_MESSAGE_ID_KEY: &str = "channel_slack_message_id";
pub const CHANNEL_CHANNEL_ID_KEY: &str = "channel_slack_channel_id";

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("could not write outputs to {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SinkStatus {
    Written,
    /// No sink configured
    Skipped,
}

#[cfg_attr(test, automock)]
pub trait OutputSink: Send + Sync {
    /// Record a delivery's ids for downstream pipeline steps
    fn write_outputs(&self, receipt: &DeliveryReceipt) -> Result<SinkStatus, OutputError>;
}

/// Appends `key=value` lines to the file GitHub Actions names in `$GITHUB_OUTPUT`
#[derive(Debug, Clone, Default)]
pub struct GitHubOutputFile {
    path: Option<PathBuf>,
}

impl GitHubOutputFile {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Render the output lines for a receipt: the shared pair, then the
/// destination-specific pair
pub fn format_outputs(receipt: &DeliveryReceipt) -> String {
    let ts = &receipt.message_ts;
    let shared = format!("{MESSAGE_ID_KEY}={ts}\n{CHANNEL_ID_KEY}={}\n", receipt.channel_id);

    match &receipt.user_id {
        Some(user_id) => format!(
            "{shared}{DIRECT_MESSAGE_ID_KEY}={ts}\n{DIRECT_USER_ID_KEY}={user_id}\n"
        ),
        None => format!(
            "{shared}{CHANNEL_MESSAGE_ID_KEY}={ts}\n{CHANNEL_CHANNEL_ID_KEY}={}\n",
            receipt.channel_id
        ),
    }
}

impl OutputSink for GitHubOutputFile {
    fn write_outputs(&self, receipt: &DeliveryReceipt) -> Result<SinkStatus, OutputError> {
        let Some(path) = self.path.as_deref() else {
            info!("No $GITHUB_OUTPUT environment variable set, skipping output writing");
            return Ok(SinkStatus::Skipped);
        };

        let io_error = |source| OutputError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(path)
            .map_err(io_error)?;
        file.write_all(format_outputs(receipt).as_bytes())
            .map_err(io_error)?;

        debug!(path = %path.display(), "Wrote Slack ids to step outputs");
        Ok(SinkStatus::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn receipt() -> DeliveryReceipt {
        DeliveryReceipt {
            channel_id: "C0943A91UMD".to_string(),
            message_ts: "1712345678.000200".to_string(),
            user_id: None,
        }
    }

    #[test]
    fn test_format_outputs_for_channel() {
        assert_eq!(
            format_outputs(&receipt()),
            "slack_message_id=1712345678.000200\nslack_channel_id=C0943A91UMD\n\
             channel_slack_message_id=1712345678.000200\nchannel_slack_channel_id=C0943A91UMD\n"
        );
    }

    #[test]
    fn test_format_outputs_for_direct_message() {
        let receipt = DeliveryReceipt {
            channel_id: "D0DM".to_string(),
            message_ts: "1712345679.000100".to_string(),
            user_id: Some("U123".to_string()),
        };
        assert_eq!(
            format_outputs(&receipt),
            "slack_message_id=1712345679.000100\nslack_channel_id=D0DM\n\
             direct_slack_message_id=1712345679.000100\ndirect_slack_user_id=U123\n"
        );
    }

    #[test]
    fn test_appends_to_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "previous=value\n").unwrap();

        let sink = GitHubOutputFile::new(Some(&path));
        assert_eq!(sink.write_outputs(&receipt()).unwrap(), SinkStatus::Written);
        assert_eq!(sink.write_outputs(&receipt()).unwrap(), SinkStatus::Written);

        let contents = std::fs::read_to_string(&path).unwrap();
        let block = format_outputs(&receipt());
        assert_eq!(contents, format!("previous=value\n{block}{block}"));
    }

    #[test]
    fn test_no_path_is_skipped() {
        let sink = GitHubOutputFile::new(None);
        assert_eq!(sink.write_outputs(&receipt()).unwrap(), SinkStatus::Skipped);
    }

    #[test]
    fn test_unwritable_path_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing-dir").join("output");

        let sink = GitHubOutputFile::new(Some(&path));
        let err = sink.write_outputs(&receipt()).unwrap_err();
        assert!(err.to_string().starts_with("could not write outputs to"));
    }
}
