// notify-slack-ci library
// Posts CI job results for a commit to Slack, resolving the author through GitHub SSO

pub mod config;
pub mod delivery;
pub mod github;
pub mod message;
pub mod model;
pub mod notifier;
pub mod output;
pub mod slack;
pub mod telemetry;

// Re-export key types for easy access
pub use config::NotifierConfig;
pub use delivery::{deliver, DeliveryReceipt, Destination};
pub use github::{resolve_author_email, GitHubSsoClient, IdentityError, IdentityProvider};
pub use message::{render_channel_failure, render_direct_status, render_user_mention};
pub use model::{Commit, CommitStatus, StatusOutcome};
pub use notifier::{Attempt, Notifier, RunReport};
pub use output::{GitHubOutputFile, OutputError, OutputSink, SinkStatus};
pub use slack::{DryRunSlack, SlackApi, SlackClient, SlackError};
pub use telemetry::{create_run_span, generate_correlation_id, init_telemetry, LogFormat};
