pub mod client;
pub mod dry_run;
pub mod errors;
pub mod types;

pub use client::{SlackApi, SlackClient};
pub use dry_run::DryRunSlack;
pub use errors::SlackError;
pub use types::{PostMessage, PostedMessage, SlackUser};
