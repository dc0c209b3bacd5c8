//! Slack mrkdwn rendering for the two notification shapes.
//!
//! Links use Slack's `<url|label>` syntax and user mentions use `<@ID>`.
//! Everything here is a pure function of its inputs.

use crate::model::{Commit, CommitStatus, StatusOutcome};

const GITHUB_PROFILE_BASE: &str = "https://github.com/";

/// Mention the commit author, linking their GitHub profile.
///
/// With a known Slack user id the mention pings them and keeps the profile
/// link in parentheses; without one only the profile link is rendered.
pub fn render_user_mention(slack_user_id: Option<&str>, github_username: &str) -> String {
    let profile_url = format!("{GITHUB_PROFILE_BASE}{github_username}");
    match slack_user_id {
        Some(id) => format!("<@{id}> (<{profile_url}|{github_username}>)"),
        None => format!("<{profile_url}|{github_username}>"),
    }
}

/// Failure report posted to a channel
pub fn render_channel_failure(
    commit: &Commit,
    status: &CommitStatus,
    slack_user_id: Option<&str>,
) -> String {
    let mention = render_user_mention(slack_user_id, &commit.author_username);
    format!(
        ":warning: The commit <{}|\"_{}_\"> by {} has failed the pipeline step <{}|{}>",
        commit.url,
        commit.title(),
        mention,
        status.url,
        status.name,
    )
}

/// Emoji and phrase for a status outcome. Unknown outcomes render as blanks.
pub fn outcome_decoration(outcome: StatusOutcome) -> (&'static str, &'static str) {
    match outcome {
        StatusOutcome::Succeeded => (":large_green_circle:", "was successful"),
        StatusOutcome::Failed => (":red_circle:", "failed"),
        StatusOutcome::Unknown => ("", ""),
    }
}

/// Direct message telling the author how their CI job ended
pub fn render_direct_status(commit: &Commit, status: &CommitStatus) -> String {
    let (emoji, phrase) = outcome_decoration(status.outcome());
    format!(
        "{} The CI job <{}|{}> for <{}|\"_{}_\"> {}",
        emoji,
        status.url,
        status.name,
        commit.url,
        commit.title(),
        phrase,
    )
}
