use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Instrument};

use notify_slack_ci::{
    create_run_span, generate_correlation_id, init_telemetry, LogFormat, Notifier, NotifierConfig,
};

#[derive(Parser)]
#[command(name = "notify-slack-ci")]
#[command(version, about = "Notify Slack about the result of a CI job for a commit")]
#[command(long_about = "Posts a CI job result to Slack: a failure report to the channel in \
                       SEND_MESSAGE_TO_CHANNEL and/or a direct message to the commit author when \
                       SEND_MESSAGE_TO_USER is \"true\". The author's Slack account is found through \
                       their GitHub organization SSO email. All job facts are read from environment \
                       variables; delivery failures are logged and never fail the pipeline.")]
struct Cli {
    /// Log Slack messages instead of sending them
    #[arg(long, help = "Log Slack messages instead of sending them (GitHub lookup still runs)")]
    dry_run: bool,
    /// Dotenv file to load before reading configuration
    #[arg(long, value_name = "PATH", help = "Load environment variables from this file (default: ./.env if present)")]
    env_file: Option<PathBuf>,
    /// Console log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Before telemetry, so RUST_LOG may come from the env file
    let env_file = NotifierConfig::load_env_file(cli.env_file.as_deref())?;
    init_telemetry(cli.log_format)?;
    if let Some(path) = env_file {
        info!(path = %path.display(), "Loaded environment variables from env file");
    }
    let config = NotifierConfig::load()?;

    let correlation_id = generate_correlation_id();
    let span = create_run_span(&correlation_id, cli.dry_run);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(
        async {
            let notifier = Notifier::from_config(config, cli.dry_run)?;
            let report = notifier.run().await;

            let delivered = report.attempts().filter(|a| a.delivered()).count();
            info!(
                attempted = report.attempts().count(),
                delivered,
                "Notification run finished"
            );
            Ok::<(), anyhow::Error>(())
        }
        .instrument(span),
    )
}
