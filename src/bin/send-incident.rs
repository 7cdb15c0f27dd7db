//! Manual smoke test: send one basic error to a real webhook.

use std::sync::Arc;

use anyhow::ensure;
use clap::Parser;

use incident_notify::{ErrorReport, IncidentNotifier, TracingLogger};

/// Send a test incident to a chat webhook
#[derive(Parser)]
#[command(name = "send-incident")]
#[command(about = "Send a test incident to a chat webhook")]
#[command(version)]
struct Cli {
    /// Webhook URL, including its key/token query parameters
    #[arg(long, env = "WEBHOOK")]
    webhook: String,

    /// Thread key for grouping messages
    #[arg(long, default_value = "SVILUPPO")]
    thread: String,

    /// Message for the demo error
    #[arg(long, default_value = "Very basic error")]
    message: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("incident_notify=debug,send_incident=info")
        .init();

    let cli = Cli::parse();

    let notifier = IncidentNotifier::new(cli.webhook, Arc::new(TracingLogger))?
        .with_default_thread(cli.thread);

    let error = std::io::Error::other(cli.message);
    let delivered = notifier.report(&ErrorReport(error)).await;

    ensure!(delivered, "incident was not delivered");
    Ok(())
}
