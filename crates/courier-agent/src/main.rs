//! courier-agent -- polls the coordinator for commands and submits results.
//!
//! The agent registers under its id (generated when not supplied), then
//! loops forever: drain queued commands, execute each one, submit the
//! results, sleep for the poll interval. Transport failures are logged and
//! retried on the next cycle; the coordinator tolerates re-registration
//! and duplicate submissions.

mod client;
mod executor;

use std::time::Duration;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use courier_types::AgentId;

use crate::client::CoordinatorClient;

/// Courier polling agent.
#[derive(Parser, Debug)]
#[command(name = "courier-agent", version, about)]
struct Args {
    /// Coordinator base URL
    #[arg(long, default_value = "http://localhost:8080")]
    server: String,

    /// Seconds between polls
    #[arg(long, default_value_t = 10)]
    interval: u64,

    /// Agent identifier; generated when omitted
    #[arg(long)]
    agent_id: Option<String>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let agent_id = args
        .agent_id
        .map(AgentId::from)
        .unwrap_or_else(AgentId::generate);
    let interval = Duration::from_secs(args.interval);
    let client = CoordinatorClient::new(&args.server, agent_id.clone());

    info!(agent_id = %agent_id, server = %args.server, "starting courier agent");

    // Keep retrying until the coordinator is reachable.
    loop {
        match client.register().await {
            Ok(()) => break,
            Err(e) => {
                warn!(error = %e, "registration failed, retrying");
                tokio::time::sleep(interval).await;
            }
        }
    }
    info!(agent_id = %agent_id, interval_secs = args.interval, "registered, polling for commands");

    loop {
        match client.poll_commands().await {
            Ok(commands) => {
                for cmd in commands {
                    info!(command_id = %cmd.id, command = %cmd.command, "executing command");
                    let result = executor::execute(&cmd.command).await;
                    if let Err(e) = client.submit_result(&cmd.id, result).await {
                        error!(command_id = %cmd.id, error = %e, "failed to submit result");
                    }
                }
            }
            Err(e) => warn!(error = %e, "poll failed"),
        }
        tokio::time::sleep(interval).await;
    }
}
