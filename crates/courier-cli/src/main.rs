//! courier -- operator console for the courier dispatch coordinator.

mod api;
mod commands;
mod console;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use courier_types::CommandId;

use crate::api::OperatorClient;

/// Courier -- issue commands to remote agents and inspect their results.
#[derive(Parser, Debug)]
#[command(name = "courier", version, about)]
struct Cli {
    /// Coordinator base URL
    #[arg(long, global = true, default_value = "http://localhost:8080")]
    server: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List registered agents
    Agents,

    /// Issue a command to an agent
    Send {
        /// Target agent identifier
        agent_id: String,

        /// Command text to execute on the agent
        command: String,

        /// Wait for the result and print it
        #[arg(long)]
        wait: bool,

        /// Seconds to wait before giving up
        #[arg(long, default_value_t = 60)]
        timeout: u64,
    },

    /// Show the full record for a command
    Status {
        command_id: CommandId,
    },

    /// Show every command issued to an agent, in issuance order
    History {
        agent_id: String,
    },

    /// Wait for a command to complete and print its result
    Wait {
        command_id: CommandId,

        /// Seconds to wait before giving up
        #[arg(long, default_value_t = 60)]
        timeout: u64,
    },

    /// Interactive operator console
    Console,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();
    let client = OperatorClient::new(&cli.server);

    match cli.command {
        Commands::Agents => commands::agents(&client).await,
        Commands::Send {
            agent_id,
            command,
            wait,
            timeout,
        } => commands::send(&client, &agent_id.into(), &command, wait, timeout).await,
        Commands::Status { command_id } => commands::status(&client, &command_id).await,
        Commands::History { agent_id } => commands::history(&client, &agent_id.into()).await,
        Commands::Wait {
            command_id,
            timeout,
        } => commands::wait(&client, &command_id, timeout).await,
        Commands::Console => console::run(&client).await,
    }
}
