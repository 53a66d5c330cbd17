//! courierd -- the courier dispatch coordinator.
//!
//! Holds all dispatch state in memory for the life of the process; nothing
//! is persisted across restarts.

use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use courier_core::DispatchStore;

/// Courier dispatch coordinator.
#[derive(Parser, Debug)]
#[command(name = "courierd", version, about)]
struct Args {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080")]
    listen: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = Args::parse();
    let store = Arc::new(DispatchStore::new());

    courier_server::http::serve(&args.listen, store)
        .await
        .map_err(|e| anyhow::anyhow!(e))
}
