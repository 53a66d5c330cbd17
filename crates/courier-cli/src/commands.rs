//! Operator subcommand implementations.

use std::time::{Duration, Instant};

use anyhow::{bail, Result};
use serde_json::Value;

use courier_types::{AgentId, CommandId, CommandStatus};

use crate::api::OperatorClient;

pub async fn agents(client: &OperatorClient) -> Result<()> {
    let agents = client.agents().await?;
    if agents.is_empty() {
        println!("no agents registered");
        return Ok(());
    }
    for agent in agents {
        println!("{agent}");
    }
    Ok(())
}

pub async fn send(
    client: &OperatorClient,
    agent_id: &AgentId,
    command: &str,
    wait_for_result: bool,
    timeout_secs: u64,
) -> Result<()> {
    let command_id = client.send(agent_id, command).await?;
    println!("command id: {command_id}");
    if wait_for_result {
        wait(client, &command_id, timeout_secs).await?;
    }
    Ok(())
}

pub async fn status(client: &OperatorClient, command_id: &CommandId) -> Result<()> {
    let record = client.status(command_id).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

pub async fn history(client: &OperatorClient, agent_id: &AgentId) -> Result<()> {
    let records = client.history(agent_id).await?;
    if records.is_empty() {
        println!("no commands issued to {agent_id}");
        return Ok(());
    }
    for record in records {
        let status = record.status.to_string();
        println!("{}  {status:<9}  {}", record.id, record.command);
    }
    Ok(())
}

/// Poll the command's status once per second until it completes, then print
/// the result. The coordinator has no notion of waiters; this loop is the
/// only timeout mechanism.
pub async fn wait(client: &OperatorClient, command_id: &CommandId, timeout_secs: u64) -> Result<()> {
    let deadline = Instant::now() + Duration::from_secs(timeout_secs);
    loop {
        let record = client.status(command_id).await?;
        if record.status == CommandStatus::Completed {
            match record.result {
                Some(result) => println!("{}", format_result(&result)),
                None => println!("completed with no result"),
            }
            return Ok(());
        }
        if Instant::now() >= deadline {
            bail!(
                "command {command_id} still {} after {timeout_secs}s",
                record.status
            );
        }
        tokio::time::sleep(Duration::from_secs(1)).await;
    }
}

/// Render a result payload for the terminal.
///
/// Shell results get their streams printed verbatim with the exit code;
/// anything else is rendered as pretty JSON.
fn format_result(result: &Value) -> String {
    let Some(obj) = result.as_object() else {
        return serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
    };

    if !obj.contains_key("stdout") && !obj.contains_key("exit_code") {
        return serde_json::to_string_pretty(result).unwrap_or_else(|_| result.to_string());
    }

    let mut out = String::new();
    if let Some(stdout) = obj.get("stdout").and_then(Value::as_str) {
        out.push_str(stdout);
        if !stdout.is_empty() && !stdout.ends_with('\n') {
            out.push('\n');
        }
    }
    if let Some(stderr) = obj.get("stderr").and_then(Value::as_str) {
        if !stderr.is_empty() {
            out.push_str("--- stderr ---\n");
            out.push_str(stderr);
            if !stderr.ends_with('\n') {
                out.push('\n');
            }
        }
    }
    if let Some(code) = obj.get("exit_code").and_then(Value::as_i64) {
        out.push_str(&format!("exit code: {code}"));
    }
    out
}
