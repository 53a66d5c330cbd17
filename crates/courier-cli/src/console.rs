//! Interactive operator console.
//!
//! A line-based shell over the same operations as the subcommands. `send`
//! waits for the result automatically, matching how operators usually want
//! the round trip to read.

use std::io::{BufRead, Write};

use anyhow::Result;

use courier_types::CommandId;

use crate::api::OperatorClient;
use crate::commands;

const HELP: &str = "\
commands:
  agents                    list registered agents
  send <agent_id> <command> issue a command and wait for its result
  status <command_id>       show a command's full record
  wait <command_id>         wait for a command to complete
  help                      show this help
  exit                      leave the console";

/// Default wait used by console `send` and `wait`, in seconds.
const CONSOLE_WAIT_SECS: u64 = 60;

pub async fn run(client: &OperatorClient) -> Result<()> {
    println!("courier operator console; type 'help' for commands");

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        print!("courier> ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if matches!(line, "exit" | "quit" | "q") {
            break;
        }

        // Each verb reports its own failure; the console itself only exits
        // on EOF or an explicit quit.
        if let Err(e) = dispatch(client, line).await {
            println!("error: {e}");
        }
    }

    Ok(())
}

async fn dispatch(client: &OperatorClient, line: &str) -> Result<()> {
    match line {
        "help" => {
            println!("{HELP}");
            return Ok(());
        }
        "agents" => return commands::agents(client).await,
        _ => {}
    }

    if let Some(rest) = line.strip_prefix("send ") {
        let Some((agent_id, command)) = rest.trim().split_once(' ') else {
            println!("usage: send <agent_id> <command>");
            return Ok(());
        };
        return commands::send(client, &agent_id.into(), command.trim(), true, CONSOLE_WAIT_SECS)
            .await;
    }

    if let Some(rest) = line.strip_prefix("status ") {
        let command_id = parse_command_id(rest)?;
        return commands::status(client, &command_id).await;
    }

    if let Some(rest) = line.strip_prefix("wait ") {
        let command_id = parse_command_id(rest)?;
        return commands::wait(client, &command_id, CONSOLE_WAIT_SECS).await;
    }

    println!("unknown command: {line} (type 'help')");
    Ok(())
}

fn parse_command_id(input: &str) -> Result<CommandId> {
    input
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("not a command id: {}", input.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_command_id_rejects_garbage() {
        assert!(parse_command_id("not-a-uuid").is_err());
    }

    #[test]
    fn parse_command_id_accepts_uuid() {
        let id = CommandId::new();
        assert_eq!(parse_command_id(&format!("  {id} ")).unwrap(), id);
    }
}
