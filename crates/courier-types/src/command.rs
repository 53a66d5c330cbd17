//! Command records and their lifecycle status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{AgentId, CommandId};

/// Lifecycle state of an issued command.
///
/// `Pending` is the initial state. A command moves to `Sent` exactly once,
/// when it is handed to its owning agent in a poll response; it is never
/// handed out again. `Completed` is terminal and is entered when a result
/// is submitted for the command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Pending,
    Sent,
    Completed,
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandStatus::Pending => write!(f, "pending"),
            CommandStatus::Sent => write!(f, "sent"),
            CommandStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Canonical record of one issued command.
///
/// The id, owning agent, command text, and creation timestamp are fixed at
/// creation; only `status` and `result` change afterwards, and only through
/// the dispatch store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandRecord {
    /// Unique identifier allocated at creation.
    pub id: CommandId,
    /// The agent this command was issued to.
    pub agent_id: AgentId,
    /// Command text as issued by the operator. Opaque to the core.
    pub command: String,
    /// Current lifecycle state.
    pub status: CommandStatus,
    /// Result payload submitted by the agent; absent until completion.
    /// Opaque to the core: a `{stdout, stderr, exit_code}` mapping for
    /// shell commands, a scalar or mapping for built-ins.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    /// When the command was issued.
    pub created_at: DateTime<Utc>,
}

impl CommandRecord {
    /// Create a fresh `Pending` record owned by `agent_id`.
    pub fn new(agent_id: AgentId, command: impl Into<String>) -> Self {
        Self {
            id: CommandId::new(),
            agent_id,
            command: command.into(),
            status: CommandStatus::Pending,
            result: None,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_record_is_pending_with_no_result() {
        let record = CommandRecord::new(AgentId::from("a1"), "uptime");
        assert_eq!(record.status, CommandStatus::Pending);
        assert!(record.result.is_none());
        assert_eq!(record.command, "uptime");
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&CommandStatus::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&CommandStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn absent_result_is_omitted_from_json() {
        let record = CommandRecord::new(AgentId::from("a1"), "uptime");
        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("result").is_none());
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn record_without_result_field_deserializes() {
        let json = serde_json::json!({
            "id": uuid::Uuid::new_v4(),
            "agent_id": "a1",
            "command": "whoami",
            "status": "sent",
            "created_at": Utc::now(),
        });
        let record: CommandRecord = serde_json::from_value(json).unwrap();
        assert_eq!(record.status, CommandStatus::Sent);
        assert!(record.result.is_none());
    }
}
