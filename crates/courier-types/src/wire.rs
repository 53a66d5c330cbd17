//! Wire envelopes for the coordinator's HTTP API.
//!
//! Shared by the coordinator, the agent, and the operator CLI so the
//! request and response shapes cannot drift apart. Every response carries
//! a `status` discriminant alongside its payload.

use serde::{Deserialize, Serialize};

use crate::command::CommandRecord;
use crate::ids::{AgentId, CommandId};

/// Top-level outcome discriminant carried in every response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApiStatus {
    Success,
    Error,
}

/// Body of `POST /api/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    /// Agent-chosen identifier; the coordinator generates one when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_id: Option<AgentId>,
}

/// Response to `POST /api/register`, echoing the effective agent id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub status: ApiStatus,
    pub agent_id: AgentId,
}

/// Body of `POST /api/commands/get`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollRequest {
    pub agent_id: AgentId,
}

/// Response carrying a list of command records: poll and history replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandListResponse {
    pub status: ApiStatus,
    pub commands: Vec<CommandRecord>,
}

/// Body of `POST /api/commands/submit`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub command_id: CommandId,
    /// Opaque execution result; stored and returned unchanged.
    pub result: serde_json::Value,
}

/// Bare acknowledgement response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckResponse {
    pub status: ApiStatus,
}

/// Body of `POST /api/commands/send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendRequest {
    pub agent_id: AgentId,
    pub command: String,
}

/// Response to `POST /api/commands/send`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendResponse {
    pub status: ApiStatus,
    pub command_id: CommandId,
}

/// Response to `GET /api/agents`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentListResponse {
    pub status: ApiStatus,
    pub agents: Vec<AgentId>,
}

/// Response to `GET /api/commands/{command_id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandStatusResponse {
    pub status: ApiStatus,
    pub command: CommandRecord,
}

/// Error payload returned with non-2xx statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: ApiStatus,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: ApiStatus::Error,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_request_omits_absent_agent_id() {
        let req = RegisterRequest { agent_id: None };
        assert_eq!(serde_json::to_string(&req).unwrap(), "{}");

        let req = RegisterRequest {
            agent_id: Some(AgentId::from("agent-1")),
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({"agent_id": "agent-1"})
        );
    }

    #[test]
    fn api_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ApiStatus::Success).unwrap(),
            "\"success\""
        );
        assert_eq!(
            serde_json::to_string(&ApiStatus::Error).unwrap(),
            "\"error\""
        );
    }

    #[test]
    fn error_response_shape() {
        let body = serde_json::to_value(ErrorResponse::new("command not found")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"status": "error", "message": "command not found"})
        );
    }
}
