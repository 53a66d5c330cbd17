//! HTTP client for the coordinator's operator-facing endpoints.

use anyhow::{bail, Context, Result};
use reqwest::{Client, StatusCode};

use courier_types::wire::{
    AgentListResponse, CommandListResponse, CommandStatusResponse, SendRequest, SendResponse,
};
use courier_types::{AgentId, CommandId, CommandRecord};

/// Operator-side view of the coordinator API.
pub struct OperatorClient {
    http: Client,
    base: String,
}

impl OperatorClient {
    pub fn new(base: &str) -> Self {
        Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
        }
    }

    /// All registered agent ids.
    pub async fn agents(&self) -> Result<Vec<AgentId>> {
        let body: AgentListResponse = self
            .http
            .get(format!("{}/api/agents", self.base))
            .send()
            .await
            .context("coordinator unreachable")?
            .json()
            .await?;
        Ok(body.agents)
    }

    /// Issue a command to an agent, returning the new command id.
    pub async fn send(&self, agent_id: &AgentId, command: &str) -> Result<CommandId> {
        let req = SendRequest {
            agent_id: agent_id.clone(),
            command: command.to_string(),
        };
        let body: SendResponse = self
            .http
            .post(format!("{}/api/commands/send", self.base))
            .json(&req)
            .send()
            .await
            .context("coordinator unreachable")?
            .json()
            .await?;
        Ok(body.command_id)
    }

    /// Full record for a command id.
    pub async fn status(&self, command_id: &CommandId) -> Result<CommandRecord> {
        let resp = self
            .http
            .get(format!("{}/api/commands/{command_id}", self.base))
            .send()
            .await
            .context("coordinator unreachable")?;
        if resp.status() == StatusCode::NOT_FOUND {
            bail!("command not found: {command_id}");
        }
        let body: CommandStatusResponse = resp.json().await?;
        Ok(body.command)
    }

    /// Every command issued to an agent, in issuance order.
    pub async fn history(&self, agent_id: &AgentId) -> Result<Vec<CommandRecord>> {
        let body: CommandListResponse = self
            .http
            .get(format!("{}/api/agents/{agent_id}/history", self.base))
            .send()
            .await
            .context("coordinator unreachable")?
            .json()
            .await?;
        Ok(body.commands)
    }
}
