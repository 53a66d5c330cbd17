//! HTTP client for the coordinator's agent-facing endpoints.

use reqwest::Client;
use serde_json::Value;

use courier_types::wire::{
    CommandListResponse, ErrorResponse, PollRequest, RegisterRequest, SubmitRequest,
};
use courier_types::{AgentId, CommandId, CommandRecord};

/// Errors from talking to the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("coordinator rejected request: {0}")]
    Api(String),
}

/// Agent-side view of the coordinator API.
pub struct CoordinatorClient {
    http: Client,
    base: String,
    agent_id: AgentId,
}

impl CoordinatorClient {
    pub fn new(base: &str, agent_id: AgentId) -> Self {
        Self {
            http: Client::new(),
            base: base.trim_end_matches('/').to_string(),
            agent_id,
        }
    }

    /// Announce this agent to the coordinator. Safe to repeat.
    pub async fn register(&self) -> Result<(), ClientError> {
        let req = RegisterRequest {
            agent_id: Some(self.agent_id.clone()),
        };
        let resp = self
            .http
            .post(format!("{}/api/register", self.base))
            .json(&req)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Fetch the commands queued for this agent.
    ///
    /// The coordinator hands each command out exactly once, so everything
    /// returned here must be executed and answered; there is no re-fetch.
    pub async fn poll_commands(&self) -> Result<Vec<CommandRecord>, ClientError> {
        let req = PollRequest {
            agent_id: self.agent_id.clone(),
        };
        let resp = self
            .http
            .post(format!("{}/api/commands/get", self.base))
            .json(&req)
            .send()
            .await?;
        let resp = Self::check(resp).await?;
        let body: CommandListResponse = resp.json().await?;
        Ok(body.commands)
    }

    /// Send an execution result back to the coordinator.
    pub async fn submit_result(
        &self,
        command_id: &CommandId,
        result: Value,
    ) -> Result<(), ClientError> {
        let req = SubmitRequest {
            command_id: *command_id,
            result,
        };
        let resp = self
            .http
            .post(format!("{}/api/commands/submit", self.base))
            .json(&req)
            .send()
            .await?;
        Self::check(resp).await?;
        Ok(())
    }

    /// Turn a non-2xx response into `ClientError::Api`, preferring the
    /// server's error message over the bare status code.
    async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
        if resp.status().is_success() {
            return Ok(resp);
        }
        let status = resp.status();
        let message = match resp.json::<ErrorResponse>().await {
            Ok(body) => body.message,
            Err(_) => status.to_string(),
        };
        Err(ClientError::Api(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_stripped() {
        let client = CoordinatorClient::new("http://localhost:8080/", AgentId::from("a1"));
        assert_eq!(client.base, "http://localhost:8080");
    }
}
