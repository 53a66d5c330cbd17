//! axum HTTP API over the dispatch store.
//!
//! Agent-facing endpoints: register, poll (drain), submit result.
//! Operator-facing endpoints: send, list agents, history, command status.
//! Unknown command ids map to 404 with a JSON error body; unknown agents
//! are not an error on any read and yield empty lists.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::info;

use courier_core::DispatchStore;
use courier_types::wire::{
    AckResponse, AgentListResponse, ApiStatus, CommandListResponse, CommandStatusResponse,
    ErrorResponse, PollRequest, RegisterRequest, RegisterResponse, SendRequest, SendResponse,
    SubmitRequest,
};
use courier_types::{AgentId, CommandId, CourierError};

/// Build the API router over a shared dispatch store.
pub fn router(store: Arc<DispatchStore>) -> Router {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/commands/get", post(poll_commands))
        .route("/api/commands/submit", post(submit_result))
        .route("/api/commands/send", post(send_command))
        .route("/api/agents", get(list_agents))
        .route("/api/agents/{agent_id}/history", get(agent_history))
        .route("/api/commands/{command_id}", get(command_status))
        .with_state(store)
}

/// Serve the API on `listen` until ctrl-c.
pub async fn serve(listen: &str, store: Arc<DispatchStore>) -> Result<(), String> {
    let addr: SocketAddr = listen
        .parse()
        .map_err(|e| format!("invalid listen address {listen:?}: {e}"))?;

    let app = router(store);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| format!("failed to bind {addr}: {e}"))?;

    info!(addr = %addr, "courier coordinator listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .map_err(|e| format!("HTTP server error: {e}"))
}

/// Core error mapped onto an HTTP status code with a JSON error body.
struct ApiError(CourierError);

impl From<CourierError> for ApiError {
    fn from(err: CourierError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            CourierError::CommandNotFound(_) => StatusCode::NOT_FOUND,
        };
        (status, Json(ErrorResponse::new(self.0.to_string()))).into_response()
    }
}

async fn register(
    State(store): State<Arc<DispatchStore>>,
    Json(req): Json<RegisterRequest>,
) -> Json<RegisterResponse> {
    let agent_id = req.agent_id.unwrap_or_else(AgentId::generate);
    store.register(&agent_id);
    Json(RegisterResponse {
        status: ApiStatus::Success,
        agent_id,
    })
}

async fn poll_commands(
    State(store): State<Arc<DispatchStore>>,
    Json(req): Json<PollRequest>,
) -> Json<CommandListResponse> {
    let commands = store.drain_pending(&req.agent_id);
    Json(CommandListResponse {
        status: ApiStatus::Success,
        commands,
    })
}

async fn submit_result(
    State(store): State<Arc<DispatchStore>>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    store.submit_result(&req.command_id, req.result)?;
    Ok(Json(AckResponse {
        status: ApiStatus::Success,
    }))
}

async fn send_command(
    State(store): State<Arc<DispatchStore>>,
    Json(req): Json<SendRequest>,
) -> Json<SendResponse> {
    let command_id = store.issue(&req.agent_id, &req.command);
    Json(SendResponse {
        status: ApiStatus::Success,
        command_id,
    })
}

async fn list_agents(State(store): State<Arc<DispatchStore>>) -> Json<AgentListResponse> {
    Json(AgentListResponse {
        status: ApiStatus::Success,
        agents: store.agents(),
    })
}

async fn agent_history(
    State(store): State<Arc<DispatchStore>>,
    Path(agent_id): Path<AgentId>,
) -> Json<CommandListResponse> {
    Json(CommandListResponse {
        status: ApiStatus::Success,
        commands: store.history_of(&agent_id),
    })
}

async fn command_status(
    State(store): State<Arc<DispatchStore>>,
    Path(command_id): Path<CommandId>,
) -> Result<Json<CommandStatusResponse>, ApiError> {
    let command = store.status_of(&command_id)?;
    Ok(Json(CommandStatusResponse {
        status: ApiStatus::Success,
        command,
    }))
}
