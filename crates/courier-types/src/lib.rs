//! Core types shared across all courier crates.
//!
//! Defines agent and command identifiers, the command record and its
//! lifecycle status, the error taxonomy, and the HTTP wire envelopes used
//! by the coordinator, the agent, and the operator CLI.

pub mod command;
pub mod error;
pub mod ids;
pub mod wire;

pub use command::{CommandRecord, CommandStatus};
pub use error::CourierError;
pub use ids::{AgentId, CommandId};
