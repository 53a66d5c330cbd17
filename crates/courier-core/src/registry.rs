//! Agent registry: known agent ids and their per-agent command queues.

use std::collections::HashMap;

use courier_types::{AgentId, CommandId};

/// Tracks which agents exist and the ordered sequence of command ids ever
/// issued to each one (insertion order is issuance order).
///
/// Agents are never removed; entries live for the duration of the process.
#[derive(Debug, Default)]
pub(crate) struct AgentRegistry {
    queues: HashMap<AgentId, Vec<CommandId>>,
}

impl AgentRegistry {
    /// Register an agent id. Registering an already-known id is a no-op.
    pub(crate) fn register(&mut self, agent_id: &AgentId) {
        self.queues.entry(agent_id.clone()).or_default();
    }

    /// Whether the agent id has been seen before.
    pub(crate) fn is_known(&self, agent_id: &AgentId) -> bool {
        self.queues.contains_key(agent_id)
    }

    /// All known agent ids, in no particular order.
    pub(crate) fn list(&self) -> Vec<AgentId> {
        self.queues.keys().cloned().collect()
    }

    /// Ordered command ids issued to `agent_id`.
    ///
    /// Unknown agents yield an empty slice rather than an error.
    pub(crate) fn queue_for(&self, agent_id: &AgentId) -> &[CommandId] {
        self.queues.get(agent_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Append a command id to the agent's queue, registering the agent
    /// first if it has not been seen before.
    pub(crate) fn push(&mut self, agent_id: &AgentId, command_id: CommandId) {
        self.queues
            .entry(agent_id.clone())
            .or_default()
            .push(command_id);
    }
}
