//! The dispatch store: one lock over the agent registry and command ledger.
//!
//! Every operation locks, reads or mutates both views as one step, and
//! unlocks. The store is fully synchronous: no I/O happens while the lock
//! is held, and callers never hold it across an await.

use parking_lot::Mutex;
use serde_json::Value;
use tracing::{info, warn};

use courier_types::{AgentId, CommandId, CommandRecord, CommandStatus, CourierError};

use crate::ledger::CommandLedger;
use crate::registry::AgentRegistry;

#[derive(Debug, Default)]
struct Inner {
    registry: AgentRegistry,
    ledger: CommandLedger,
}

/// Concurrency-safe facade over the registry and ledger.
///
/// Shared across request handlers behind an `Arc`; every operation takes
/// `&self` and locks internally. Correct under true parallelism, not just
/// task interleaving.
#[derive(Debug, Default)]
pub struct DispatchStore {
    inner: Mutex<Inner>,
}

impl DispatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent id. Idempotent; re-registration is a no-op.
    pub fn register(&self, agent_id: &AgentId) {
        let mut inner = self.inner.lock();
        if !inner.registry.is_known(agent_id) {
            info!(agent_id = %agent_id, "agent registered");
        }
        inner.registry.register(agent_id);
    }

    /// Issue a command to an agent: create the ledger record and append it
    /// to the agent's queue in one step. Unknown agents are registered
    /// implicitly.
    pub fn issue(&self, agent_id: &AgentId, command: &str) -> CommandId {
        let mut inner = self.inner.lock();
        let id = inner.ledger.create(agent_id, command);
        inner.registry.push(agent_id, id);
        info!(command_id = %id, agent_id = %agent_id, command, "command issued");
        id
    }

    /// Atomically hand out every pending command owned by `agent_id`.
    ///
    /// Snapshots the agent's pending commands, transitions each to `sent`,
    /// and returns the records as the agent now holds them (status already
    /// `sent`). A drained command is never handed out again: two
    /// concurrent drains for the same agent cannot both receive it.
    /// Unknown agents and agents with nothing pending yield an empty list.
    pub fn drain_pending(&self, agent_id: &AgentId) -> Vec<CommandRecord> {
        let mut inner = self.inner.lock();

        let pending: Vec<CommandId> = inner
            .registry
            .queue_for(agent_id)
            .iter()
            .filter(|id| {
                matches!(inner.ledger.get(id), Ok(r) if r.status == CommandStatus::Pending)
            })
            .copied()
            .collect();

        let mut drained = Vec::with_capacity(pending.len());
        for id in &pending {
            inner.ledger.mark_sent(id);
            if let Ok(record) = inner.ledger.get(id) {
                drained.push(record.clone());
            }
        }

        if !drained.is_empty() {
            info!(agent_id = %agent_id, count = drained.len(), "handed out pending commands");
        }
        drained
    }

    /// Store the result for a command, transitioning it to `completed`.
    ///
    /// Fails only for unknown command ids. Late and duplicate submissions
    /// are accepted; a resubmitted result overwrites the stored one.
    pub fn submit_result(&self, command_id: &CommandId, result: Value) -> Result<(), CourierError> {
        let mut inner = self.inner.lock();
        match inner.ledger.complete(command_id, result) {
            Ok(()) => {
                info!(command_id = %command_id, "command completed");
                Ok(())
            }
            Err(e) => {
                warn!(command_id = %command_id, "result submitted for unknown command");
                Err(e)
            }
        }
    }

    /// Full record for a command id, or `CommandNotFound`.
    pub fn status_of(&self, command_id: &CommandId) -> Result<CommandRecord, CourierError> {
        self.inner.lock().ledger.get(command_id).cloned()
    }

    /// Every command ever issued to `agent_id`, in issuance order and
    /// regardless of status. Unknown agents yield an empty list.
    pub fn history_of(&self, agent_id: &AgentId) -> Vec<CommandRecord> {
        let inner = self.inner.lock();
        inner
            .registry
            .queue_for(agent_id)
            .iter()
            .filter_map(|id| inner.ledger.get(id).ok().cloned())
            .collect()
    }

    /// All known agent ids, in no particular order.
    pub fn agents(&self) -> Vec<AgentId> {
        self.inner.lock().registry.list()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unregistered_agent_reads_are_empty() {
        let store = DispatchStore::new();
        let ghost = AgentId::from("ghost");

        assert!(store.drain_pending(&ghost).is_empty());
        assert!(store.history_of(&ghost).is_empty());
    }

    #[test]
    fn freshly_registered_agent_has_no_commands() {
        let store = DispatchStore::new();
        let agent = AgentId::from("a1");

        store.register(&agent);

        assert!(store.drain_pending(&agent).is_empty());
        assert!(store.history_of(&agent).is_empty());
        assert_eq!(store.agents(), vec![agent]);
    }

    #[test]
    fn issue_creates_distinct_pending_commands() {
        let store = DispatchStore::new();
        let agent = AgentId::from("a1");

        let first = store.issue(&agent, "whoami");
        let second = store.issue(&agent, "whoami");
        assert_ne!(first, second);

        let record = store.status_of(&first).unwrap();
        assert_eq!(record.status, CommandStatus::Pending);
        assert_eq!(record.agent_id, agent);
        assert!(record.result.is_none());
    }

    #[test]
    fn drain_hands_out_each_command_exactly_once() {
        let store = DispatchStore::new();
        let agent = AgentId::from("a1");
        let id = store.issue(&agent, "uptime");

        let drained = store.drain_pending(&agent);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].id, id);
        assert_eq!(drained[0].status, CommandStatus::Sent);
        assert_eq!(store.status_of(&id).unwrap().status, CommandStatus::Sent);

        // Already handed out, never again.
        assert!(store.drain_pending(&agent).is_empty());
    }

    #[test]
    fn drain_does_not_leak_across_agents() {
        let store = DispatchStore::new();
        let a1 = AgentId::from("a1");
        let a2 = AgentId::from("a2");
        let id = store.issue(&a1, "hostname");
        store.issue(&a2, "uptime");

        let drained = store.drain_pending(&a1);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].id, id);

        // a2's command is untouched.
        let drained = store.drain_pending(&a2);
        assert_eq!(drained.len(), 1);
        assert_eq!(drained[0].agent_id, a2);
    }

    #[test]
    fn submit_result_completes_with_exact_payload() {
        let store = DispatchStore::new();
        let agent = AgentId::from("a1");
        let id = store.issue(&agent, "whoami");
        store.drain_pending(&agent);

        let result = json!({"stdout": "root\n", "stderr": "", "exit_code": 0});
        store.submit_result(&id, result.clone()).unwrap();

        let record = store.status_of(&id).unwrap();
        assert_eq!(record.status, CommandStatus::Completed);
        assert_eq!(record.result, Some(result));
    }

    #[test]
    fn submit_result_unknown_id_changes_nothing() {
        let store = DispatchStore::new();
        let agent = AgentId::from("a1");
        store.issue(&agent, "whoami");

        let missing = CommandId::new();
        let err = store.submit_result(&missing, json!("late")).unwrap_err();
        assert!(matches!(err, CourierError::CommandNotFound(id) if id == missing));

        // The agent's history is untouched.
        let history = store.history_of(&agent);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].status, CommandStatus::Pending);
    }

    #[test]
    fn history_keeps_issuance_order_across_statuses() {
        let store = DispatchStore::new();
        let agent = AgentId::from("a1");

        let first = store.issue(&agent, "first");
        let second = store.issue(&agent, "second");
        let third = store.issue(&agent, "third");

        store.drain_pending(&agent);
        store.submit_result(&first, json!("done")).unwrap();
        store.issue(&agent, "fourth");

        let history = store.history_of(&agent);
        let ids: Vec<CommandId> = history.iter().map(|r| r.id).collect();
        assert_eq!(&ids[..3], &[first, second, third]);
        assert_eq!(history.len(), 4);
        assert_eq!(history[0].status, CommandStatus::Completed);
        assert_eq!(history[1].status, CommandStatus::Sent);
        assert_eq!(history[3].status, CommandStatus::Pending);
    }

    #[test]
    fn command_text_round_trips_byte_identical() {
        let store = DispatchStore::new();
        let agent = AgentId::from("a1");
        let text = "echo \"hello\nworld\" | grep -c 'l'";

        let id = store.issue(&agent, text);
        assert_eq!(store.status_of(&id).unwrap().command, text);
    }

    #[test]
    fn resubmission_overwrites_result() {
        // Last write wins; see DESIGN.md for why this stays.
        let store = DispatchStore::new();
        let agent = AgentId::from("a1");
        let id = store.issue(&agent, "date");

        store.submit_result(&id, json!("first")).unwrap();
        store.submit_result(&id, json!("second")).unwrap();

        let record = store.status_of(&id).unwrap();
        assert_eq!(record.status, CommandStatus::Completed);
        assert_eq!(record.result, Some(json!("second")));
    }

    #[test]
    fn status_of_unknown_id_is_not_found() {
        let store = DispatchStore::new();
        assert!(store.status_of(&CommandId::new()).is_err());
    }
}
