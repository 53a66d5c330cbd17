//! Command ledger: the canonical record of every command ever issued.

use std::collections::HashMap;

use courier_types::{AgentId, CommandId, CommandRecord, CommandStatus, CourierError};

/// Owns the id -> record mapping and the per-record lifecycle transitions.
///
/// Records are retained for the life of the process as an audit trail;
/// nothing is ever evicted.
#[derive(Debug, Default)]
pub(crate) struct CommandLedger {
    records: HashMap<CommandId, CommandRecord>,
}

impl CommandLedger {
    /// Allocate and store a fresh pending record. Returns the new id.
    pub(crate) fn create(&mut self, agent_id: &AgentId, command: &str) -> CommandId {
        let record = CommandRecord::new(agent_id.clone(), command);
        let id = record.id;
        self.records.insert(id, record);
        id
    }

    /// Look up a record by id.
    pub(crate) fn get(&self, id: &CommandId) -> Result<&CommandRecord, CourierError> {
        self.records
            .get(id)
            .ok_or(CourierError::CommandNotFound(*id))
    }

    /// Transition `pending -> sent`.
    ///
    /// Only called by the dispatch store, for ids it has just observed as
    /// pending under the same lock; any other caller would violate the
    /// hand-out-at-most-once rule.
    pub(crate) fn mark_sent(&mut self, id: &CommandId) {
        if let Some(record) = self.records.get_mut(id) {
            debug_assert_eq!(record.status, CommandStatus::Pending);
            record.status = CommandStatus::Sent;
        }
    }

    /// Transition a record to `completed` and attach the result.
    ///
    /// Accepts late and duplicate submissions regardless of prior status;
    /// completing an already-completed command overwrites the stored result
    /// (last write wins). Fails only for unknown ids.
    pub(crate) fn complete(
        &mut self,
        id: &CommandId,
        result: serde_json::Value,
    ) -> Result<(), CourierError> {
        let record = self
            .records
            .get_mut(id)
            .ok_or(CourierError::CommandNotFound(*id))?;
        record.status = CommandStatus::Completed;
        record.result = Some(result);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_stores_pending_record() {
        let mut ledger = CommandLedger::default();
        let agent = AgentId::from("a1");

        let id = ledger.create(&agent, "whoami");
        let record = ledger.get(&id).unwrap();

        assert_eq!(record.agent_id, agent);
        assert_eq!(record.command, "whoami");
        assert_eq!(record.status, CommandStatus::Pending);
        assert!(record.result.is_none());
    }

    #[test]
    fn get_unknown_id_is_not_found() {
        let ledger = CommandLedger::default();
        let missing = CommandId::new();
        assert!(matches!(
            ledger.get(&missing),
            Err(CourierError::CommandNotFound(id)) if id == missing
        ));
    }

    #[test]
    fn mark_sent_transitions_pending() {
        let mut ledger = CommandLedger::default();
        let id = ledger.create(&AgentId::from("a1"), "date");

        ledger.mark_sent(&id);
        assert_eq!(ledger.get(&id).unwrap().status, CommandStatus::Sent);
    }

    #[test]
    fn complete_attaches_result() {
        let mut ledger = CommandLedger::default();
        let id = ledger.create(&AgentId::from("a1"), "date");
        ledger.mark_sent(&id);

        let result = json!({"stdout": "Mon\n", "stderr": "", "exit_code": 0});
        ledger.complete(&id, result.clone()).unwrap();

        let record = ledger.get(&id).unwrap();
        assert_eq!(record.status, CommandStatus::Completed);
        assert_eq!(record.result, Some(result));
    }

    #[test]
    fn complete_unknown_id_is_not_found() {
        let mut ledger = CommandLedger::default();
        assert!(ledger.complete(&CommandId::new(), json!(null)).is_err());
    }

    #[test]
    fn recompletion_overwrites_result() {
        // Last write wins, preserved for compatibility with existing agents
        // that retry submissions.
        let mut ledger = CommandLedger::default();
        let id = ledger.create(&AgentId::from("a1"), "date");

        ledger.complete(&id, json!("first")).unwrap();
        ledger.complete(&id, json!("second")).unwrap();

        assert_eq!(ledger.get(&id).unwrap().result, Some(json!("second")));
    }
}
