//! Error types shared across the courier crates.

use crate::ids::CommandId;

/// Errors surfaced by the dispatch core.
///
/// Unknown agents are not an error on any read path (they yield empty
/// sequences); only unknown command ids are rejected.
#[derive(Debug, thiserror::Error)]
pub enum CourierError {
    #[error("command not found: {0}")]
    CommandNotFound(CommandId),
}
