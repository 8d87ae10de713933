// redt/core/execution/src/state/mod.rs

// World state interface used by the state transition, plus an in-memory
// journaled implementation
pub mod state_db;

use redt_primitives::{Address, PrivacyMetadata, U256};

pub use state_db::{Account, StateDB};

/// Rollback point returned by `WorldState::snapshot`.
///
/// Not `Clone`: reverting consumes the token, so a checkpoint can be rolled
/// back to at most once.
#[derive(Debug, PartialEq, Eq)]
pub struct Snapshot {
    id: usize,
}

impl Snapshot {
    pub fn new(id: usize) -> Self {
        Self { id }
    }

    pub fn id(&self) -> usize {
        self.id
    }
}

/// State store errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("corrupt privacy metadata for {0}")]
    CorruptPrivacyMetadata(Address),

    #[error("state backend error: {0}")]
    Backend(String),
}

/// Mutation surface of the world state
pub trait WorldState {
    fn balance(&self, address: &Address) -> U256;

    fn add_balance(&mut self, address: &Address, amount: U256);

    fn sub_balance(&mut self, address: &Address, amount: U256);

    fn nonce(&self, address: &Address) -> u64;

    fn set_nonce(&mut self, address: &Address, nonce: u64);

    /// Refund counter accumulated during execution
    fn refund(&self) -> u64;

    fn snapshot(&mut self) -> Snapshot;

    fn revert_to_snapshot(&mut self, snapshot: Snapshot);

    /// Privacy metadata recorded for a private contract, `None` for contracts
    /// that carry none
    fn state_privacy_metadata(
        &self,
        address: &Address,
    ) -> Result<Option<PrivacyMetadata>, StateError>;
}
