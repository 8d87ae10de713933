// redt/core/execution/src/vm.rs

// Boundary to the bytecode engine
use crate::config::ChainConfig;
use crate::state::WorldState;
use crate::types::{CallOutcome, CreateOutcome};
use redt_primitives::{Address, Hash, PrivacyMetadata, U256};

/// Block-scoped execution environment.
///
/// Implementations own the state the engine runs against. For a public
/// message `state` and `public_state` are the same store; while a private
/// message runs, `state` is the node's private state.
pub trait Evm {
    fn chain_config(&self) -> &ChainConfig;

    fn block_number(&self) -> u64;

    /// Beneficiary of transaction fees
    fn coinbase(&self) -> Address;

    fn public_state(&mut self) -> &mut dyn WorldState;

    /// State that execution reads and writes
    fn state(&mut self) -> &mut dyn WorldState;

    fn create(&mut self, caller: Address, code: &[u8], gas: u64, value: U256) -> CreateOutcome;

    fn call(
        &mut self,
        caller: Address,
        to: Address,
        input: &[u8],
        gas: u64,
        value: U256,
    ) -> CallOutcome;

    /// Attach privacy metadata to the transaction about to execute
    fn set_tx_privacy_metadata(&mut self, metadata: PrivacyMetadata);

    /// Contracts touched by the last execution
    fn affected_contracts(&self) -> Vec<Address>;

    /// Merkle root over the affected contracts' post-execution state
    fn calculate_merkle_root(&mut self) -> anyhow::Result<Hash>;
}
