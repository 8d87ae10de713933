// redt/core/execution/src/types.rs

// Error taxonomy and outcomes of applying a message
use redt_primitives::{Address, EncryptedPayloadHash, Hash, PrivacyFlag, U256};

/// Errors that make a message invalid for inclusion in a block.
///
/// Returning one of these means the transition was abandoned; only the gas
/// purchase (if it happened) has touched state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    #[error("nonce too high: account nonce {state}, message nonce {message}")]
    NonceTooHigh { state: u64, message: u64 },

    #[error("nonce too low: account nonce {state}, message nonce {message}")]
    NonceTooLow { state: u64, message: u64 },

    #[error("nonce has max value: address {address}, nonce {nonce}")]
    NonceMax { address: Address, nonce: u64 },

    #[error("insufficient balance to pay for gas: need {need}, have {have}")]
    InsufficientBalanceForGas { need: U256, have: U256 },

    #[error("gas limit reached: requested {requested}, available {available}")]
    GasLimitReached { requested: u64, available: u64 },

    #[error("out of gas")]
    OutOfGas,

    #[error("insufficient balance for transfer")]
    InsufficientBalance,
}

impl From<GasPoolError> for TransitionError {
    fn from(err: GasPoolError) -> Self {
        match err {
            GasPoolError::GasLimitReached {
                requested,
                available,
            } => TransitionError::GasLimitReached {
                requested,
                available,
            },
        }
    }
}

/// Gas pool errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GasPoolError {
    #[error("gas limit reached: requested {requested}, available {available}")]
    GasLimitReached { requested: u64, available: u64 },
}

/// Errors reported by the bytecode engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VmError {
    #[error("insufficient balance for transfer")]
    InsufficientBalance,

    #[error("out of gas")]
    OutOfGas,

    #[error("execution reverted")]
    ExecutionReverted,

    #[error("max call depth exceeded")]
    DepthLimit,

    #[error("contract address collision")]
    ContractAddressCollision,

    #[error("contract creation code storage out of gas")]
    CodeStoreOutOfGas,

    #[error("max code size exceeded")]
    MaxCodeSizeExceeded,

    #[error("invalid opcode: 0x{0:02x}")]
    InvalidOpcode(u8),

    #[error("write protection")]
    WriteProtection,

    #[error("{0}")]
    Other(String),
}

/// Reasons a private transaction fails its privacy checks
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrivacyError {
    #[error("privacy enhancements are disabled, can't process non-standard private tx")]
    EnhancementsDisabled,

    #[error("unable to find privacy metadata for affected contract {address}")]
    MissingPrivacyMetadata { address: Address },

    #[error("mismatched privacy flags for affected contract {address}: contract {contract:?}, received {received:?}")]
    MismatchedPrivacyFlag {
        address: Address,
        contract: PrivacyFlag,
        received: PrivacyFlag,
    },

    #[error("participation check failed for affected contract {address}, missing creation tx {creation_tx_hash}")]
    ParticipationCheckFailed {
        address: Address,
        creation_tx_hash: EncryptedPayloadHash,
    },

    #[error("merkle root check failed: expected {expected}, actual {actual}")]
    MerkleRootMismatch { expected: Hash, actual: Hash },

    #[error("unable to calculate merkle root: {0}")]
    MerkleRoot(String),
}

/// Why an included transaction did not take effect
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Failure {
    /// The engine reported an error; state changes and gas usage stand
    #[error("vm error: {0}")]
    Vm(VmError),

    /// Privacy metadata was rejected before execution
    #[error("privacy preparation failed: {0}")]
    PrivacyPreparation(PrivacyError),

    /// Privacy checks failed after execution and the private state was
    /// reverted
    #[error("privacy verification failed: {error} (vm error: {vm_error:?})")]
    PrivacyVerification {
        error: PrivacyError,
        vm_error: Option<VmError>,
    },
}

/// Result of applying a message that may be included in a block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Gas counted against the block. Always zero for private messages.
    pub used_gas: u64,

    /// Return data of the call, or the deployed code of a creation
    pub return_data: Vec<u8>,

    /// Address of a created contract
    pub contract_address: Option<Address>,

    pub failure: Option<Failure>,
}

impl ExecutionResult {
    pub fn failed(&self) -> bool {
        self.failure.is_some()
    }

    pub(crate) fn inert() -> Self {
        Self::default()
    }

    pub(crate) fn failed_with(failure: Failure) -> Self {
        Self {
            failure: Some(failure),
            ..Default::default()
        }
    }

    /// Label used for metrics
    pub fn outcome(&self) -> &'static str {
        match &self.failure {
            None => "success",
            Some(Failure::Vm(_)) => "vm_error",
            Some(Failure::PrivacyPreparation(_)) => "privacy_prepare_failed",
            Some(Failure::PrivacyVerification { .. }) => "privacy_verify_failed",
        }
    }
}

/// Outcome of `Evm::call`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallOutcome {
    pub output: Vec<u8>,
    pub leftover_gas: u64,
    pub error: Option<VmError>,
}

/// Outcome of `Evm::create`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CreateOutcome {
    pub output: Vec<u8>,
    pub address: Option<Address>,
    pub leftover_gas: u64,
    pub error: Option<VmError>,
}

impl From<CreateOutcome> for CallOutcome {
    fn from(outcome: CreateOutcome) -> Self {
        CallOutcome {
            output: outcome.output,
            leftover_gas: outcome.leftover_gas,
            error: outcome.error,
        }
    }
}
