// redt/core/execution/src/lib.rs

pub mod config;
pub mod gas_pool;
pub mod intrinsic;
pub mod message;
pub mod metrics;
pub mod params;
pub mod privacy;
pub mod state;
pub mod state_transition;
pub mod types;
pub mod vm;

pub use config::{ChainConfig, ConfigError};
pub use gas_pool::GasPool;
pub use intrinsic::intrinsic_gas;
pub use message::{Message, MessagePayload};
pub use privacy::{PrivacyMetadataHandler, Verification};
pub use state::{Account, Snapshot, StateDB, StateError, WorldState};
pub use state_transition::{apply_message, StateTransition};
pub use types::{
    CallOutcome, CreateOutcome, ExecutionResult, Failure, GasPoolError, PrivacyError,
    TransitionError, VmError,
};
pub use vm::Evm;

// Re-export shared types so callers need a single dependency
pub use redt_primitives::{Address, EncryptedPayloadHash, Hash, PrivacyFlag, PrivacyMetadata, U256};
pub use redt_private::{ExtraMetadata, PrivateTransactionManager, ReceivedPayload};
