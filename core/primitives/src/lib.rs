// redt/core/primitives/src/lib.rs

// Shared primitive types for the execution and private-payload crates
pub mod privacy;
pub mod types;

pub use primitive_types::U256;
pub use privacy::{PrivacyFlag, PrivacyMetadata};
pub use types::{Address, EncryptedPayloadHash, Hash, ParseBytesError};
