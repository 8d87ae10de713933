// redt/core/private/src/lib.rs

//! Boundary to the off-chain private transaction manager.
//!
//! A private transaction only records a commitment on-chain. Nodes that are
//! party to the transaction can exchange that commitment for the plaintext
//! payload and the privacy metadata the sender attached to it; every other
//! node gets nothing back and must still reach the same public state.

pub mod memory;

use redt_primitives::{EncryptedPayloadHash, Hash, PrivacyFlag};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub use memory::MemoryTransactionManager;

/// Metadata delivered alongside a private payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtraMetadata {
    /// Creation transaction commitments of every contract the sender expects
    /// this transaction to touch
    pub ac_hashes: BTreeSet<EncryptedPayloadHash>,

    /// Merkle root over the affected contracts' post-execution storage.
    /// Zero when the sender did not request it.
    pub ac_merkle_root: Hash,

    pub privacy_flag: PrivacyFlag,
}

impl ExtraMetadata {
    pub fn new(privacy_flag: PrivacyFlag) -> Self {
        Self {
            privacy_flag,
            ..Default::default()
        }
    }

    pub fn with_ac_hashes<I>(mut self, hashes: I) -> Self
    where
        I: IntoIterator<Item = EncryptedPayloadHash>,
    {
        self.ac_hashes.extend(hashes);
        self
    }

    pub fn with_ac_merkle_root(mut self, root: Hash) -> Self {
        self.ac_merkle_root = root;
        self
    }
}

/// What a party node gets back for a commitment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedPayload {
    pub plaintext: Vec<u8>,
    pub metadata: Option<ExtraMetadata>,
}

/// Payload service errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrivateError {
    #[error("private payload {0} unavailable")]
    Unavailable(EncryptedPayloadHash),

    #[error("private transaction manager unreachable: {0}")]
    Unreachable(String),

    #[error("malformed response from private transaction manager: {0}")]
    Malformed(String),
}

/// Retrieval of private payloads by commitment.
///
/// `Ok(None)` means this node is not a party to the transaction. Calls
/// block until the manager answers.
pub trait PrivateTransactionManager: Send + Sync {
    fn receive(
        &self,
        hash: &EncryptedPayloadHash,
    ) -> Result<Option<ReceivedPayload>, PrivateError>;
}

impl<T: PrivateTransactionManager + ?Sized> PrivateTransactionManager for std::sync::Arc<T> {
    fn receive(
        &self,
        hash: &EncryptedPayloadHash,
    ) -> Result<Option<ReceivedPayload>, PrivateError> {
        (**self).receive(hash)
    }
}
