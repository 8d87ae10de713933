// redt/core/private/src/memory.rs

// In-process private transaction manager, used by dev chains and tests
use crate::{ExtraMetadata, PrivateError, PrivateTransactionManager, ReceivedPayload};
use dashmap::{DashMap, DashSet};
use redt_primitives::EncryptedPayloadHash;
use sha3::{Digest, Sha3_512};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredPayload {
    plaintext: Vec<u8>,
    metadata: Option<ExtraMetadata>,
}

/// Payload store keyed by the SHA3-512 digest of the plaintext.
///
/// Cloning shares the underlying store.
#[derive(Debug, Clone, Default)]
pub struct MemoryTransactionManager {
    payloads: Arc<DashMap<EncryptedPayloadHash, StoredPayload>>,
    unavailable: Arc<DashSet<EncryptedPayloadHash>>,
}

impl MemoryTransactionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Commitment for a plaintext payload
    pub fn commitment(plaintext: &[u8]) -> EncryptedPayloadHash {
        let mut hasher = Sha3_512::new();
        hasher.update(plaintext);
        let digest: [u8; 64] = hasher.finalize().into();
        EncryptedPayloadHash::new(digest)
    }

    /// Store a payload this node is party to and return its commitment
    pub fn store(
        &self,
        plaintext: Vec<u8>,
        metadata: Option<ExtraMetadata>,
    ) -> EncryptedPayloadHash {
        let hash = Self::commitment(&plaintext);
        self.payloads.insert(
            hash,
            StoredPayload {
                plaintext,
                metadata,
            },
        );
        debug!(%hash, "Stored private payload");
        hash
    }

    /// Make every later `receive` for `hash` fail, as if the manager could
    /// not be reached
    pub fn mark_unavailable(&self, hash: EncryptedPayloadHash) {
        self.unavailable.insert(hash);
    }

    pub fn is_party(&self, hash: &EncryptedPayloadHash) -> bool {
        self.payloads.contains_key(hash)
    }

    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }
}

impl PrivateTransactionManager for MemoryTransactionManager {
    fn receive(
        &self,
        hash: &EncryptedPayloadHash,
    ) -> Result<Option<ReceivedPayload>, PrivateError> {
        if self.unavailable.contains(hash) {
            return Err(PrivateError::Unavailable(*hash));
        }
        let received = self.payloads.get(hash).map(|stored| ReceivedPayload {
            plaintext: stored.plaintext.clone(),
            metadata: stored.metadata.clone(),
        });
        debug!(%hash, party = received.is_some(), "Private payload lookup");
        Ok(received)
    }
}
