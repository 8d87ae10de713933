// redt/core/primitives/src/privacy.rs

use crate::types::EncryptedPayloadHash;
use serde::{Deserialize, Serialize};

bitflags::bitflags! {
    /// Privacy guarantees requested by a private transaction.
    ///
    /// No bits set means standard private: no party protection and no state
    /// validation. State validation always includes party protection.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct PrivacyFlag: u64 {
        const PARTY_PROTECTION = 0b01;
        const STATE_VALIDATION = 0b11;
    }
}

impl PrivacyFlag {
    pub const STANDARD_PRIVATE: Self = Self::empty();

    pub fn is_standard_private(&self) -> bool {
        self.is_empty()
    }

    pub fn is_not_standard_private(&self) -> bool {
        !self.is_empty()
    }

    /// All bits of `other` are set in `self`
    pub fn has(&self, other: PrivacyFlag) -> bool {
        self.contains(other)
    }
}

/// Privacy metadata stored against a private contract, and attached to the
/// transaction being executed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivacyMetadata {
    /// Commitment of the transaction that created the contract
    pub creation_tx_hash: EncryptedPayloadHash,
    pub privacy_flag: PrivacyFlag,
}

impl PrivacyMetadata {
    pub fn new(creation_tx_hash: EncryptedPayloadHash, privacy_flag: PrivacyFlag) -> Self {
        Self {
            creation_tx_hash,
            privacy_flag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_validation_includes_party_protection() {
        let sv = PrivacyFlag::STATE_VALIDATION;
        assert!(sv.has(PrivacyFlag::PARTY_PROTECTION));
        assert!(!PrivacyFlag::PARTY_PROTECTION.has(PrivacyFlag::STATE_VALIDATION));
    }

    #[test]
    fn test_standard_private() {
        assert!(PrivacyFlag::STANDARD_PRIVATE.is_standard_private());
        assert!(PrivacyFlag::default().is_standard_private());
        assert!(PrivacyFlag::PARTY_PROTECTION.is_not_standard_private());
        assert_eq!(PrivacyFlag::STATE_VALIDATION.bits(), 3);
    }
}
