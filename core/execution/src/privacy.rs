// redt/core/execution/src/privacy.rs

//! Privacy enhancement checks around private message execution.
//!
//! A handler exists only while a private message is being applied. It holds
//! the snapshot taken before any private-specific mutation, so that a failed
//! verification can roll the private state back to exactly that point.

use crate::metrics::{PRIVACY_VERIFICATIONS_TOTAL, PRIVATE_PAYLOAD_RECEIVE_TOTAL};
use crate::state::Snapshot;
use crate::types::{Failure, PrivacyError, VmError};
use crate::vm::Evm;
use redt_primitives::{EncryptedPayloadHash, PrivacyMetadata};
use redt_private::{ExtraMetadata, PrivateError, PrivateTransactionManager};
use tracing::{debug, trace, warn};

/// Result of the post-execution check
#[derive(Debug, PartialEq, Eq)]
pub enum Verification {
    Continue,
    /// The private state has been reverted; the message must be reported
    /// as failed
    ExitEarly(Failure),
}

pub struct PrivacyMetadataHandler {
    snapshot: Option<Snapshot>,
    payload_hash: EncryptedPayloadHash,
    received_metadata: Option<ExtraMetadata>,
    has_private_payload: bool,
    enhancements_enabled: bool,
}

impl PrivacyMetadataHandler {
    /// Snapshot the execution state and start handling `payload_hash`
    pub fn new<E: Evm + ?Sized>(evm: &mut E, payload_hash: EncryptedPayloadHash) -> Self {
        let enhancements_enabled = evm
            .chain_config()
            .is_privacy_enhancements_enabled(evm.block_number());
        let snapshot = evm.state().snapshot();
        Self {
            snapshot: Some(snapshot),
            payload_hash,
            received_metadata: None,
            has_private_payload: false,
            enhancements_enabled,
        }
    }

    pub fn payload_hash(&self) -> &EncryptedPayloadHash {
        &self.payload_hash
    }

    /// Fetch the payload for this message. Returns the plaintext, empty when
    /// this node is not a party.
    pub fn receive<P: PrivateTransactionManager + ?Sized>(
        &mut self,
        ptm: &P,
    ) -> Result<Vec<u8>, PrivateError> {
        match ptm.receive(&self.payload_hash) {
            Ok(Some(payload)) => {
                PRIVATE_PAYLOAD_RECEIVE_TOTAL
                    .with_label_values(&["party"])
                    .inc();
                self.has_private_payload = true;
                self.received_metadata = payload.metadata;
                Ok(payload.plaintext)
            }
            Ok(None) => {
                PRIVATE_PAYLOAD_RECEIVE_TOTAL
                    .with_label_values(&["not_party"])
                    .inc();
                debug!(hash = %self.payload_hash, "Not a party to private transaction");
                Ok(Vec::new())
            }
            Err(e) => {
                PRIVATE_PAYLOAD_RECEIVE_TOTAL
                    .with_label_values(&["error"])
                    .inc();
                warn!(hash = %self.payload_hash, error = %e, "Private payload unavailable");
                Err(e)
            }
        }
    }

    /// Check received metadata before execution and attach it to the
    /// transaction
    pub fn prepare<E: Evm + ?Sized>(&self, evm: &mut E) -> Result<(), PrivacyError> {
        let Some(metadata) = &self.received_metadata else {
            return Ok(());
        };
        if !self.enhancements_enabled && metadata.privacy_flag.is_not_standard_private() {
            return Err(PrivacyError::EnhancementsDisabled);
        }
        // Contracts created by this message record its commitment
        evm.set_tx_privacy_metadata(PrivacyMetadata {
            creation_tx_hash: self.payload_hash,
            privacy_flag: metadata.privacy_flag,
        });
        Ok(())
    }

    pub fn must_verify(&self) -> bool {
        self.has_private_payload && self.received_metadata.is_some() && self.enhancements_enabled
    }

    /// Compare the execution's effects against the received metadata.
    ///
    /// On mismatch the private state is reverted to the handler's snapshot.
    pub fn verify<E: Evm + ?Sized>(
        &mut self,
        evm: &mut E,
        vm_error: Option<&VmError>,
    ) -> Verification {
        match self.check(evm) {
            Ok(()) => {
                PRIVACY_VERIFICATIONS_TOTAL
                    .with_label_values(&["passed"])
                    .inc();
                Verification::Continue
            }
            Err(error) => {
                PRIVACY_VERIFICATIONS_TOTAL
                    .with_label_values(&["failed"])
                    .inc();
                debug!(hash = %self.payload_hash, %error, ?vm_error, "Privacy verification failed");
                if let Some(snapshot) = self.snapshot.take() {
                    evm.state().revert_to_snapshot(snapshot);
                }
                Verification::ExitEarly(Failure::PrivacyVerification {
                    error,
                    vm_error: vm_error.cloned(),
                })
            }
        }
    }

    fn check<E: Evm + ?Sized>(&self, evm: &mut E) -> Result<(), PrivacyError> {
        let Some(received) = &self.received_metadata else {
            return Ok(());
        };
        let flag = received.privacy_flag;
        let affected = evm.affected_contracts();
        trace!(
            expected = received.ac_hashes.len(),
            affected = affected.len(),
            "Verify hashes of affected contracts"
        );

        for address in affected {
            let actual = match evm.state().state_privacy_metadata(&address) {
                Ok(actual) => actual,
                Err(e) => {
                    debug!(%address, error = %e, "Privacy metadata lookup failed");
                    None
                }
            };
            let Some(actual) = actual else {
                if flag.is_not_standard_private() {
                    return Err(PrivacyError::MissingPrivacyMetadata { address });
                }
                continue;
            };
            if actual.privacy_flag != flag {
                return Err(PrivacyError::MismatchedPrivacyFlag {
                    address,
                    contract: actual.privacy_flag,
                    received: flag,
                });
            }
            if flag.is_not_standard_private()
                && !received.ac_hashes.contains(&actual.creation_tx_hash)
            {
                return Err(PrivacyError::ParticipationCheckFailed {
                    address,
                    creation_tx_hash: actual.creation_tx_hash,
                });
            }
        }

        if !received.ac_merkle_root.is_zero() {
            let actual = evm
                .calculate_merkle_root()
                .map_err(|e| PrivacyError::MerkleRoot(e.to_string()))?;
            if actual != received.ac_merkle_root {
                return Err(PrivacyError::MerkleRootMismatch {
                    expected: received.ac_merkle_root,
                    actual,
                });
            }
        }
        Ok(())
    }
}
