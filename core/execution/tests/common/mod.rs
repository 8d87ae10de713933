// Shared fixtures for the execution integration tests

#![allow(dead_code)]

use redt_execution::{
    Address, CallOutcome, ChainConfig, CreateOutcome, EncryptedPayloadHash, Evm, Hash,
    PrivacyMetadata, Snapshot, StateDB, StateError, VmError, WorldState, U256,
};
use redt_private::{PrivateError, PrivateTransactionManager, ReceivedPayload};

pub const COINBASE: Address = Address([0xCB; 20]);

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn create_test_address(num: u8) -> Address {
    let mut addr = [0u8; 20];
    addr[0] = num;
    Address(addr)
}

/// Storage slot the test engine writes on every call
pub fn touched_slot() -> Hash {
    Hash::new([1u8; 32])
}

/// Private state that counts reverts
#[derive(Debug, Default)]
pub struct CountingState {
    pub inner: StateDB,
    pub snapshots: usize,
    pub reverts: usize,
    /// Fail every privacy metadata lookup
    pub metadata_lookup_fails: bool,
}

impl WorldState for CountingState {
    fn balance(&self, address: &Address) -> U256 {
        self.inner.balance(address)
    }

    fn add_balance(&mut self, address: &Address, amount: U256) {
        self.inner.add_balance(address, amount)
    }

    fn sub_balance(&mut self, address: &Address, amount: U256) {
        self.inner.sub_balance(address, amount)
    }

    fn nonce(&self, address: &Address) -> u64 {
        self.inner.nonce(address)
    }

    fn set_nonce(&mut self, address: &Address, nonce: u64) {
        self.inner.set_nonce(address, nonce)
    }

    fn refund(&self) -> u64 {
        self.inner.refund()
    }

    fn snapshot(&mut self) -> Snapshot {
        self.snapshots += 1;
        self.inner.snapshot()
    }

    fn revert_to_snapshot(&mut self, snapshot: Snapshot) {
        self.reverts += 1;
        self.inner.revert_to_snapshot(snapshot)
    }

    fn state_privacy_metadata(
        &self,
        address: &Address,
    ) -> Result<Option<PrivacyMetadata>, StateError> {
        if self.metadata_lookup_fails {
            return Err(StateError::Backend("metadata store offline".into()));
        }
        self.inner.state_privacy_metadata(address)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    Call,
    Create,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub caller: Address,
    pub to: Option<Address>,
    pub input: Vec<u8>,
    pub gas: u64,
    pub value: U256,
}

/// Scriptable engine.
///
/// Every call burns `execution_gas`, moves `value` from caller to callee,
/// writes `keccak(input)` into the callee's `touched_slot()` and adds
/// `refund` credits to the public refund counter.
pub struct TestEvm {
    pub config: ChainConfig,
    pub block_number: u64,
    pub public: StateDB,
    pub private: CountingState,
    /// Route `state()` to the private state
    pub private_mode: bool,
    pub execution_gas: u64,
    pub refund: u64,
    pub vm_error: Option<VmError>,
    pub calls: Vec<RecordedCall>,
    pub tx_privacy_metadata: Option<PrivacyMetadata>,
    pub affected: Vec<Address>,
    pub merkle_root_fails: bool,
}

impl TestEvm {
    pub fn new(config: ChainConfig) -> Self {
        Self {
            config,
            block_number: 1,
            public: StateDB::new(),
            private: CountingState::default(),
            private_mode: false,
            execution_gas: 0,
            refund: 0,
            vm_error: None,
            calls: Vec::new(),
            tx_privacy_metadata: None,
            affected: Vec::new(),
            merkle_root_fails: false,
        }
    }

    pub fn fund(&mut self, address: Address, balance: u64) -> &mut Self {
        self.public.set_balance(&address, U256::from(balance));
        self
    }

    /// Merkle root the engine will report for `affected`
    pub fn expected_merkle_root(&mut self) -> Hash {
        let mut buf = Vec::new();
        for address in self.affected.clone() {
            buf.extend_from_slice(self.exec_state_db().storage_root(&address).as_bytes());
        }
        Hash::keccak256(&buf)
    }

    fn exec_state_db(&mut self) -> &mut StateDB {
        if self.private_mode {
            &mut self.private.inner
        } else {
            &mut self.public
        }
    }

    fn leftover(&self, gas: u64) -> u64 {
        gas - self.execution_gas.min(gas)
    }

    fn scripted_error(&self, gas: u64) -> Option<(u64, VmError)> {
        self.vm_error.clone().map(|err| {
            let leftover = if err == VmError::OutOfGas {
                0
            } else {
                self.leftover(gas)
            };
            (leftover, err)
        })
    }

    fn transfer(&mut self, from: &Address, to: &Address, value: U256) -> bool {
        let state = self.state();
        if state.balance(from) < value {
            return false;
        }
        state.sub_balance(from, value);
        state.add_balance(to, value);
        true
    }
}

impl Evm for TestEvm {
    fn chain_config(&self) -> &ChainConfig {
        &self.config
    }

    fn block_number(&self) -> u64 {
        self.block_number
    }

    fn coinbase(&self) -> Address {
        COINBASE
    }

    fn public_state(&mut self) -> &mut dyn WorldState {
        &mut self.public
    }

    fn state(&mut self) -> &mut dyn WorldState {
        if self.private_mode {
            &mut self.private
        } else {
            &mut self.public
        }
    }

    fn create(&mut self, caller: Address, code: &[u8], gas: u64, value: U256) -> CreateOutcome {
        self.calls.push(RecordedCall {
            kind: CallKind::Create,
            caller,
            to: None,
            input: code.to_vec(),
            gas,
            value,
        });
        if let Some((leftover_gas, error)) = self.scripted_error(gas) {
            return CreateOutcome {
                leftover_gas,
                error: Some(error),
                ..Default::default()
            };
        }

        let nonce = self.state().nonce(&caller);
        let mut seed = caller.as_bytes().to_vec();
        seed.extend_from_slice(&nonce.to_be_bytes());
        let address = Address::from_slice(&Hash::keccak256(&seed).as_bytes()[12..]);
        self.state().set_nonce(&caller, nonce + 1);

        if !self.transfer(&caller, &address, value) {
            return CreateOutcome {
                leftover_gas: gas,
                error: Some(VmError::InsufficientBalance),
                ..Default::default()
            };
        }
        let metadata = self.tx_privacy_metadata.clone();
        let db = self.exec_state_db();
        db.set_code(&address, code.to_vec());
        if let Some(pm) = metadata {
            db.set_state_privacy_metadata(&address, pm);
        }
        self.affected = vec![address];

        CreateOutcome {
            output: code.to_vec(),
            address: Some(address),
            leftover_gas: self.leftover(gas),
            error: None,
        }
    }

    fn call(
        &mut self,
        caller: Address,
        to: Address,
        input: &[u8],
        gas: u64,
        value: U256,
    ) -> CallOutcome {
        self.calls.push(RecordedCall {
            kind: CallKind::Call,
            caller,
            to: Some(to),
            input: input.to_vec(),
            gas,
            value,
        });
        if let Some((leftover_gas, error)) = self.scripted_error(gas) {
            return CallOutcome {
                output: Vec::new(),
                leftover_gas,
                error: Some(error),
            };
        }
        if !self.transfer(&caller, &to, value) {
            return CallOutcome {
                output: Vec::new(),
                leftover_gas: gas,
                error: Some(VmError::InsufficientBalance),
            };
        }

        let written = Hash::keccak256(input);
        self.exec_state_db().set_storage(&to, touched_slot(), written);
        let refund = self.refund;
        self.public.add_refund(refund);
        self.affected = vec![to];

        CallOutcome {
            output: written.as_bytes().to_vec(),
            leftover_gas: self.leftover(gas),
            error: None,
        }
    }

    fn set_tx_privacy_metadata(&mut self, metadata: PrivacyMetadata) {
        self.tx_privacy_metadata = Some(metadata);
    }

    fn affected_contracts(&self) -> Vec<Address> {
        self.affected.clone()
    }

    fn calculate_merkle_root(&mut self) -> anyhow::Result<Hash> {
        if self.merkle_root_fails {
            anyhow::bail!("storage trie unavailable");
        }
        Ok(self.expected_merkle_root())
    }
}

/// Payload manager that answers every lookup the same way
pub struct StaticManager {
    pub response: Result<Option<ReceivedPayload>, PrivateError>,
}

impl StaticManager {
    pub fn party(plaintext: Vec<u8>) -> Self {
        Self {
            response: Ok(Some(ReceivedPayload {
                plaintext,
                metadata: None,
            })),
        }
    }

    pub fn not_party() -> Self {
        Self { response: Ok(None) }
    }
}

impl PrivateTransactionManager for StaticManager {
    fn receive(
        &self,
        _hash: &EncryptedPayloadHash,
    ) -> Result<Option<ReceivedPayload>, PrivateError> {
        self.response.clone()
    }
}
