// redt/core/execution/src/state/state_db.rs

// In-memory world state with a journal for snapshot/revert
use super::{Snapshot, StateError, WorldState};
use redt_primitives::{Address, Hash, PrivacyMetadata, U256};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// State root hash
pub type StateRoot = Hash;

/// Account state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Account {
    pub nonce: u64,
    pub balance: U256,
    pub code: Vec<u8>,
    pub storage: BTreeMap<Hash, Hash>,
    pub privacy_metadata: Option<PrivacyMetadata>,
}

impl Account {
    /// Keccak-256 over the sorted storage slots
    pub fn storage_root(&self) -> Hash {
        let mut buf = Vec::with_capacity(self.storage.len() * 64);
        for (key, value) in &self.storage {
            buf.extend_from_slice(key.as_bytes());
            buf.extend_from_slice(value.as_bytes());
        }
        Hash::keccak256(&buf)
    }

    fn encode(&self, address: &Address, out: &mut Vec<u8>) {
        let mut balance = [0u8; 32];
        self.balance.to_big_endian(&mut balance);
        out.extend_from_slice(address.as_bytes());
        out.extend_from_slice(&self.nonce.to_be_bytes());
        out.extend_from_slice(&balance);
        out.extend_from_slice(Hash::keccak256(&self.code).as_bytes());
        out.extend_from_slice(self.storage_root().as_bytes());
        if let Some(pm) = &self.privacy_metadata {
            out.extend_from_slice(pm.creation_tx_hash.as_bytes());
            out.extend_from_slice(&pm.privacy_flag.bits().to_be_bytes());
        }
    }
}

#[derive(Debug, Clone)]
enum JournalEntry {
    Account {
        address: Address,
        prev: Option<Account>,
    },
    Refund {
        prev: u64,
    },
}

/// In-memory state database.
///
/// Every mutation records the previous value of what it touched, so
/// `revert_to_snapshot` can unwind to any earlier snapshot. Account entries
/// are journaled whole; the journal grows until `finalise`, which must run
/// once per transaction.
#[derive(Debug, Clone, Default)]
pub struct StateDB {
    accounts: BTreeMap<Address, Account>,
    refund: u64,
    journal: Vec<JournalEntry>,
}

impl StateDB {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn exists(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    pub fn account(&self, address: &Address) -> Option<&Account> {
        self.accounts.get(address)
    }

    fn account_mut(&mut self, address: &Address) -> &mut Account {
        let prev = self.accounts.get(address).cloned();
        self.journal.push(JournalEntry::Account {
            address: *address,
            prev,
        });
        self.accounts.entry(*address).or_default()
    }

    pub fn set_balance(&mut self, address: &Address, balance: U256) {
        self.account_mut(address).balance = balance;
    }

    pub fn code(&self, address: &Address) -> &[u8] {
        self.accounts
            .get(address)
            .map(|a| a.code.as_slice())
            .unwrap_or_default()
    }

    pub fn set_code(&mut self, address: &Address, code: Vec<u8>) {
        self.account_mut(address).code = code;
    }

    pub fn storage(&self, address: &Address, key: &Hash) -> Hash {
        self.accounts
            .get(address)
            .and_then(|a| a.storage.get(key).copied())
            .unwrap_or_default()
    }

    /// Set a storage slot; a zero value clears it
    pub fn set_storage(&mut self, address: &Address, key: Hash, value: Hash) {
        let account = self.account_mut(address);
        if value.is_zero() {
            account.storage.remove(&key);
        } else {
            account.storage.insert(key, value);
        }
    }

    pub fn storage_root(&self, address: &Address) -> Hash {
        self.accounts
            .get(address)
            .map(Account::storage_root)
            .unwrap_or_else(|| Account::default().storage_root())
    }

    pub fn set_state_privacy_metadata(&mut self, address: &Address, metadata: PrivacyMetadata) {
        self.account_mut(address).privacy_metadata = Some(metadata);
    }

    pub fn add_refund(&mut self, gas: u64) {
        self.journal.push(JournalEntry::Refund { prev: self.refund });
        self.refund = self.refund.saturating_add(gas);
    }

    pub fn sub_refund(&mut self, gas: u64) {
        self.journal.push(JournalEntry::Refund { prev: self.refund });
        self.refund = self.refund.saturating_sub(gas);
    }

    /// Root over every account, in address order
    pub fn state_root(&self) -> StateRoot {
        let mut buf = Vec::new();
        for (address, account) in &self.accounts {
            account.encode(address, &mut buf);
        }
        Hash::keccak256(&buf)
    }

    /// End the current transaction: drop the journal and reset the refund
    /// counter. Snapshots taken before this point can no longer be reverted.
    pub fn finalise(&mut self) -> StateRoot {
        self.journal.clear();
        self.refund = 0;
        let root = self.state_root();
        debug!(%root, "State finalised");
        root
    }

    pub fn journal_len(&self) -> usize {
        self.journal.len()
    }
}

impl WorldState for StateDB {
    fn balance(&self, address: &Address) -> U256 {
        self.accounts
            .get(address)
            .map(|a| a.balance)
            .unwrap_or_default()
    }

    fn add_balance(&mut self, address: &Address, amount: U256) {
        let account = self.account_mut(address);
        account.balance = account.balance.saturating_add(amount);
    }

    fn sub_balance(&mut self, address: &Address, amount: U256) {
        let account = self.account_mut(address);
        if account.balance < amount {
            warn!(%address, balance = %account.balance, %amount, "Balance underflow clamped to zero");
        }
        account.balance = account.balance.saturating_sub(amount);
    }

    fn nonce(&self, address: &Address) -> u64 {
        self.accounts.get(address).map(|a| a.nonce).unwrap_or(0)
    }

    fn set_nonce(&mut self, address: &Address, nonce: u64) {
        self.account_mut(address).nonce = nonce;
    }

    fn refund(&self) -> u64 {
        self.refund
    }

    fn snapshot(&mut self) -> Snapshot {
        Snapshot::new(self.journal.len())
    }

    fn revert_to_snapshot(&mut self, snapshot: Snapshot) {
        let target = snapshot.id();
        if target > self.journal.len() {
            warn!(
                snapshot = target,
                journal = self.journal.len(),
                "Snapshot no longer valid, ignoring revert"
            );
            return;
        }
        while self.journal.len() > target {
            match self.journal.pop() {
                Some(JournalEntry::Account { address, prev }) => match prev {
                    Some(account) => {
                        self.accounts.insert(address, account);
                    }
                    None => {
                        self.accounts.remove(&address);
                    }
                },
                Some(JournalEntry::Refund { prev }) => self.refund = prev,
                None => break,
            }
        }
        debug!(snapshot = target, "State reverted to snapshot");
    }

    fn state_privacy_metadata(
        &self,
        address: &Address,
    ) -> Result<Option<PrivacyMetadata>, StateError> {
        Ok(self
            .accounts
            .get(address)
            .and_then(|a| a.privacy_metadata.clone()))
    }
}
