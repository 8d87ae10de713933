// redt/core/execution/src/message.rs

use redt_primitives::{Address, EncryptedPayloadHash, U256};
use serde::{Deserialize, Serialize};

/// Fields shared by every message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessagePayload {
    pub from: Address,
    /// `None` deploys a contract
    pub to: Option<Address>,
    pub gas: u64,
    pub gas_price: U256,
    pub value: U256,
    pub data: Vec<u8>,
    pub nonce: u64,
    pub check_nonce: bool,
}

impl MessagePayload {
    pub fn new(from: Address, to: Option<Address>, nonce: u64) -> Self {
        Self {
            from,
            to,
            gas: 0,
            gas_price: U256::zero(),
            value: U256::zero(),
            data: Vec::new(),
            nonce,
            check_nonce: true,
        }
    }

    pub fn with_gas(mut self, gas: u64, gas_price: U256) -> Self {
        self.gas = gas;
        self.gas_price = gas_price;
        self
    }

    pub fn with_value(mut self, value: U256) -> Self {
        self.value = value;
        self
    }

    pub fn with_data(mut self, data: Vec<u8>) -> Self {
        self.data = data;
        self
    }

    /// Skip the nonce check (calls simulated outside a block)
    pub fn skip_nonce_check(mut self) -> Self {
        self.check_nonce = false;
        self
    }
}

/// A transaction to apply.
///
/// The data of a private message is the commitment to its off-chain payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    Public(MessagePayload),
    Private(MessagePayload),
}

impl Message {
    /// A private message whose payload is committed to by `hash`
    pub fn private(payload: MessagePayload, hash: EncryptedPayloadHash) -> Self {
        Message::Private(payload.with_data(hash.as_bytes().to_vec()))
    }

    pub fn payload(&self) -> &MessagePayload {
        match self {
            Message::Public(payload) | Message::Private(payload) => payload,
        }
    }

    pub fn is_private(&self) -> bool {
        matches!(self, Message::Private(_))
    }

    pub fn from(&self) -> Address {
        self.payload().from
    }

    pub fn to(&self) -> Option<Address> {
        self.payload().to
    }

    pub fn gas(&self) -> u64 {
        self.payload().gas
    }

    pub fn gas_price(&self) -> U256 {
        self.payload().gas_price
    }

    pub fn value(&self) -> U256 {
        self.payload().value
    }

    pub fn data(&self) -> &[u8] {
        &self.payload().data
    }

    pub fn nonce(&self) -> u64 {
        self.payload().nonce
    }

    pub fn check_nonce(&self) -> bool {
        self.payload().check_nonce
    }

    pub fn is_contract_creation(&self) -> bool {
        self.payload().to.is_none()
    }
}
