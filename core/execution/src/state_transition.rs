// redt/core/execution/src/state_transition.rs

//! The state transition model.
//!
//! Applying a message to the world state:
//!
//! 1. Nonce check and gas purchase
//! 2. For private messages, payload retrieval from the private transaction
//!    manager and privacy metadata preparation
//! 3. Intrinsic gas, charged over the on-chain data
//! 4. Contract creation or message call
//! 5. Privacy verification of the execution's effects
//! 6. Refund of unused gas and payment of the coinbase
//!
//! Private messages never report gas to the block: nodes that cannot read
//! the payload must arrive at the same block gas total as nodes that can.

use crate::gas_pool::GasPool;
use crate::intrinsic::intrinsic_gas;
use crate::message::Message;
use crate::metrics::{STATE_TRANSITIONS_TOTAL, TRANSITION_GAS_USED};
use crate::privacy::{PrivacyMetadataHandler, Verification};
use crate::types::{
    CallOutcome, ExecutionResult, Failure, TransitionError, VmError,
};
use crate::vm::Evm;
use redt_primitives::{Address, EncryptedPayloadHash, U256};
use redt_private::PrivateTransactionManager;
use std::borrow::Cow;
use tracing::{debug, info, warn};

/// Apply `msg` against the environment's state.
///
/// An `Err` means the message could never be valid in this block. Execution
/// failures that leave the block valid are reported through
/// `ExecutionResult::failure`.
///
/// The refund counter and the snapshot journal are per message: the block
/// loop must finalise both states (`StateDB::finalise`) after each call.
pub fn apply_message<E, P>(
    evm: &mut E,
    msg: &Message,
    gp: &mut GasPool,
    ptm: &P,
) -> Result<ExecutionResult, TransitionError>
where
    E: Evm + ?Sized,
    P: PrivateTransactionManager + ?Sized,
{
    StateTransition::new(evm, msg, gp, ptm).transition_db()
}

/// One message being applied. Lives for a single transition.
pub struct StateTransition<'a, E: Evm + ?Sized, P: PrivateTransactionManager + ?Sized> {
    gp: &'a mut GasPool,
    msg: &'a Message,
    gas: u64,
    initial_gas: u64,
    gas_price: U256,
    value: U256,
    data: &'a [u8],
    evm: &'a mut E,
    ptm: &'a P,
}

impl<'a, E, P> StateTransition<'a, E, P>
where
    E: Evm + ?Sized,
    P: PrivateTransactionManager + ?Sized,
{
    pub fn new(evm: &'a mut E, msg: &'a Message, gp: &'a mut GasPool, ptm: &'a P) -> Self {
        Self {
            gp,
            msg,
            gas: 0,
            initial_gas: 0,
            gas_price: msg.gas_price(),
            value: msg.value(),
            data: msg.data(),
            evm,
            ptm,
        }
    }

    /// Gas still available to execution
    pub fn gas(&self) -> u64 {
        self.gas
    }

    /// Gas bought from the sender
    pub fn initial_gas(&self) -> u64 {
        self.initial_gas
    }

    /// Gas consumed so far, net of refunds
    pub fn gas_used(&self) -> u64 {
        self.initial_gas - self.gas
    }

    fn use_gas(&mut self, amount: u64) -> Result<(), TransitionError> {
        if self.gas < amount {
            return Err(TransitionError::OutOfGas);
        }
        self.gas -= amount;
        Ok(())
    }

    /// Charge the sender for the message's gas limit and take it from the
    /// block's pool
    pub fn buy_gas(&mut self) -> Result<(), TransitionError> {
        let from = self.msg.from();
        let gas = self.msg.gas();
        let balance = self.evm.public_state().balance(&from);
        let cost = match U256::from(gas).checked_mul(self.gas_price) {
            Some(cost) if cost <= balance => cost,
            cost => {
                return Err(TransitionError::InsufficientBalanceForGas {
                    need: cost.unwrap_or(U256::MAX),
                    have: balance,
                })
            }
        };
        self.gp.sub_gas(gas)?;
        self.gas += gas;
        self.initial_gas = gas;
        self.evm.public_state().sub_balance(&from, cost);
        Ok(())
    }

    /// Nonce check followed by the gas purchase
    pub fn pre_check(&mut self) -> Result<(), TransitionError> {
        if self.msg.check_nonce() {
            let address = self.msg.from();
            let state = self.evm.public_state().nonce(&address);
            let message = self.msg.nonce();
            if state < message {
                return Err(TransitionError::NonceTooHigh { state, message });
            } else if state > message {
                return Err(TransitionError::NonceTooLow { state, message });
            } else if state == u64::MAX {
                return Err(TransitionError::NonceMax {
                    address,
                    nonce: state,
                });
            }
        }
        self.buy_gas()
    }

    /// Run the transition and record its outcome
    pub fn transition_db(&mut self) -> Result<ExecutionResult, TransitionError> {
        let result = self.execute();
        match &result {
            Ok(res) => {
                STATE_TRANSITIONS_TOTAL
                    .with_label_values(&[res.outcome()])
                    .inc();
                let is_private = self.evm.chain_config().is_quorum && self.msg.is_private();
                if !is_private {
                    TRANSITION_GAS_USED.observe(res.used_gas as f64);
                }
            }
            Err(e) => {
                STATE_TRANSITIONS_TOTAL.with_label_values(&["rejected"]).inc();
                debug!(from = %self.msg.from(), error = %e, "Message rejected");
            }
        }
        result
    }

    fn execute(&mut self) -> Result<ExecutionResult, TransitionError> {
        self.pre_check()?;

        let msg = self.msg;
        let sender = msg.from();
        let number = self.evm.block_number();
        let config = self.evm.chain_config();
        let homestead = config.is_homestead(number);
        let istanbul = config.is_istanbul(number);
        let is_private = config.is_quorum && msg.is_private();
        let contract_creation = msg.is_contract_creation();

        debug!(
            from = %sender,
            to = ?msg.to(),
            gas = self.initial_gas,
            is_private,
            "Applying message"
        );

        let mut handler = None;
        let input: Cow<'_, [u8]> = if is_private {
            let mut pmh = PrivacyMetadataHandler::new(
                &mut *self.evm,
                EncryptedPayloadHash::from_slice(self.data),
            );
            let received = pmh.receive(self.ptm);
            // Public nonce moves here for every private call, and for
            // creations this node could not look up
            if received.is_err() || !contract_creation {
                self.increment_public_nonce(&sender);
            }
            let Ok(plaintext) = received else {
                return Ok(ExecutionResult::inert());
            };
            if let Err(e) = pmh.prepare(&mut *self.evm) {
                warn!(hash = %pmh.payload_hash(), error = %e, "Private transaction rejected before execution");
                return Ok(ExecutionResult::failed_with(Failure::PrivacyPreparation(e)));
            }
            handler = Some(pmh);
            Cow::Owned(plaintext)
        } else {
            Cow::Borrowed(self.data)
        };

        // Charged over the on-chain data so that non-party nodes agree
        let intrinsic = intrinsic_gas(self.data, contract_creation, homestead, istanbul)?;
        self.use_gas(intrinsic)?;

        let (outcome, contract_address) = match msg.to() {
            None => {
                let created = self.evm.create(sender, &input, self.gas, self.value);
                let address = created.address;
                (CallOutcome::from(created), address)
            }
            Some(to) => {
                if !is_private {
                    self.increment_public_nonce(&sender);
                }
                if is_private && input.is_empty() {
                    // Not a party: only intrinsic gas is paid
                    self.refund_gas();
                    self.pay_coinbase();
                    return Ok(ExecutionResult::inert());
                }
                let called = self.evm.call(sender, to, &input, self.gas, self.value);
                (called, None)
            }
        };

        if let Some(err) = &outcome.error {
            info!(error = %err, "VM returned with error");
            // The first balance transfer may never fail
            if *err == VmError::InsufficientBalance {
                return Err(TransitionError::InsufficientBalance);
            }
        }

        if let Some(pmh) = handler.as_mut() {
            if pmh.must_verify() {
                if let Verification::ExitEarly(failure) =
                    pmh.verify(&mut *self.evm, outcome.error.as_ref())
                {
                    return Ok(ExecutionResult::failed_with(failure));
                }
            }
        }

        // Leftover gas of a private execution is only visible to parties
        if !is_private {
            if outcome.leftover_gas > self.gas {
                warn!(
                    leftover = outcome.leftover_gas,
                    available = self.gas,
                    "Engine reported more leftover gas than it was given"
                );
            }
            self.gas = outcome.leftover_gas.min(self.gas);
        }

        self.refund_gas();
        self.pay_coinbase();

        Ok(ExecutionResult {
            used_gas: if is_private { 0 } else { self.gas_used() },
            return_data: outcome.output,
            contract_address,
            failure: outcome.error.map(Failure::Vm),
        })
    }

    // Checked messages never reach here at u64::MAX; unchecked ones stay there
    fn increment_public_nonce(&mut self, address: &Address) {
        let state = self.evm.public_state();
        let nonce = state.nonce(address);
        state.set_nonce(address, nonce.saturating_add(1));
    }

    /// Return unused gas to the sender and the block's pool
    pub fn refund_gas(&mut self) {
        // Refund counter, capped to half of the used gas
        let refund = (self.gas_used() / 2).min(self.evm.public_state().refund());
        self.gas += refund;

        // Remaining gas goes back to the sender at the original price
        let remaining = U256::from(self.gas).saturating_mul(self.gas_price);
        let from = self.msg.from();
        self.evm.public_state().add_balance(&from, remaining);

        // and back to the block for the next transaction
        self.gp.add_gas(self.gas);
    }

    fn pay_coinbase(&mut self) {
        let fee = U256::from(self.gas_used()).saturating_mul(self.gas_price);
        let coinbase = self.evm.coinbase();
        self.evm.public_state().add_balance(&coinbase, fee);
    }
}
