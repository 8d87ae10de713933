// redt/core/execution/src/gas_pool.rs

use crate::types::GasPoolError;
use std::fmt;
use tracing::warn;

/// Gas available to the transactions of one block.
///
/// The block loop owns the pool and lends it to each transition in turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GasPool(u64);

impl GasPool {
    pub fn new(gas: u64) -> Self {
        GasPool(gas)
    }

    /// Return gas to the pool
    pub fn add_gas(&mut self, amount: u64) -> &mut Self {
        match self.0.checked_add(amount) {
            Some(gas) => self.0 = gas,
            None => {
                warn!(pool = self.0, amount, "Gas pool saturated");
                self.0 = u64::MAX;
            }
        }
        self
    }

    /// Reserve gas, failing without change if not enough is left
    pub fn sub_gas(&mut self, amount: u64) -> Result<(), GasPoolError> {
        if self.0 < amount {
            return Err(GasPoolError::GasLimitReached {
                requested: amount,
                available: self.0,
            });
        }
        self.0 -= amount;
        Ok(())
    }

    /// Remaining gas
    pub fn gas(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for GasPool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
