// redt/core/execution/src/intrinsic.rs

use crate::params::{
    TX_DATA_NON_ZERO_GAS_EIP2028, TX_DATA_NON_ZERO_GAS_FRONTIER, TX_DATA_ZERO_GAS, TX_GAS,
    TX_GAS_CONTRACT_CREATION,
};
use crate::types::TransitionError;

/// Gas charged for including a message with `data`, before any execution.
///
/// For private messages `data` must be the on-chain commitment, so that
/// nodes without the payload charge the same amount.
pub fn intrinsic_gas(
    data: &[u8],
    contract_creation: bool,
    homestead: bool,
    eip2028: bool,
) -> Result<u64, TransitionError> {
    let gas = if contract_creation && homestead {
        TX_GAS_CONTRACT_CREATION
    } else {
        TX_GAS
    };
    if data.is_empty() {
        return Ok(gas);
    }

    let non_zero = data.iter().filter(|&&b| b != 0).count() as u64;
    let zero = data.len() as u64 - non_zero;
    add_data_gas(gas, non_zero, zero, eip2028)
}

fn add_data_gas(
    mut gas: u64,
    non_zero: u64,
    zero: u64,
    eip2028: bool,
) -> Result<u64, TransitionError> {
    let non_zero_gas = if eip2028 {
        TX_DATA_NON_ZERO_GAS_EIP2028
    } else {
        TX_DATA_NON_ZERO_GAS_FRONTIER
    };
    // Check headroom before multiplying
    if (u64::MAX - gas) / non_zero_gas < non_zero {
        return Err(TransitionError::OutOfGas);
    }
    gas += non_zero * non_zero_gas;

    if (u64::MAX - gas) / TX_DATA_ZERO_GAS < zero {
        return Err(TransitionError::OutOfGas);
    }
    gas += zero * TX_DATA_ZERO_GAS;

    Ok(gas)
}
