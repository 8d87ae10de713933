// redt/core/execution/src/params.rs

// Protocol constants

/// Per-transaction cost of a message call
pub const TX_GAS: u64 = 21_000;

/// Per-transaction cost of contract creation under Homestead rules
pub const TX_GAS_CONTRACT_CREATION: u64 = 53_000;

/// Cost per zero byte of transaction data
pub const TX_DATA_ZERO_GAS: u64 = 4;

/// Cost per non-zero byte of transaction data before Istanbul
pub const TX_DATA_NON_ZERO_GAS_FRONTIER: u64 = 68;

/// Cost per non-zero byte of transaction data from Istanbul (EIP-2028)
pub const TX_DATA_NON_ZERO_GAS_EIP2028: u64 = 16;

/// Fixed block gas limit of the network, replacing the dynamic limit
pub const NETWORK_GAS_LIMIT: u64 = 30_000_000;

/// First block that uses `NETWORK_GAS_LIMIT`
pub const NETWORK_GAS_LIMIT_BLOCK: u64 = 106_983_273;

/// Seconds between blocks
pub const NETWORK_BLOCK_PERIOD: u64 = 3;
