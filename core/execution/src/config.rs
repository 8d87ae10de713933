// redt/core/execution/src/config.rs

use crate::params::{NETWORK_BLOCK_PERIOD, NETWORK_GAS_LIMIT, NETWORK_GAS_LIMIT_BLOCK};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Chain rules the state transition depends on.
///
/// Activation heights are `None` when the fork never activates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain ID
    pub chain_id: u64,

    /// Enables private transactions
    #[serde(default = "default_is_quorum")]
    pub is_quorum: bool,

    #[serde(default)]
    pub homestead_block: Option<u64>,

    /// Istanbul, which carries the EIP-2028 calldata repricing
    #[serde(default)]
    pub istanbul_block: Option<u64>,

    /// Enables party protection and state validation for private transactions
    #[serde(default)]
    pub privacy_enhancements_block: Option<u64>,

    /// First block that uses the fixed network gas limit
    #[serde(default = "default_gas_limit_block")]
    pub gas_limit_override_block: Option<u64>,

    /// Block time in seconds
    #[serde(default = "default_block_period")]
    pub block_period: u64,
}

fn default_is_quorum() -> bool {
    true
}

fn default_gas_limit_block() -> Option<u64> {
    Some(NETWORK_GAS_LIMIT_BLOCK)
}

fn default_block_period() -> u64 {
    NETWORK_BLOCK_PERIOD
}

fn is_forked(activation: Option<u64>, number: u64) -> bool {
    activation.is_some_and(|block| block <= number)
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("privacy enhancements require is_quorum = true")]
    PrivacyEnhancementsWithoutQuorum,

    #[error("block_period must be greater than zero")]
    ZeroBlockPeriod,

    #[error("istanbul_block ({istanbul}) precedes homestead_block ({homestead})")]
    ForkOrdering { homestead: u64, istanbul: u64 },
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            chain_id: 83584648538,
            is_quorum: true,
            homestead_block: Some(0),
            istanbul_block: Some(0),
            privacy_enhancements_block: None,
            gas_limit_override_block: default_gas_limit_block(),
            block_period: NETWORK_BLOCK_PERIOD,
        }
    }
}

impl ChainConfig {
    pub fn is_homestead(&self, number: u64) -> bool {
        is_forked(self.homestead_block, number)
    }

    pub fn is_istanbul(&self, number: u64) -> bool {
        is_forked(self.istanbul_block, number)
    }

    pub fn is_privacy_enhancements_enabled(&self, number: u64) -> bool {
        is_forked(self.privacy_enhancements_block, number)
    }

    /// Gas limit for block `number`: the fixed network limit once the
    /// override is active, otherwise inherited from the parent
    pub fn block_gas_limit(&self, number: u64, parent_gas_limit: u64) -> u64 {
        if is_forked(self.gas_limit_override_block, number) {
            NETWORK_GAS_LIMIT
        } else {
            parent_gas_limit
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.privacy_enhancements_block.is_some() && !self.is_quorum {
            return Err(ConfigError::PrivacyEnhancementsWithoutQuorum);
        }
        if self.block_period == 0 {
            return Err(ConfigError::ZeroBlockPeriod);
        }
        if let (Some(homestead), Some(istanbul)) = (self.homestead_block, self.istanbul_block) {
            if istanbul < homestead {
                return Err(ConfigError::ForkOrdering {
                    homestead,
                    istanbul,
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a TOML chain configuration
    pub fn from_toml_str(s: &str) -> anyhow::Result<Self> {
        let config: ChainConfig = toml::from_str(s).context("failed to parse chain config")?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML chain configuration file
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read chain config {}", path.display()))?;
        Self::from_toml_str(&contents)
    }
}
