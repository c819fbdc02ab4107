//! Harness configuration.
//!
//! All session state the harness needs — endpoint, chain id, funder key,
//! gas parameters, scenario constants — lives in an explicit
//! [`HarnessConfig`] passed to each component constructor. There are no
//! process-wide singletons.

use std::str::FromStr;
use std::time::Duration;

use alloy::{
    primitives::{Address, U256},
    signers::local::PrivateKeySigner,
};

use crate::error::{HarnessError, HarnessResult};

// ============================================================================
// FunderAccount
// ============================================================================

/// The pre-funded faucet account for the target network.
///
/// The signer is the account's only identity; the address is derived from it
/// at construction so the two can never disagree.
#[derive(Debug, Clone)]
pub struct FunderAccount {
    address: Address,
    signer: PrivateKeySigner,
}

impl FunderAccount {
    pub fn new(signer: PrivateKeySigner) -> Self {
        Self {
            address: signer.address(),
            signer,
        }
    }

    /// Parse a funder from a hex-encoded private key (with or without `0x`).
    pub fn from_hex_key(key: &str) -> HarnessResult<Self> {
        let signer = PrivateKeySigner::from_str(key.trim_start_matches("0x"))
            .map_err(|e| HarnessError::Setup(format!("invalid funder key: {e}")))?;
        Ok(Self::new(signer))
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn signer(&self) -> &PrivateKeySigner {
        &self.signer
    }
}

// ============================================================================
// GasSettings
// ============================================================================

/// Legacy (gas-price) transaction pricing used for every harness submission.
///
/// The target network prices transactions with a flat gas price, so the
/// harness does no fee estimation.
#[derive(Debug, Clone, Copy)]
pub struct GasSettings {
    /// Gas limit per transaction
    pub gas_limit: u64,
    /// Gas price in wei
    pub gas_price: u128,
}

impl Default for GasSettings {
    fn default() -> Self {
        Self {
            gas_limit: 7_000_000,
            gas_price: 1_000_000_000,
        }
    }
}

impl GasSettings {
    pub fn with_gas_limit(mut self, gas_limit: u64) -> Self {
        self.gas_limit = gas_limit;
        self
    }

    pub fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }
}

// ============================================================================
// HarnessConfig
// ============================================================================

/// Complete configuration for one harness session.
///
/// Defaults match the network the harness was written against: chain id
/// 1666700000, 7M gas limit, 1 gwei gas price, 10^16 wei starting balance
/// per wallet, 4 wallets, and the settle delays used by the fixed-delay
/// wait strategy.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Chain endpoint URL (`wss://` preferred, `http://` accepted)
    pub rpc_url: String,
    /// Numeric network id, baked into every signed transaction
    pub chain_id: u64,
    /// Pre-funded faucet account
    pub funder: FunderAccount,
    /// Gas pricing for all submissions
    pub gas: GasSettings,
    /// Starting balance transferred to each wallet's main account, in wei
    pub funding_amount: U256,
    /// Number of player wallets to provision per scenario
    pub wallet_count: usize,
    /// Settle delay after the funding batch (fixed-delay strategy only)
    pub funding_settle: Duration,
    /// Settle delay after each join submission (fixed-delay strategy only)
    pub join_settle: Duration,
}

impl HarnessConfig {
    pub fn new(rpc_url: impl Into<String>, chain_id: u64, funder: FunderAccount) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            chain_id,
            funder,
            gas: GasSettings::default(),
            funding_amount: U256::from(10u64.pow(16)),
            wallet_count: 4,
            funding_settle: Duration::from_secs(3),
            join_settle: Duration::from_secs(4),
        }
    }

    pub fn with_gas(mut self, gas: GasSettings) -> Self {
        self.gas = gas;
        self
    }

    pub fn with_funding_amount(mut self, amount: U256) -> Self {
        self.funding_amount = amount;
        self
    }

    pub fn with_wallet_count(mut self, count: usize) -> Self {
        self.wallet_count = count;
        self
    }

    pub fn with_settle_delays(mut self, funding: Duration, join: Duration) -> Self {
        self.funding_settle = funding;
        self.join_settle = join;
        self
    }
}
