//! # matchmaker-harness
//!
//! Integration-test harness for a blockchain-based matchmaking contract.
//!
//! The contract is deployed by an external migration tool; this crate
//! provisions ephemeral test wallets, funds them from a faucet account with
//! strictly sequential nonces, submits signed join transactions, and asserts
//! on the contract's observable state afterward.
//!
//! ## Core Components
//!
//! - **KeyManager**: ephemeral main/operational key pairs per player
//! - **Faucet**: batch funding with gap-free nonce assignment
//! - **ChainClient**: nonce/balance reads, raw submission, receipts
//! - **TxBuilder**: pure, deterministic legacy-transaction construction
//! - **WaitStrategy**: pluggable confirmation waiting (receipt polling with
//!   bounded timeout, or fixed-delay parity mode)
//! - **ScenarioRunner**: the end-to-end join scenario
//!
//! ## Usage
//!
//! ```ignore
//! use matchmaker_harness::*;
//!
//! MigrationCommand::new("testnet").run().await?;
//! let artifacts = DeploymentArtifacts::load(info_path, abi_path)?;
//!
//! let funder = FunderAccount::from_hex_key(key)?;
//! let config = HarnessConfig::new("wss://ws.example.org/", 1666700000, funder);
//! let chain = ChainClient::connect(&config.rpc_url).await?;
//!
//! let report = ScenarioRunner::with_fixed_delays(config, chain, artifacts.address)
//!     .run()
//!     .await?;
//! ```

// ============================================================================
// Internal Module Declarations
// ============================================================================

/// Chain endpoint client: reads, raw submission, receipts
mod chain;

/// Session configuration structs (endpoint, funder, gas, scenario constants)
mod config;

/// Pluggable confirmation wait strategies
mod confirm;

/// Typed matchmaker contract surface and the PendingGame record
mod contract;

/// External migration invocation and deployment artifact loading
mod deploy;

/// Error taxonomy and node-rejection classification
mod error;

/// Faucet funding with sequential nonce assignment
mod faucet;

/// Ephemeral wallet generation
mod keys;

/// Per-account nonce sequencing
mod nonce;

/// End-to-end scenario orchestration
mod scenario;

/// Pure transaction construction and deterministic signing
mod tx;

/// Anvil-backed test harness (compiled only in test mode)
#[cfg(test)]
mod test_harness;

// ============================================================================
// Public Exports
// ============================================================================

pub use chain::ChainClient;
pub use config::{FunderAccount, GasSettings, HarnessConfig};
pub use confirm::{FixedDelay, NoWait, ReceiptPoll, WaitStrategy};
pub use contract::{MatchmakerClient, PendingGame};
pub use deploy::{DeploymentArtifacts, MigrationCommand};
pub use error::{
    backoff_duration, classify_submission_error, is_transport_error, HarnessError, HarnessResult,
    SubmissionErrorKind,
};
pub use faucet::{Faucet, FundingTx};
pub use keys::{KeyManager, PlayerWallet};
pub use nonce::{NonceSequencer, SequenceStatus};
pub use scenario::{ScenarioReport, ScenarioRunner, WalletPhase, WalletRecord};
pub use tx::{SignedTx, TxBuilder};
