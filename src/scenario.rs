//! End-to-end scenario orchestration.
//!
//! Provisions wallets, funds them, submits one join call per wallet, and
//! asserts on the contract's answer. Each wallet advances through
//! `Unfunded → Funded → Joined`; a wallet only advances after the
//! corresponding wait completes. Submissions are strictly sequential —
//! per-account nonce ordering on the chain is the only serialization
//! mechanism in play, and the harness never races it.

use std::sync::Arc;

use alloy::primitives::{Address, B256};
use tracing::info;

use crate::chain::ChainClient;
use crate::config::HarnessConfig;
use crate::confirm::{FixedDelay, WaitStrategy};
use crate::contract::{MatchmakerClient, PendingGame};
use crate::error::{HarnessError, HarnessResult};
use crate::faucet::Faucet;
use crate::keys::KeyManager;
use crate::nonce::NonceSequencer;
use crate::tx::TxBuilder;

// ============================================================================
// Wallet state machine
// ============================================================================

/// Lifecycle of one wallet within a scenario run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletPhase {
    Unfunded,
    Funded,
    Joined,
}

/// Per-wallet outcome, reported whether or not the final assertion holds.
#[derive(Debug, Clone)]
pub struct WalletRecord {
    pub main: Address,
    pub operational: Address,
    pub phase: WalletPhase,
    pub funding_tx: Option<B256>,
    pub join_tx: Option<B256>,
}

/// Everything a completed run observed.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub wallets: Vec<WalletRecord>,
    pub game: PendingGame,
}

// ============================================================================
// ScenarioRunner
// ============================================================================

/// Drives the join scenario against a deployed matchmaker contract.
pub struct ScenarioRunner {
    config: HarnessConfig,
    chain: ChainClient,
    contract: MatchmakerClient,
    faucet: Faucet,
    sequencer: NonceSequencer,
    funding_wait: Arc<dyn WaitStrategy>,
    join_wait: Arc<dyn WaitStrategy>,
    expected: PendingGame,
}

impl ScenarioRunner {
    /// Build a runner using one wait strategy for both settle points.
    pub fn new(
        config: HarnessConfig,
        chain: ChainClient,
        contract_address: Address,
        wait: Arc<dyn WaitStrategy>,
    ) -> Self {
        let contract = MatchmakerClient::new(contract_address, &chain);
        let faucet = Faucet::new(chain.clone(), config.chain_id, config.gas);
        Self {
            config,
            chain,
            contract,
            faucet,
            sequencer: NonceSequencer::new(),
            funding_wait: wait.clone(),
            join_wait: wait,
            expected: PendingGame::default(),
        }
    }

    /// Build a runner on the fixed-delay strategy, using the configured
    /// settle delays (one sleep after the funding batch, one per join).
    pub fn with_fixed_delays(
        config: HarnessConfig,
        chain: ChainClient,
        contract_address: Address,
    ) -> Self {
        let funding = Arc::new(FixedDelay::new(config.funding_settle));
        let join = Arc::new(FixedDelay::new(config.join_settle));
        let mut runner = Self::new(config, chain, contract_address, funding);
        runner.join_wait = join;
        runner
    }

    /// Override the expected accessor result (default: empty slot,
    /// `(index=0, pending=false)`).
    pub fn with_expected(mut self, expected: PendingGame) -> Self {
        self.expected = expected;
        self
    }

    /// Run the full scenario: provision, fund, join, read back, assert.
    pub async fn run(&self) -> HarnessResult<ScenarioReport> {
        let wallets = KeyManager.generate(self.config.wallet_count);
        let mut records: Vec<WalletRecord> = wallets
            .iter()
            .map(|w| WalletRecord {
                main: w.main_address(),
                operational: w.operational_address(),
                phase: WalletPhase::Unfunded,
                funding_tx: None,
                join_tx: None,
            })
            .collect();

        let funder = self.config.funder.clone();
        info!(
            funder = %funder.address(),
            wallets = wallets.len(),
            "starting join scenario"
        );

        // Funding: one transfer per main account, nonces start + i. The
        // sequencer's queued count must mirror what goes in flight until
        // the settle below.
        let start_nonce = self.sequencer.sync(&self.chain, funder.address()).await?;
        let targets: Vec<Address> = wallets.iter().map(|w| w.main_address()).collect();
        for _ in &targets {
            self.sequencer.next(funder.address());
        }

        let batch = self
            .faucet
            .fund(&funder, &targets, self.config.funding_amount, start_nonce)
            .await?;

        let funding_hashes: Vec<B256> = batch.iter().map(|f| f.tx_hash()).collect();
        self.funding_wait
            .settle_batch(&self.chain, &funding_hashes)
            .await?;
        self.sequencer.settle(funder.address());

        for (record, funding) in records.iter_mut().zip(&batch) {
            record.phase = WalletPhase::Funded;
            record.funding_tx = Some(funding.tx_hash());
        }
        info!(count = batch.len(), "wallets funded");

        // Joins: each wallet signs its own call from a fresh account, so
        // the sequencer hands out nonce 0 per wallet.
        let builder = TxBuilder::new(self.config.chain_id, self.config.gas);
        for (wallet, record) in wallets.iter().zip(records.iter_mut()) {
            let nonce = self.sequencer.next(wallet.main_address());
            let calldata = MatchmakerClient::join_game_calldata(
                wallet.main_address(),
                wallet.operational_address(),
            );
            let tx = builder.build_call(nonce, self.contract.address(), calldata);
            let signed = builder.sign(tx, wallet.main())?;

            let tx_hash = self.chain.submit_raw(&signed.raw).await?;
            self.join_wait.await_inclusion(&self.chain, tx_hash).await?;
            self.sequencer.settle(wallet.main_address());

            record.phase = WalletPhase::Joined;
            record.join_tx = Some(tx_hash);
            info!(main = %record.main, %tx_hash, "wallet joined");
        }

        // Read back through the funder's address and assert the shape.
        let game = self.contract.first_pending_game(funder.address()).await?;
        if game != self.expected {
            return Err(HarnessError::Assertion {
                expected: self.expected.to_string(),
                actual: game.to_string(),
            });
        }

        info!(%game, "scenario assertion held");
        Ok(ScenarioReport {
            wallets: records,
            game,
        })
    }
}
