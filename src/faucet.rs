//! Faucet: seeds ephemeral accounts from the funder.
//!
//! Builds one transfer per target, nonces strictly `start_nonce + index`
//! with no gaps or reuse, and submits them in index order so the node sees
//! the funder's sequence contiguously. Balance is never pre-validated: an
//! underfunded faucet surfaces as a node-side rejection or a missing
//! receipt, exactly where the chain detects it.

use alloy::primitives::{Address, B256, U256};
use tracing::info;

use crate::chain::ChainClient;
use crate::config::{FunderAccount, GasSettings};
use crate::error::HarnessResult;
use crate::tx::{SignedTx, TxBuilder};

/// One signed funding transfer, immutable once produced.
#[derive(Debug, Clone)]
pub struct FundingTx {
    pub target: Address,
    pub nonce: u64,
    pub signed: SignedTx,
}

impl FundingTx {
    pub fn tx_hash(&self) -> B256 {
        self.signed.tx_hash
    }
}

/// Transfers starting balance from the funder to generated accounts.
#[derive(Clone)]
pub struct Faucet {
    chain: ChainClient,
    builder: TxBuilder,
}

impl Faucet {
    pub fn new(chain: ChainClient, chain_id: u64, gas: GasSettings) -> Self {
        Self {
            chain,
            builder: TxBuilder::new(chain_id, gas),
        }
    }

    /// Build and sign the whole batch without touching the network.
    ///
    /// The transfer at index `i` gets nonce `start_nonce + i`. Targets that
    /// do not exist on chain yet are fine: the first funded transfer creates
    /// the account.
    pub fn sign_batch(
        &self,
        funder: &FunderAccount,
        targets: &[Address],
        amount: U256,
        start_nonce: u64,
    ) -> HarnessResult<Vec<FundingTx>> {
        targets
            .iter()
            .enumerate()
            .map(|(index, &target)| {
                let nonce = start_nonce + index as u64;
                let tx = self.builder.build_transfer(nonce, target, amount);
                let signed = self.builder.sign(tx, funder.signer())?;
                Ok(FundingTx {
                    target,
                    nonce,
                    signed,
                })
            })
            .collect()
    }

    /// Sign and submit the batch in index order.
    ///
    /// Submission stops at the first rejection; transfers already accepted
    /// stay in flight (the harness has no way to retract them).
    pub async fn fund(
        &self,
        funder: &FunderAccount,
        targets: &[Address],
        amount: U256,
        start_nonce: u64,
    ) -> HarnessResult<Vec<FundingTx>> {
        let batch = self.sign_batch(funder, targets, amount, start_nonce)?;
        for funding in &batch {
            self.chain.submit_raw(&funding.signed.raw).await?;
            info!(
                target = %funding.target,
                nonce = funding.nonce,
                tx_hash = %funding.tx_hash(),
                "funding transfer submitted"
            );
        }
        Ok(batch)
    }
}
