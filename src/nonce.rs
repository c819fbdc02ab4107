//! Per-account nonce sequencing.
//!
//! A submitted-but-unconfirmed transaction makes the chain's reported
//! transaction count stale, so the harness cannot read the next nonce from
//! the node between submissions. [`NonceSequencer`] keeps the invariant
//! locally: the nonce assigned to a transaction equals the account's
//! confirmed transaction count plus the number of not-yet-confirmed
//! transactions already queued from that account in this run.
//!
//! The harness submits sequentially, so there is no contention; the map is
//! shared between components that sequence for the same account (faucet and
//! scenario runner both draw from the funder).

use std::sync::Arc;

use alloy::primitives::Address;
use dashmap::DashMap;
use tracing::trace;

use crate::chain::ChainClient;
use crate::error::HarnessResult;

/// Per-account sequence state
#[derive(Debug, Clone, Copy)]
struct AccountSequence {
    /// Confirmed on-chain transaction count at last sync
    base: u64,
    /// Transactions queued from this account since the sync
    queued: u64,
}

/// Snapshot of an account's sequence, for assertions and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceStatus {
    pub base: u64,
    pub queued: u64,
}

impl SequenceStatus {
    /// The nonce the next queued transaction would receive.
    pub fn next(&self) -> u64 {
        self.base + self.queued
    }
}

/// Tracks nonce assignment per sending account.
#[derive(Debug, Clone, Default)]
pub struct NonceSequencer {
    states: Arc<DashMap<Address, AccountSequence>>,
}

impl NonceSequencer {
    pub fn new() -> Self {
        Self {
            states: Arc::new(DashMap::new()),
        }
    }

    /// Fetch the confirmed transaction count from the chain and reset the
    /// queued counter. Must run while no transaction from `address` is in
    /// flight, otherwise the fetched count is already stale.
    pub async fn sync(&self, chain: &ChainClient, address: Address) -> HarnessResult<u64> {
        let base = chain.get_nonce(address).await?;
        self.states
            .insert(address, AccountSequence { base, queued: 0 });
        trace!(%address, base, "synced nonce from chain");
        Ok(base)
    }

    /// Seed an account's sequence without touching the chain.
    pub fn seed(&self, address: Address, base: u64) {
        self.states
            .insert(address, AccountSequence { base, queued: 0 });
    }

    /// Allocate the next nonce for `address`: confirmed count + queued count.
    ///
    /// The account must have been seeded or synced first; allocating for an
    /// unknown account starts from zero, which is correct only for freshly
    /// generated wallets.
    pub fn next(&self, address: Address) -> u64 {
        let mut entry = self
            .states
            .entry(address)
            .or_insert(AccountSequence { base: 0, queued: 0 });
        let nonce = entry.base + entry.queued;
        entry.queued += 1;
        trace!(%address, nonce, queued = entry.queued, "allocated nonce");
        nonce
    }

    /// Fold all queued transactions into the confirmed base.
    ///
    /// Called after a settle wait: the harness then presumes everything it
    /// queued has been included.
    pub fn settle(&self, address: Address) {
        if let Some(mut entry) = self.states.get_mut(&address) {
            entry.base += entry.queued;
            entry.queued = 0;
            trace!(%address, base = entry.base, "settled queued nonces");
        }
    }

    /// Current sequence snapshot, if the account is known.
    pub fn status(&self, address: Address) -> Option<SequenceStatus> {
        self.states.get(&address).map(|s| SequenceStatus {
            base: s.base,
            queued: s.queued,
        })
    }
}
