//! Confirmation waiting.
//!
//! The harness has no push notification for block inclusion, so after every
//! submission it waits. The strategy is pluggable:
//!
//! - [`ReceiptPoll`] polls for a receipt with a bounded timeout and
//!   exponential backoff. This is the strategy to use.
//! - [`FixedDelay`] sleeps a fixed duration and presumes inclusion, for
//!   parity with the behavior this harness replaces. Under congestion the
//!   presumption fails and the failure only shows up later as a stale-state
//!   assertion, indistinguishable from a logic bug.
//! - [`NoWait`] is a deterministic stand-in for tests.

use std::time::Duration;

use alloy::primitives::B256;
use async_trait::async_trait;
use tokio::time::{sleep, Instant};
use tracing::{debug, trace, warn};

use crate::chain::ChainClient;
use crate::error::{backoff_duration, HarnessError, HarnessResult};

// ============================================================================
// WaitStrategy
// ============================================================================

/// How the harness waits for a submitted transaction to be included.
#[async_trait]
pub trait WaitStrategy: Send + Sync {
    /// Wait until `tx_hash` is presumed (or observed) included.
    async fn await_inclusion(&self, chain: &ChainClient, tx_hash: B256) -> HarnessResult<()>;

    /// Wait for a whole batch. Defaults to waiting on each hash in order.
    async fn settle_batch(&self, chain: &ChainClient, hashes: &[B256]) -> HarnessResult<()> {
        for tx_hash in hashes {
            self.await_inclusion(chain, *tx_hash).await?;
        }
        Ok(())
    }
}

// ============================================================================
// ReceiptPoll
// ============================================================================

/// Poll for a receipt until it appears or the bound expires.
#[derive(Debug, Clone, Copy)]
pub struct ReceiptPoll {
    /// Give up after this much wall time
    pub timeout: Duration,
    /// Base delay for exponential backoff between polls
    pub base_backoff_ms: u64,
}

impl Default for ReceiptPoll {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            base_backoff_ms: 250,
        }
    }
}

impl ReceiptPoll {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    pub fn with_base_backoff(mut self, base_ms: u64) -> Self {
        self.base_backoff_ms = base_ms;
        self
    }
}

#[async_trait]
impl WaitStrategy for ReceiptPoll {
    async fn await_inclusion(&self, chain: &ChainClient, tx_hash: B256) -> HarnessResult<()> {
        let started = Instant::now();
        let mut attempt = 0u32;

        loop {
            if chain.receipt(tx_hash).await?.is_some() {
                debug!(%tx_hash, attempt, elapsed = ?started.elapsed(), "receipt observed");
                return Ok(());
            }

            let waited = started.elapsed();
            if waited >= self.timeout {
                warn!(%tx_hash, ?waited, "gave up waiting for receipt");
                return Err(HarnessError::Timing { tx_hash, waited });
            }

            let backoff = backoff_duration(attempt, self.base_backoff_ms);
            trace!(%tx_hash, attempt, ?backoff, "no receipt yet, backing off");
            sleep(backoff.min(self.timeout.saturating_sub(waited))).await;
            attempt += 1;
        }
    }
}

// ============================================================================
// FixedDelay
// ============================================================================

/// Sleep a fixed duration and presume inclusion.
#[derive(Debug, Clone, Copy)]
pub struct FixedDelay {
    pub delay: Duration,
}

impl FixedDelay {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl WaitStrategy for FixedDelay {
    async fn await_inclusion(&self, _chain: &ChainClient, tx_hash: B256) -> HarnessResult<()> {
        trace!(%tx_hash, delay = ?self.delay, "fixed delay in lieu of confirmation");
        sleep(self.delay).await;
        Ok(())
    }

    /// One sleep covers the whole batch; inclusion of the individual
    /// transfers is presumed together.
    async fn settle_batch(&self, _chain: &ChainClient, _hashes: &[B256]) -> HarnessResult<()> {
        sleep(self.delay).await;
        Ok(())
    }
}

// ============================================================================
// NoWait
// ============================================================================

/// Return immediately. For tests that control mining themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoWait;

#[async_trait]
impl WaitStrategy for NoWait {
    async fn await_inclusion(&self, _chain: &ChainClient, _tx_hash: B256) -> HarnessResult<()> {
        Ok(())
    }
}
