//! Thin client over a remote chain endpoint.
//!
//! [`ChainClient`] wraps an alloy [`RootProvider`] and exposes exactly what
//! the harness needs: confirmed transaction counts, balances, raw
//! transaction submission, and receipt lookup. All transaction construction
//! and signing happens elsewhere; nothing here allocates nonces or holds
//! keys.
//!
//! The target node speaks a subscription-capable WebSocket endpoint, so
//! `connect` accepts `ws://`/`wss://` URLs; plain HTTP is supported for
//! local nodes in tests.

use alloy::{
    network::Ethereum,
    primitives::{Address, B256, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionReceipt,
    transports::ws::WsConnect,
};
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};

/// Read/submit access to a remote chain node.
#[derive(Clone)]
pub struct ChainClient {
    provider: RootProvider<Ethereum>,
}

impl ChainClient {
    /// Connect to a node, picking the transport from the URL scheme.
    pub async fn connect(rpc_url: &str) -> HarnessResult<Self> {
        if rpc_url.starts_with("ws") {
            Self::connect_ws(rpc_url).await
        } else {
            Self::connect_http(rpc_url)
        }
    }

    /// Connect over WebSocket.
    pub async fn connect_ws(rpc_url: &str) -> HarnessResult<Self> {
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_ws(WsConnect::new(rpc_url))
            .await
            .map_err(|e| HarnessError::Transport(format!("ws connect {rpc_url}: {e}")))?;
        Ok(Self {
            provider: provider.root().clone(),
        })
    }

    /// Connect over HTTP.
    pub fn connect_http(rpc_url: &str) -> HarnessResult<Self> {
        let url = rpc_url
            .parse()
            .map_err(|e| HarnessError::Transport(format!("bad rpc url {rpc_url}: {e}")))?;
        let provider = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_http(url);
        Ok(Self {
            provider: provider.root().clone(),
        })
    }

    /// Wrap an existing provider (used by the test harness).
    pub fn from_provider(provider: RootProvider<Ethereum>) -> Self {
        Self { provider }
    }

    /// The underlying provider, for typed contract bindings.
    pub fn provider(&self) -> &RootProvider<Ethereum> {
        &self.provider
    }

    /// Confirmed transaction count for `address`.
    ///
    /// Stale the instant an unconfirmed transaction from that address
    /// exists; see [`crate::nonce::NonceSequencer`].
    pub async fn get_nonce(&self, address: Address) -> HarnessResult<u64> {
        self.provider
            .get_transaction_count(address)
            .await
            .map_err(|e| HarnessError::Transport(e.to_string()))
    }

    /// Current balance of `address` in wei.
    pub async fn get_balance(&self, address: Address) -> HarnessResult<U256> {
        self.provider
            .get_balance(address)
            .await
            .map_err(|e| HarnessError::Transport(e.to_string()))
    }

    /// The node's reported chain id.
    pub async fn fetch_chain_id(&self) -> HarnessResult<u64> {
        self.provider
            .get_chain_id()
            .await
            .map_err(|e| HarnessError::Transport(e.to_string()))
    }

    /// Submit a signed raw transaction.
    ///
    /// Node rejections (bad nonce, insufficient funds, malformed payload)
    /// come back as [`HarnessError::Submission`] with a classified kind.
    pub async fn submit_raw(&self, raw: &[u8]) -> HarnessResult<B256> {
        let pending = self
            .provider
            .send_raw_transaction(raw)
            .await
            .map_err(|e| HarnessError::from_rpc(&e))?;
        let tx_hash = *pending.tx_hash();
        debug!(%tx_hash, "submitted raw transaction");
        Ok(tx_hash)
    }

    /// Look up the receipt for a transaction, if it has been included.
    pub async fn receipt(&self, tx_hash: B256) -> HarnessResult<Option<TransactionReceipt>> {
        self.provider
            .get_transaction_receipt(tx_hash)
            .await
            .map_err(|e| HarnessError::Transport(e.to_string()))
    }
}
