//! Typed surface of the deployed matchmaking contract.
//!
//! The harness consumes exactly two methods: the state-mutating
//! `joinGame(main, operational)` and the read-only
//! `getFirstPendingGame(player)`. The read result is modelled as the named
//! [`PendingGame`] record rather than a positional pair.
//!
//! Join calls are not sent through the generated RPC bindings: each wallet
//! signs its own raw transaction, so this module only contributes the
//! calldata. The read-only accessor does go through the bindings, since an
//! `eth_call` needs no signature or nonce.

use std::fmt;

use alloy::{
    network::Ethereum,
    primitives::{Address, Bytes, U256},
    providers::RootProvider,
    sol,
    sol_types::SolCall,
};

use crate::chain::ChainClient;
use crate::error::{HarnessError, HarnessResult};

sol! {
    #[sol(rpc)]
    contract Matchmaker {
        function joinGame(address main, address operational) external;
        function getFirstPendingGame(address player) external view returns (uint256 index, bool pending);
    }
}

// ============================================================================
// PendingGame
// ============================================================================

/// Result of `getFirstPendingGame`: the slot index and whether a game is
/// pending for the queried address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PendingGame {
    pub index: U256,
    pub pending: bool,
}

impl fmt::Display for PendingGame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(index={}, pending={})", self.index, self.pending)
    }
}

// ============================================================================
// MatchmakerClient
// ============================================================================

/// Handle to one deployed matchmaker contract.
#[derive(Clone)]
pub struct MatchmakerClient {
    instance: Matchmaker::MatchmakerInstance<RootProvider<Ethereum>>,
}

impl MatchmakerClient {
    pub fn new(address: Address, chain: &ChainClient) -> Self {
        Self {
            instance: Matchmaker::new(address, chain.provider().clone()),
        }
    }

    pub fn address(&self) -> Address {
        *self.instance.address()
    }

    /// ABI-encoded calldata for `joinGame(main, operational)`.
    ///
    /// Pure; the caller signs and submits this from the wallet's main
    /// account.
    pub fn join_game_calldata(main: Address, operational: Address) -> Bytes {
        Matchmaker::joinGameCall { main, operational }
            .abi_encode()
            .into()
    }

    /// Read-only accessor: the first pending game recorded for `player`.
    ///
    /// Returns immediately; never mutates chain state.
    pub async fn first_pending_game(&self, player: Address) -> HarnessResult<PendingGame> {
        let ret = self
            .instance
            .getFirstPendingGame(player)
            .call()
            .await
            .map_err(|e| HarnessError::from_rpc(&e))?;
        Ok(PendingGame {
            index: ret.index,
            pending: ret.pending,
        })
    }
}
