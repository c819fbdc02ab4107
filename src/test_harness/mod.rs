//! Anvil-based test harness for the join scenario.
//!
//! Spawns a local node, exposes its pre-funded accounts as faucet
//! candidates, and deploys a stub matchmaker contract so the end-to-end
//! scenario has something to call. The stub's runtime returns 64 zeroed
//! bytes for every call, which ABI-decodes as `(index=0, pending=false)` —
//! the exact shape the scenario asserts — and accepts join calls as no-ops.


use alloy::{
    node_bindings::{Anvil, AnvilInstance},
    primitives::{Address, Bytes},
    signers::local::PrivateKeySigner,
};
use anyhow::{anyhow, Result};

use crate::chain::ChainClient;
use crate::config::{FunderAccount, GasSettings, HarnessConfig};
use crate::confirm::{ReceiptPoll, WaitStrategy};
use crate::tx::TxBuilder;

/// Local-node fixture for harness tests.
pub struct LocalNodeHarness {
    /// The Anvil instance (kept alive for the fixture's lifetime)
    _instance: AnvilInstance,
    endpoint: String,
    chain: ChainClient,
    keys: Vec<PrivateKeySigner>,
    chain_id: u64,
}

impl LocalNodeHarness {
    /// Spawn a fresh node and connect to it.
    pub async fn new() -> Result<Self> {
        let instance = Anvil::new().try_spawn()?;
        let endpoint = instance.endpoint();
        let chain = ChainClient::connect_http(&endpoint)?;
        let keys: Vec<PrivateKeySigner> =
            instance.keys().iter().map(|k| k.clone().into()).collect();
        let chain_id = instance.chain_id();

        Ok(Self {
            _instance: instance,
            endpoint,
            chain,
            keys,
            chain_id,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn chain(&self) -> &ChainClient {
        &self.chain
    }

    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    /// The node's first pre-funded account, used as the faucet.
    pub fn funder(&self) -> FunderAccount {
        FunderAccount::new(self.keys[0].clone())
    }

    /// Gas settings that match the scenario economics: the funding amount
    /// must cover a join's full upfront cost (`gas_limit * gas_price`).
    pub fn gas(&self) -> GasSettings {
        GasSettings::default()
    }

    /// A scenario config pointed at this node.
    pub fn config(&self) -> HarnessConfig {
        HarnessConfig::new(self.endpoint.clone(), self.chain_id, self.funder())
            .with_gas(self.gas())
    }

    /// A receipt-polling wait strategy tuned for an auto-mining node.
    pub fn fast_wait(&self) -> ReceiptPoll {
        ReceiptPoll::new(std::time::Duration::from_secs(10)).with_base_backoff(50)
    }

    /// Deploy the stub matchmaker from the funder account.
    ///
    /// Init code (12 bytes) copies the runtime to memory and returns it:
    ///   PUSH1 0x05  (runtime size)
    ///   PUSH1 0x0c  (runtime offset in code)
    ///   PUSH1 0x00  (memory destination)
    ///   CODECOPY
    ///   PUSH1 0x05  (runtime size)
    ///   PUSH1 0x00  (memory offset)
    ///   RETURN
    /// Runtime code (5 bytes) returns 64 zeroed memory bytes for any call:
    ///   PUSH1 0x40 PUSH1 0x00 RETURN
    pub async fn deploy_stub_matchmaker(&self) -> Result<Address> {
        let init_code = Bytes::from(vec![
            0x60, 0x05, // PUSH1 5
            0x60, 0x0c, // PUSH1 12
            0x60, 0x00, // PUSH1 0
            0x39, // CODECOPY
            0x60, 0x05, // PUSH1 5
            0x60, 0x00, // PUSH1 0
            0xf3, // RETURN
            // Runtime code starts here (offset 12)
            0x60, 0x40, // PUSH1 64
            0x60, 0x00, // PUSH1 0
            0xf3, // RETURN
        ]);

        let funder = self.funder();
        let nonce = self.chain.get_nonce(funder.address()).await?;
        let builder = TxBuilder::new(self.chain_id, self.gas());
        let signed = builder.sign(builder.build_deploy(nonce, init_code), funder.signer())?;

        let tx_hash = self.chain.submit_raw(&signed.raw).await?;
        self.fast_wait().await_inclusion(&self.chain, tx_hash).await?;

        let receipt = self
            .chain
            .receipt(tx_hash)
            .await?
            .ok_or_else(|| anyhow!("deploy receipt vanished after inclusion"))?;
        receipt
            .contract_address
            .ok_or_else(|| anyhow!("stub deployment produced no contract address"))
    }
}

/// Install a test-visible tracing subscriber. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "matchmaker_harness=debug".into()),
        )
        .with_test_writer()
        .try_init();
}
