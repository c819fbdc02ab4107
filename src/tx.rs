//! Pure transaction construction and signing.
//!
//! The target network prices transactions with a flat gas price, so every
//! harness transaction is a legacy [`TxLegacy`]. Construction takes explicit
//! nonce, chain id, and gas parameters; signing is RFC 6979 deterministic
//! ECDSA through the alloy local signer. Nothing in this module performs
//! network I/O: the same inputs always produce the same raw bytes.

use alloy::{
    consensus::{SignableTransaction, TxEnvelope, TxLegacy},
    eips::eip2718::Encodable2718,
    network::TxSignerSync,
    primitives::{Address, Bytes, TxKind, B256, U256},
    signers::local::PrivateKeySigner,
};

use crate::config::GasSettings;
use crate::error::{HarnessError, HarnessResult, SubmissionErrorKind};

// ============================================================================
// SignedTx
// ============================================================================

/// An immutable signed transaction, ready for submission.
#[derive(Debug, Clone)]
pub struct SignedTx {
    /// Hash the chain will report for this transaction
    pub tx_hash: B256,
    /// EIP-2718 encoded bytes for `eth_sendRawTransaction`
    pub raw: Vec<u8>,
}

// ============================================================================
// TxBuilder
// ============================================================================

/// Stateless builder for the harness's legacy transactions.
#[derive(Debug, Clone, Copy)]
pub struct TxBuilder {
    chain_id: u64,
    gas: GasSettings,
}

impl TxBuilder {
    pub fn new(chain_id: u64, gas: GasSettings) -> Self {
        Self { chain_id, gas }
    }

    /// A plain value transfer.
    pub fn build_transfer(&self, nonce: u64, to: Address, value: U256) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price: self.gas.gas_price,
            gas_limit: self.gas.gas_limit,
            to: TxKind::Call(to),
            value,
            input: Bytes::new(),
        }
    }

    /// A zero-value contract call with the given calldata.
    pub fn build_call(&self, nonce: u64, contract: Address, input: Bytes) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price: self.gas.gas_price,
            gas_limit: self.gas.gas_limit,
            to: TxKind::Call(contract),
            value: U256::ZERO,
            input,
        }
    }

    /// A contract-creation transaction carrying `init_code`.
    pub fn build_deploy(&self, nonce: u64, init_code: Bytes) -> TxLegacy {
        TxLegacy {
            chain_id: Some(self.chain_id),
            nonce,
            gas_price: self.gas.gas_price,
            gas_limit: self.gas.gas_limit,
            to: TxKind::Create,
            value: U256::ZERO,
            input: init_code,
        }
    }

    /// Sign a transaction and encode it for raw submission.
    ///
    /// Deterministic: the same `(tx, key)` pair always yields the same bytes
    /// and hash.
    pub fn sign(&self, mut tx: TxLegacy, signer: &PrivateKeySigner) -> HarnessResult<SignedTx> {
        let signature = signer
            .sign_transaction_sync(&mut tx)
            .map_err(|e| HarnessError::Submission {
                kind: SubmissionErrorKind::Malformed,
                message: format!("signing failed: {e}"),
            })?;
        let signed = tx.into_signed(signature);
        let tx_hash = *signed.hash();
        let envelope = TxEnvelope::Legacy(signed);
        Ok(SignedTx {
            tx_hash,
            raw: envelope.encoded_2718(),
        })
    }
}
