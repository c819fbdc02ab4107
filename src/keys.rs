//! Ephemeral test-wallet generation.
//!
//! Each simulated player gets a [`PlayerWallet`]: a `main` account that is
//! funded and signs transactions, and an `operational` account that is only
//! ever passed as a data argument to the contract. Keys exist for the
//! lifetime of the process and are never persisted.

use alloy::{primitives::Address, signers::local::PrivateKeySigner};

// ============================================================================
// PlayerWallet
// ============================================================================

/// One simulated player: a funded signing identity plus a secondary identity.
///
/// Invariant: `operational` is never funded and never signs anything; it is
/// contract-call payload only.
#[derive(Debug, Clone)]
pub struct PlayerWallet {
    main: PrivateKeySigner,
    operational: PrivateKeySigner,
}

impl PlayerWallet {
    /// Generate a wallet from two fresh, independent keys.
    ///
    /// Key generation draws from the OS entropy source; exhaustion is
    /// unrecoverable and panics inside the signer constructor.
    pub fn generate() -> Self {
        Self {
            main: PrivateKeySigner::random(),
            operational: PrivateKeySigner::random(),
        }
    }

    pub fn main(&self) -> &PrivateKeySigner {
        &self.main
    }

    pub fn main_address(&self) -> Address {
        self.main.address()
    }

    pub fn operational_address(&self) -> Address {
        self.operational.address()
    }
}

// ============================================================================
// KeyManager
// ============================================================================

/// Generates batches of ephemeral player wallets.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyManager;

impl KeyManager {
    /// Produce `count` wallets, each with two freshly generated accounts.
    pub fn generate(&self, count: usize) -> Vec<PlayerWallet> {
        (0..count).map(|_| PlayerWallet::generate()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_main_and_operational_are_independent() {
        let wallet = PlayerWallet::generate();
        assert_ne!(wallet.main_address(), wallet.operational_address());
    }

    #[test]
    fn test_generated_addresses_are_pairwise_distinct() {
        let wallets = KeyManager.generate(16);
        assert_eq!(wallets.len(), 16);

        let mut seen = HashSet::new();
        for wallet in &wallets {
            assert!(seen.insert(wallet.main_address()));
            assert!(seen.insert(wallet.operational_address()));
        }
    }

    #[test]
    fn test_generate_twice_yields_disjoint_sets() {
        let first: HashSet<Address> = KeyManager
            .generate(8)
            .iter()
            .map(|w| w.main_address())
            .collect();
        let second: HashSet<Address> = KeyManager
            .generate(8)
            .iter()
            .map(|w| w.main_address())
            .collect();

        assert!(first.is_disjoint(&second));
    }

    #[test]
    fn test_generate_zero() {
        assert!(KeyManager.generate(0).is_empty());
    }
}
