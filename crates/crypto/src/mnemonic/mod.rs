//! Mnemonic-based key generation and recovery
//!
//! This module provides BIP-39 mnemonic phrase generation and BIP-32
//! hierarchical deterministic (HD) key derivation of Ethereum account keys.
//!
//! # Derivation Path
//!
//! ```text
//! m / 44' / 60' / account' / 0 / 0
//! ```
//!
//! Where:
//! - `44'` = BIP-44 purpose
//! - `60'` = Ethereum coin type (SLIP-0044)
//! - `account'` = Account index (0, 1, 2, ...)
//!
//! # Example
//!
//! ```rust
//! use safekeystore_crypto::mnemonic::{derive_secp256k1_key, DerivationConfig, Mnemonic};
//!
//! let mnemonic = Mnemonic::generate().unwrap();
//! let key = derive_secp256k1_key(&mnemonic, &DerivationConfig::new(0)).unwrap();
//! println!("Address: {}", key.identifier());
//! ```

mod derive;
mod error;
mod generate;

pub use derive::{
    derive_from_seed, derive_secp256k1_key, ChildIndex, DerivationConfig, DerivationPath,
    DEFAULT_DERIVATION_PATH_SECP256K1, ETHEREUM_COIN_TYPE, HARDENED_OFFSET,
};
pub use error::{MnemonicError, MnemonicResult};
pub use generate::{Mnemonic, DEFAULT_WORD_COUNT};
