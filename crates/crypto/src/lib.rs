//! Mnemonic-derived Ethereum keys sealed in passphrase-protected files
//!
//! This crate provides:
//! - BIP-39 mnemonic generation and validation, BIP-32/44 derivation of
//!   secp256k1 keys along `m/44'/60'/0'/0/0`
//! - Zeroizing containers for raw key material
//! - scrypt + AES-CTR + Keccak-256 MAC keystore containers with named
//!   cost profiles
//! - Atomic persistence of containers into a keystore directory

pub mod error;
pub mod keystore;
pub mod mnemonic;
pub mod provider;
pub mod secp256k1;
pub mod secure;

// Secp256k1 exports
pub use secp256k1::{Secp256k1PublicKey, Secp256k1SecretKey};

// Error exports
pub use error::{CryptoError, CryptoResult};

// Secure memory exports
pub use secure::{
    constant_time_eq, DerivationInfo, EntropyError, RawKeyMaterial, SecretBytes, SecretString,
};

// Keystore exports
pub use keystore::{
    CipherId, CostProfile, EncryptedContainer, FormatError, KeystoreDir, OpenError, SealError,
};

// Mnemonic exports
pub use mnemonic::{
    derive_secp256k1_key, DerivationConfig, Mnemonic, MnemonicError,
    DEFAULT_DERIVATION_PATH_SECP256K1,
};

// Provider exports
pub use provider::{GeneratedKey, KeyMaterialProvider};

/// Re-exported so callers can name the address type without a direct dependency
pub use alloy_primitives::Address;
