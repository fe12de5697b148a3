//! Secure memory handling for cryptographic material
//!
//! This module provides memory-safe containers for private key material with:
//! - Automatic zeroing on drop via `zeroize`
//! - Debug output masking to prevent log exposure
//! - Prevention of accidental cloning
//!
//! It also owns the single entry point to the operating system's random
//! source, so every consumer of randomness sees the same fallible contract.
//!
//! # Example
//!
//! ```rust,ignore
//! use safekeystore_crypto::secure::RawKeyMaterial;
//!
//! let material = RawKeyMaterial::from_bytes(private_key_bytes)?;
//! // Use the material...
//! drop(material); // Memory is automatically zeroed
//! ```

mod entropy;
mod material;

pub use entropy::{fill_random, random_bytes, EntropyError};
pub use material::{DerivationInfo, RawKeyMaterial, PRIVATE_KEY_SIZE};
pub use secrecy::SecretString;

/// Heap byte buffer zeroized on drop (scrypt output, decrypted plaintext)
pub type SecretBytes = secrecy::SecretBox<Vec<u8>>;

/// Constant-time comparison to prevent timing attacks
///
/// Runs in time dependent only on the lengths of the inputs.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    // Keep the optimizer from turning the fold into an early exit.
    std::hint::black_box(result) == 0
}
