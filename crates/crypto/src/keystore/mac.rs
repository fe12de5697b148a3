//! Keccak-256 MAC for keystore integrity verification
//!
//! The MAC is computed over: mac_key || ciphertext, where mac_key is the
//! second half of the derived key. A match proves both that the passphrase
//! was right AND that the ciphertext hasn't been tampered with.

use alloy_primitives::Keccak256;

use crate::secure::constant_time_eq;

/// MAC length in bytes
pub const MAC_LENGTH: usize = 32;

/// Compute keccak256(mac_key || ciphertext)
pub fn compute_mac(mac_key: &[u8], ciphertext: &[u8]) -> [u8; MAC_LENGTH] {
    let mut hasher = Keccak256::new();
    hasher.update(mac_key);
    hasher.update(ciphertext);
    hasher.finalize().0
}

/// Verify a stored MAC in constant time
pub fn verify_mac(mac_key: &[u8], ciphertext: &[u8], expected: &[u8]) -> bool {
    let computed = compute_mac(mac_key, ciphertext);
    constant_time_eq(&computed, expected)
}
