//! Secure container for a raw secp256k1 private key
//!
//! `RawKeyMaterial` holds the 32-byte big-endian scalar produced by the key
//! provider and consumed by the keystore codec. It ensures that:
//! - The scalar is zeroized when the struct is dropped
//! - Debug output doesn't expose the actual bytes
//! - The struct cannot be accidentally cloned

use alloy_primitives::Address;
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::constant_time_eq;
use crate::error::CryptoResult;
use crate::secp256k1::Secp256k1SecretKey;

/// Size of a secp256k1 private scalar in bytes
pub const PRIVATE_KEY_SIZE: usize = 32;

/// Memory-safe container for a raw private key.
///
/// This struct intentionally does NOT implement `Clone`. It is created by the
/// provider (or by opening a keystore), handed by reference to the sealing
/// code, and wiped when the owner drops it.
///
/// # Security
///
/// - Implements `Zeroize` and `ZeroizeOnDrop` for automatic memory clearing
/// - Custom `Debug` implementation masks the actual bytes
/// - Bytes are validated to be a usable secp256k1 scalar
///
/// # Example
///
/// ```rust
/// use safekeystore_crypto::secure::RawKeyMaterial;
///
/// let mut bytes = [0u8; 32];
/// bytes[31] = 1;
/// let material = RawKeyMaterial::from_bytes(bytes).unwrap();
/// assert_eq!(
///     material.identifier(),
///     "7e5f4552091a69125d5dfcb7b8c2659029395bdf"
/// );
/// ```
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct RawKeyMaterial {
    private_key: [u8; PRIVATE_KEY_SIZE],
    /// Derivation path (if derived from mnemonic)
    #[zeroize(skip)]
    derivation_info: Option<DerivationInfo>,
}

/// Derivation path information for keys generated from mnemonic
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivationInfo {
    /// Account index in derivation path
    pub account_index: u32,
    /// Full derivation path (e.g., "m/44'/60'/0'/0/0")
    pub path: String,
}

impl RawKeyMaterial {
    /// Wrap a big-endian private scalar.
    ///
    /// The input array is zeroized after it has been copied in.
    ///
    /// # Errors
    ///
    /// `CryptoError::InvalidSecretKey` if the scalar is zero or not below the
    /// curve order.
    pub fn from_bytes(mut bytes: [u8; PRIVATE_KEY_SIZE]) -> CryptoResult<Self> {
        let material = Self::from_scalar(&bytes);
        bytes.zeroize();
        material
    }

    /// Wrap a private scalar given as a slice (e.g. freshly decrypted bytes)
    pub fn from_slice(bytes: &[u8]) -> CryptoResult<Self> {
        let scalar: &[u8; PRIVATE_KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| crate::error::CryptoError::InvalidSecretKey)?;
        Self::from_scalar(scalar)
    }

    /// Copy a borrowed scalar in. The caller keeps ownership of (and wipes)
    /// its own buffer.
    pub(crate) fn from_scalar(bytes: &[u8; PRIVATE_KEY_SIZE]) -> CryptoResult<Self> {
        Secp256k1SecretKey::from_bytes(bytes)?;
        Ok(Self {
            private_key: *bytes,
            derivation_info: None,
        })
    }

    /// Parse a private key from hex, with or without a `0x` prefix
    pub fn from_hex(hex_str: &str) -> CryptoResult<Self> {
        let trimmed = hex_str.trim();
        let trimmed = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let mut decoded = hex::decode(trimmed)
            .map_err(|e| crate::error::CryptoError::HexError(e.to_string()))?;
        let material = Self::from_slice(&decoded);
        decoded.zeroize();
        material
    }

    /// Attach derivation info (used when the key comes from a mnemonic).
    pub fn with_derivation(mut self, derivation_info: DerivationInfo) -> Self {
        self.derivation_info = Some(derivation_info);
        self
    }

    /// Get a reference to the private scalar.
    ///
    /// # Security
    ///
    /// The returned reference should be used immediately and not stored.
    #[inline]
    pub fn private_key_bytes(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.private_key
    }

    /// Lowercase hex of the private scalar, without prefix.
    ///
    /// Only for backup display or test vectors; the caller owns the string.
    pub fn to_hex(&self) -> String {
        hex::encode(self.private_key)
    }

    /// Ethereum address of the key
    pub fn address(&self) -> CryptoResult<Address> {
        let secret = Secp256k1SecretKey::from_bytes(&self.private_key)?;
        Ok(secret.public_key().address())
    }

    /// The keystore identifier: lowercase hex address without `0x`.
    ///
    /// Construction already validated the scalar, so this cannot fail.
    pub fn identifier(&self) -> String {
        self.address()
            .map(hex::encode)
            .unwrap_or_default()
    }

    /// Get derivation information if available.
    pub fn derivation_info(&self) -> Option<&DerivationInfo> {
        self.derivation_info.as_ref()
    }

    /// Check if this material was derived from a mnemonic.
    pub fn is_derived(&self) -> bool {
        self.derivation_info.is_some()
    }
}

impl PartialEq for RawKeyMaterial {
    fn eq(&self, other: &Self) -> bool {
        constant_time_eq(&self.private_key, &other.private_key)
    }
}

impl Eq for RawKeyMaterial {}

// Custom Debug implementation to prevent exposing the scalar in logs
impl std::fmt::Debug for RawKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawKeyMaterial")
            .field("private_key", &"[REDACTED]")
            .field("derivation_info", &self.derivation_info)
            .finish()
    }
}
