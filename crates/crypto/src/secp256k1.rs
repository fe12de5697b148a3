//! secp256k1 keys as the keystore sees them
//!
//! Curve arithmetic is delegated to `k256`. The keystore only needs to check
//! that 32 bytes form a usable scalar and to map a key to its Ethereum
//! address: the last 20 bytes of keccak256 over the uncompressed public
//! point without its 0x04 tag.

use crate::error::CryptoError;
use alloy_primitives::{keccak256, Address};
use k256::elliptic_curve::sec1::ToEncodedPoint;

/// A validated secp256k1 private scalar
#[derive(Clone)]
pub struct Secp256k1SecretKey(k256::SecretKey);

impl Secp256k1SecretKey {
    /// Big-endian scalar; rejects zero and values not below the group order
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, CryptoError> {
        k256::SecretKey::from_bytes(k256::FieldBytes::from_slice(bytes))
            .map(Self)
            .map_err(|_| CryptoError::InvalidSecretKey)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.0.to_bytes().into()
    }

    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey(self.0.public_key())
    }

    pub(crate) fn inner(&self) -> &k256::SecretKey {
        &self.0
    }

    pub(crate) fn from_inner(inner: k256::SecretKey) -> Self {
        Self(inner)
    }
}

impl std::fmt::Debug for Secp256k1SecretKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Secp256k1SecretKey([REDACTED])")
    }
}

/// A secp256k1 public point
#[derive(Clone, PartialEq, Eq)]
pub struct Secp256k1PublicKey(k256::PublicKey);

impl Secp256k1PublicKey {
    /// SEC1 encoding: 33 bytes when `compress`, otherwise 65
    fn to_sec1_bytes(&self, compress: bool) -> Vec<u8> {
        self.0.to_encoded_point(compress).as_bytes().to_vec()
    }

    /// Ethereum address of this point
    pub fn address(&self) -> Address {
        let point = self.0.to_encoded_point(false);
        let hash = keccak256(&point.as_bytes()[1..]);
        Address::from_slice(&hash[12..])
    }
}

impl std::fmt::Debug for Secp256k1PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Secp256k1PublicKey({})", hex::encode(self.to_sec1_bytes(true)))
    }
}
