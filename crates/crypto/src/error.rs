//! Cryptographic error types

use thiserror::Error;

/// Result type for curve key operations
pub type CryptoResult<T> = Result<T, CryptoError>;

/// secp256k1 key errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Bytes are not a valid secp256k1 scalar (zero or not below the group order)
    #[error("invalid secret key bytes")]
    InvalidSecretKey,

    /// Invalid hex encoding
    #[error("invalid hex encoding: {0}")]
    HexError(String),
}
