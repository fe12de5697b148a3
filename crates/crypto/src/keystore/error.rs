//! Keystore error types
//!
//! Sealing, opening and parsing fail for different reasons and are surfaced
//! through different enums. `OpenError` reports a wrong passphrase and a
//! tampered file as the same variant.

use thiserror::Error;

use crate::error::CryptoError;
use crate::secure::EntropyError;

/// Result type for sealing and persisting
pub type SealResult<T> = Result<T, SealError>;

/// Result type for loading and opening
pub type OpenResult<T> = Result<T, OpenError>;

/// Result type for container parsing and validation
pub type FormatResult<T> = Result<T, FormatError>;

/// Errors from `seal` and from writing a container to disk
#[derive(Error, Debug)]
pub enum SealError {
    /// Cost profile rejected (cost not a power of two, below minimum, ...)
    #[error("invalid cost profile: {0}")]
    InvalidProfile(String),

    /// Salt or IV could not be drawn
    #[error(transparent)]
    Entropy(#[from] EntropyError),

    /// Key derivation failed
    #[error("key derivation failed: {0}")]
    Kdf(String),

    /// The key to seal could not be mapped to an address
    #[error(transparent)]
    Key(#[from] CryptoError),

    /// Serializing the container failed
    #[error("container encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),

    /// Writing the container failed; the destination is untouched
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from `open` and from reading a container from disk
#[derive(Error, Debug)]
pub enum OpenError {
    /// The MAC did not verify, or the decrypted key does not match the
    /// stored address. Covers both a wrong passphrase and a corrupted file.
    #[error("invalid passphrase or corrupt keystore")]
    InvalidPassphraseOrCorrupt,

    /// The container is malformed
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Reading the container failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A persisted container is malformed
#[derive(Error, Debug)]
pub enum FormatError {
    /// Not valid JSON, missing fields, bad hex or unknown enum values
    #[error("malformed keystore: {0}")]
    Malformed(String),

    /// Unknown `version`
    #[error("unsupported keystore version: {0}")]
    UnsupportedVersion(u32),

    /// Invalid KDF parameters
    #[error("invalid KDF parameters: {0}")]
    InvalidKdfParams(String),

    /// Invalid cipher parameters
    #[error("invalid cipher parameters: {0}")]
    InvalidCipherParams(String),

    /// A field has the wrong shape
    #[error("invalid field {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },
}

impl From<serde_json::Error> for FormatError {
    fn from(err: serde_json::Error) -> Self {
        FormatError::Malformed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_error_message_is_fixed() {
        // Callers only ever see one message for both failure causes
        assert_eq!(
            OpenError::InvalidPassphraseOrCorrupt.to_string(),
            "invalid passphrase or corrupt keystore"
        );
    }

    #[test]
    fn test_format_error_from_json() {
        let err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let format: FormatError = err.into();
        assert!(matches!(format, FormatError::Malformed(_)));
    }
}
