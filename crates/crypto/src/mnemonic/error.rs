//! Error types for mnemonic operations

use thiserror::Error;

use crate::secure::EntropyError;

/// Result type for mnemonic operations
pub type MnemonicResult<T> = Result<T, MnemonicError>;

/// Errors that can occur during mnemonic operations
#[derive(Debug, Error)]
pub enum MnemonicError {
    /// A word is not in the BIP-39 English word list
    #[error("invalid mnemonic word at position {position}")]
    InvalidWord {
        /// Zero-based index of the offending word
        position: usize,
    },

    /// The checksum bits embedded in the last word do not match the entropy
    #[error("mnemonic checksum mismatch")]
    ChecksumMismatch,

    /// Wrong number of words
    #[error("invalid mnemonic word count: {0} (must be 12, 15, 18, 21, or 24)")]
    InvalidWordCount(usize),

    /// Any other malformed phrase
    #[error("invalid mnemonic phrase: {0}")]
    InvalidPhrase(String),

    /// Key derivation failed
    #[error("key derivation failed: {0}")]
    DerivationFailed(String),

    /// Invalid derivation path
    #[error("invalid derivation path: {0}")]
    InvalidPath(String),

    /// Entropy generation failed
    #[error(transparent)]
    Entropy(#[from] EntropyError),
}

impl From<bip39::Error> for MnemonicError {
    fn from(err: bip39::Error) -> Self {
        match err {
            bip39::Error::UnknownWord(position) => MnemonicError::InvalidWord { position },
            bip39::Error::InvalidChecksum => MnemonicError::ChecksumMismatch,
            bip39::Error::BadWordCount(count) => MnemonicError::InvalidWordCount(count),
            other => MnemonicError::InvalidPhrase(other.to_string()),
        }
    }
}
