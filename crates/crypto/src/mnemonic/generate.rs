//! Mnemonic phrase generation and parsing
//!
//! Implements BIP-39 mnemonic phrase support on top of the `bip39` crate.

use super::error::{MnemonicError, MnemonicResult};
use crate::secure::{fill_random, SecretString};
use bip39::Mnemonic as Bip39Mnemonic;
use secrecy::ExposeSecret;
use zeroize::Zeroize;

/// Default word count for freshly generated phrases (128 bits of entropy)
pub const DEFAULT_WORD_COUNT: usize = 12;

/// BIP-39 mnemonic phrase wrapper
///
/// Provides secure handling of mnemonic phrases with automatic memory zeroing.
/// The phrase is stored as a SecretString to prevent accidental logging.
///
/// # Example
///
/// ```rust
/// use safekeystore_crypto::mnemonic::Mnemonic;
///
/// // Generate a new 12-word mnemonic
/// let mnemonic = Mnemonic::generate().unwrap();
/// assert_eq!(mnemonic.word_count(), 12);
///
/// // Import an existing mnemonic
/// let phrase = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";
/// let imported = Mnemonic::from_phrase(phrase).unwrap();
/// ```
pub struct Mnemonic {
    inner: Bip39Mnemonic,
    /// Cached phrase as SecretString for secure access
    phrase: SecretString,
}

impl Mnemonic {
    /// Generate a new random 12-word (128-bit entropy) mnemonic
    ///
    /// # Errors
    ///
    /// Returns `MnemonicError::Entropy` if the OS random source fails
    pub fn generate() -> MnemonicResult<Self> {
        Self::generate_with_word_count(DEFAULT_WORD_COUNT)
    }

    /// Generate a mnemonic with a specific word count
    ///
    /// # Arguments
    ///
    /// * `word_count` - Number of words (12, 15, 18, 21, or 24)
    pub fn generate_with_word_count(word_count: usize) -> MnemonicResult<Self> {
        let entropy_bytes = word_count_to_entropy_bytes(word_count)?;

        let mut entropy = vec![0u8; entropy_bytes];
        fill_random(&mut entropy)?;

        let mnemonic = Bip39Mnemonic::from_entropy(&entropy);
        entropy.zeroize();
        let mnemonic = mnemonic?;

        let phrase = mnemonic.to_string();
        Ok(Self {
            inner: mnemonic,
            phrase: phrase.into(),
        })
    }

    /// Import a mnemonic from an existing phrase
    ///
    /// Validates that every word is in the English word list and that the
    /// checksum embedded in the final word matches the entropy.
    ///
    /// # Errors
    ///
    /// - `InvalidWord` if a word is not recognized
    /// - `ChecksumMismatch` if the checksum bits do not match
    /// - `InvalidWordCount` if the phrase is not 12, 15, 18, 21, or 24 words
    pub fn from_phrase(phrase: &str) -> MnemonicResult<Self> {
        let mut normalized = phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" ");
        let parsed = Bip39Mnemonic::parse_normalized(&normalized);
        let mnemonic = match parsed {
            Ok(mnemonic) => mnemonic,
            Err(e) => {
                normalized.zeroize();
                return Err(e.into());
            }
        };

        Ok(Self {
            phrase: normalized.into(),
            inner: mnemonic,
        })
    }

    /// Get the mnemonic phrase
    ///
    /// # Security
    ///
    /// The returned reference should be used immediately and not stored.
    pub fn phrase(&self) -> &str {
        self.phrase.expose_secret()
    }

    /// Get the number of words in the mnemonic
    pub fn word_count(&self) -> usize {
        self.inner.word_count()
    }

    /// Get the 64-byte BIP-39 seed.
    ///
    /// PBKDF2-HMAC-SHA512 with the phrase as password and
    /// "mnemonic{passphrase}" as salt, 2048 rounds.
    pub fn to_seed(&self, passphrase: Option<&str>) -> [u8; 64] {
        self.inner.to_seed(passphrase.unwrap_or(""))
    }
}

impl std::fmt::Debug for Mnemonic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mnemonic")
            .field("word_count", &self.word_count())
            .field("phrase", &"[REDACTED]")
            .finish()
    }
}

/// Convert word count to entropy bytes
fn word_count_to_entropy_bytes(word_count: usize) -> MnemonicResult<usize> {
    match word_count {
        12 => Ok(16), // 128 bits
        15 => Ok(20), // 160 bits
        18 => Ok(24), // 192 bits
        21 => Ok(28), // 224 bits
        24 => Ok(32), // 256 bits
        _ => Err(MnemonicError::InvalidWordCount(word_count)),
    }
}
