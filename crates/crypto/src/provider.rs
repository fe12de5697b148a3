//! Key material provider
//!
//! Produces the raw private key that gets sealed into a keystore, either from
//! a freshly generated mnemonic or from words supplied by the caller. Both
//! paths derive along the same BIP-44 path, so a recorded phrase always
//! recovers the same key.

use tracing::debug;

use crate::mnemonic::{derive_secp256k1_key, DerivationConfig, Mnemonic, MnemonicResult};
use crate::secure::RawKeyMaterial;

/// A freshly generated key together with the phrase that recovers it
#[derive(Debug)]
pub struct GeneratedKey {
    /// Phrase to show the user once for offline recording
    pub mnemonic: Mnemonic,
    /// Private key derived from `mnemonic`
    pub material: RawKeyMaterial,
}

/// Produces raw key material from mnemonics
#[derive(Debug, Clone, Default)]
pub struct KeyMaterialProvider {
    config: DerivationConfig,
}

impl KeyMaterialProvider {
    /// Provider deriving along `m/44'/60'/0'/0/0` without a BIP-39 passphrase
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider with an explicit derivation config
    pub fn with_config(config: DerivationConfig) -> Self {
        Self { config }
    }

    /// The derivation config in use
    pub fn config(&self) -> &DerivationConfig {
        &self.config
    }

    /// Generate a 12-word mnemonic from OS entropy and derive its key.
    ///
    /// # Errors
    ///
    /// `MnemonicError::Entropy` if the random source fails. Derivation of a
    /// fresh phrase only fails with negligible probability.
    pub fn generate(&self) -> MnemonicResult<GeneratedKey> {
        let mnemonic = Mnemonic::generate()?;
        let material = derive_secp256k1_key(&mnemonic, &self.config)?;
        debug!(path = %self.config.path(), "generated new key material");
        Ok(GeneratedKey { mnemonic, material })
    }

    /// Derive the key for caller-supplied, space-separated mnemonic words.
    ///
    /// # Errors
    ///
    /// `InvalidWord`, `ChecksumMismatch` or `InvalidWordCount` for a bad
    /// phrase, surfaced as-is.
    pub fn from_mnemonic(&self, words: &str) -> MnemonicResult<RawKeyMaterial> {
        let mnemonic = Mnemonic::from_phrase(words)?;
        derive_secp256k1_key(&mnemonic, &self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::MnemonicError;

    const WORDS: &str = "inflict race essay know royal crew deer seed sign evolve sure heart";

    #[test]
    fn test_from_mnemonic_known_key() {
        let key = KeyMaterialProvider::new().from_mnemonic(WORDS).unwrap();
        assert_eq!(
            key.to_hex(),
            "2e24e7d81dfa3cdfed65e8c0d98cc97fc6524d9eb2c61cae7a23ee9ecafa0c47"
        );
    }

    #[test]
    fn test_from_mnemonic_is_deterministic() {
        let provider = KeyMaterialProvider::new();
        let a = provider.from_mnemonic(WORDS).unwrap();
        let b = provider.from_mnemonic(WORDS).unwrap();
        assert_eq!(a.private_key_bytes(), b.private_key_bytes());
    }

    #[test]
    fn test_one_word_substitution_fails_checksum() {
        let altered = WORDS.replace("heart", "accident");
        let result = KeyMaterialProvider::new().from_mnemonic(&altered);
        assert!(matches!(result, Err(MnemonicError::ChecksumMismatch)));
    }

    #[test]
    fn test_generated_keys_differ_and_recover() {
        let provider = KeyMaterialProvider::new();
        let first = provider.generate().unwrap();
        let second = provider.generate().unwrap();

        assert_eq!(first.mnemonic.word_count(), 12);
        assert_ne!(first.material, second.material);

        let recovered = provider.from_mnemonic(first.mnemonic.phrase()).unwrap();
        assert_eq!(recovered, first.material);
    }

    #[test]
    fn test_custom_account() {
        let provider = KeyMaterialProvider::with_config(DerivationConfig::new(3));
        let key = provider.from_mnemonic(WORDS).unwrap();
        let default_key = KeyMaterialProvider::new().from_mnemonic(WORDS).unwrap();

        assert_ne!(key, default_key);
        assert_eq!(key.derivation_info().unwrap().account_index, 3);
    }
}
