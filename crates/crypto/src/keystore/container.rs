//! Encrypted container: seal, open and the on-disk JSON encoding
//!
//! The layout is the Web3 Secret Storage v3 layout:
//!
//! ```json
//! {
//!   "address": "7e5f4552091a69125d5dfcb7b8c2659029395bdf",
//!   "crypto": {
//!     "cipher": "aes-128-ctr",
//!     "ciphertext": "...",
//!     "cipherparams": { "iv": "..." },
//!     "kdf": "scrypt",
//!     "kdfparams": { "dklen": 64, "n": 262144, "p": 1, "r": 8, "salt": "..." },
//!     "mac": "..."
//!   },
//!   "id": "3198bc9c-6672-5ab3-d995-4942343ae5b6",
//!   "version": 3
//! }
//! ```

use alloy_primitives::Address;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use super::cipher::{decrypt_secret, encrypt_secret, CipherParams};
use super::error::{FormatError, FormatResult, OpenError, OpenResult, SealError, SealResult};
use super::kdf::{KdfId, ScryptParams};
use super::mac::{compute_mac, verify_mac, MAC_LENGTH};
use super::profile::{CipherId, CostProfile};
use crate::secure::{random_bytes, RawKeyMaterial, PRIVATE_KEY_SIZE};

/// Container format version
pub const CONTAINER_VERSION: u32 = 3;

/// A sealed private key together with everything needed to open it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedContainer {
    #[serde(with = "address_hex", alias = "identifier")]
    address: Address,
    #[serde(alias = "Crypto")]
    crypto: CryptoSection,
    id: Uuid,
    version: u32,
}

/// The `crypto` object: cipher, KDF and MAC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoSection {
    pub cipher: CipherId,
    #[serde(with = "hex")]
    pub ciphertext: Vec<u8>,
    pub cipherparams: CipherParams,
    pub kdf: KdfId,
    pub kdfparams: ScryptParams,
    #[serde(with = "hex")]
    pub mac: Vec<u8>,
}

impl EncryptedContainer {
    /// Encrypt `raw` under `passphrase` with the cost parameters of `profile`.
    ///
    /// Salt and IV are drawn fresh for every call, so sealing the same key
    /// twice yields two different containers.
    pub fn seal(
        raw: &RawKeyMaterial,
        passphrase: &str,
        profile: &CostProfile,
    ) -> SealResult<Self> {
        profile.validate()?;

        let cipher = profile.cipher();
        let salt = random_bytes(profile.salt_len())?;
        let iv = random_bytes(cipher.iv_len())?;

        let kdfparams = ScryptParams::from_profile(profile, salt);
        let derived = kdfparams.derive_key(passphrase)?;

        let ciphertext = encrypt_secret(
            cipher,
            raw.private_key_bytes(),
            derived.encryption_key(),
            &iv,
        )
        .map_err(|e| SealError::InvalidProfile(e.to_string()))?;
        let mac = compute_mac(derived.mac_key(), &ciphertext);

        Ok(Self {
            address: raw.address()?,
            crypto: CryptoSection {
                cipher,
                ciphertext,
                cipherparams: CipherParams { iv },
                kdf: KdfId::Scrypt,
                kdfparams,
                mac: mac.to_vec(),
            },
            id: Uuid::new_v4(),
            version: CONTAINER_VERSION,
        })
    }

    /// Recover the private key.
    ///
    /// The MAC is checked before anything is decrypted. A wrong passphrase
    /// and a modified ciphertext or tag both yield
    /// `OpenError::InvalidPassphraseOrCorrupt`. Parameters are validated
    /// first, so a container built in memory is held to the same cost
    /// ceiling as one read through `deserialize`.
    pub fn open(&self, passphrase: &str) -> OpenResult<RawKeyMaterial> {
        self.validate()?;

        let crypto = &self.crypto;
        let derived = crypto.kdfparams.derive_key(passphrase).map_err(|e| match e {
            SealError::InvalidProfile(reason) | SealError::Kdf(reason) => {
                FormatError::InvalidKdfParams(reason)
            }
            other => FormatError::InvalidKdfParams(other.to_string()),
        })?;

        if !verify_mac(derived.mac_key(), &crypto.ciphertext, &crypto.mac) {
            warn!(address = %self.address_hex(), "keystore MAC mismatch");
            return Err(OpenError::InvalidPassphraseOrCorrupt);
        }

        let plaintext = decrypt_secret(
            crypto.cipher,
            &crypto.ciphertext,
            derived.encryption_key(),
            &crypto.cipherparams.iv,
        )
        .map_err(|e| FormatError::InvalidCipherParams(e.to_string()))?;

        let raw = RawKeyMaterial::from_slice(plaintext.expose_secret()).map_err(|_| {
            warn!(address = %self.address_hex(), "decrypted bytes are not a valid key");
            OpenError::InvalidPassphraseOrCorrupt
        })?;

        // The MAC does not cover the address field
        match raw.address() {
            Ok(address) if address == self.address => Ok(raw),
            _ => {
                warn!(address = %self.address_hex(), "decrypted key does not match container address");
                Err(OpenError::InvalidPassphraseOrCorrupt)
            }
        }
    }

    /// Encode as pretty-printed JSON
    pub fn serialize(&self) -> SealResult<Vec<u8>> {
        Ok(serde_json::to_vec_pretty(self)?)
    }

    /// Decode and validate a container.
    ///
    /// The version is checked before the rest of the document so that a
    /// future layout reports `UnsupportedVersion` rather than a missing field.
    pub fn deserialize(bytes: &[u8]) -> FormatResult<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes)?;

        let version = value
            .get("version")
            .ok_or_else(|| FormatError::Malformed("missing field `version`".to_string()))?
            .as_u64()
            .ok_or_else(|| FormatError::Malformed("`version` is not an integer".to_string()))?;
        if version != u64::from(CONTAINER_VERSION) {
            return Err(FormatError::UnsupportedVersion(
                u32::try_from(version).unwrap_or(u32::MAX),
            ));
        }

        let container: Self = serde_json::from_value(value)?;
        container.validate()?;
        Ok(container)
    }

    /// Check every parameter `open` relies on
    pub fn validate(&self) -> FormatResult<()> {
        if self.version != CONTAINER_VERSION {
            return Err(FormatError::UnsupportedVersion(self.version));
        }

        let crypto = &self.crypto;
        crypto.kdfparams.validate()?;
        crypto.cipherparams.validate(crypto.cipher)?;

        let half = crypto.kdfparams.dklen as usize / 2;
        if half < crypto.cipher.key_len() {
            return Err(FormatError::InvalidKdfParams(format!(
                "dklen {} is too short for {}",
                crypto.kdfparams.dklen, crypto.cipher
            )));
        }

        if crypto.ciphertext.len() != PRIVATE_KEY_SIZE {
            return Err(FormatError::InvalidField {
                field: "crypto.ciphertext",
                reason: format!(
                    "expected {} bytes, got {}",
                    PRIVATE_KEY_SIZE,
                    crypto.ciphertext.len()
                ),
            });
        }
        if crypto.mac.len() != MAC_LENGTH {
            return Err(FormatError::InvalidField {
                field: "crypto.mac",
                reason: format!("expected {} bytes, got {}", MAC_LENGTH, crypto.mac.len()),
            });
        }
        Ok(())
    }

    /// Address of the sealed key
    pub fn address(&self) -> Address {
        self.address
    }

    /// Address as lowercase hex without `0x`, as stored in the file
    pub fn address_hex(&self) -> String {
        hex::encode(self.address)
    }

    /// Random container id
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn crypto(&self) -> &CryptoSection {
        &self.crypto
    }
}

/// `Address` as bare lowercase hex. `0x` is tolerated when reading.
mod address_hex {
    use alloy_primitives::Address;
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    const ADDRESS_LENGTH: usize = 20;

    pub fn serialize<S: Serializer>(address: &Address, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&hex::encode(address))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Address, D::Error> {
        let s = String::deserialize(deserializer)?;
        let s = s.strip_prefix("0x").unwrap_or(&s);
        let bytes = hex::decode(s).map_err(D::Error::custom)?;
        if bytes.len() != ADDRESS_LENGTH {
            return Err(D::Error::custom(format!(
                "address must be {} bytes, got {}",
                ADDRESS_LENGTH,
                bytes.len()
            )));
        }
        Ok(Address::from_slice(&bytes))
    }
}
