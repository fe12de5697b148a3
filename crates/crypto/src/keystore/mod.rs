//! Passphrase-encrypted key containers
//!
//! A private key is sealed into a self-describing JSON container in the
//! Web3 Secret Storage v3 layout:
//!
//! - scrypt stretches the passphrase into a 64-byte derived key
//! - the first half keys AES-CTR (128 or 256 bit), the second half keys the MAC
//! - the MAC is `keccak256(mac_key || ciphertext)` and is checked in constant
//!   time before anything is decrypted
//!
//! # Example
//!
//! ```rust,ignore
//! use safekeystore_crypto::keystore::{CostProfile, EncryptedContainer, KeystoreDir};
//!
//! let dir = KeystoreDir::new("./keystore")?;
//! let path = dir.store(&raw_key, "my-strong-passphrase", &CostProfile::standard())?;
//!
//! let container = dir.load(&path)?;
//! let recovered = container.open("my-strong-passphrase")?;
//! ```

mod cipher;
mod container;
mod error;
mod kdf;
mod mac;
mod profile;
mod store;

pub use cipher::{decrypt_secret, encrypt_secret, CipherError, CipherParams, IV_LENGTH};
pub use container::{CryptoSection, EncryptedContainer, CONTAINER_VERSION};
pub use error::{FormatError, FormatResult, OpenError, OpenResult, SealError, SealResult};
pub use kdf::{scrypt_derive_key, DerivedKey, KdfId, ScryptParams, MIN_SALT_LENGTH};
pub use mac::{compute_mac, verify_mac, MAC_LENGTH};
pub use profile::{
    CipherId, CostProfile, ProfileName, MAX_SCRYPT_MEMORY, MAX_SCRYPT_N, MAX_SCRYPT_P, MIN_SCRYPT_N,
    SALT_LENGTH, SCRYPT_DKLEN, SCRYPT_R, STANDARD_SCRYPT_N, STRONG_SCRYPT_N,
};
pub use store::{key_file_name, load_container, KeystoreDir};
