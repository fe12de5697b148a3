//! AES-CTR cipher implementation for keystore encryption
//!
//! AES-128-CTR and AES-256-CTR with a 128-bit big-endian counter. CTR mode
//! needs no padding, so the ciphertext has the length of the private key.

use aes::{Aes128, Aes256};
use cipher::{KeyIvInit, StreamCipher};
use ctr::Ctr128BE;
use serde::{Deserialize, Serialize};

use super::error::{FormatError, FormatResult};
use super::profile::CipherId;
use crate::secure::SecretBytes;

/// IV (initialization vector) length for AES-CTR
pub const IV_LENGTH: usize = 16;

type Aes128Ctr = Ctr128BE<Aes128>;
type Aes256Ctr = Ctr128BE<Aes256>;

/// Cipher parameters as written in `crypto.cipherparams`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CipherParams {
    /// Initialization vector
    #[serde(with = "hex")]
    pub iv: Vec<u8>,
}

impl CipherParams {
    /// Validate the parameters against the cipher they are used with
    pub fn validate(&self, cipher: CipherId) -> FormatResult<()> {
        if self.iv.len() != cipher.iv_len() {
            return Err(FormatError::InvalidCipherParams(format!(
                "IV must be {} bytes, got {}",
                cipher.iv_len(),
                self.iv.len()
            )));
        }
        Ok(())
    }
}

/// Cipher-level failures; only reachable through internal misuse
#[derive(Debug, thiserror::Error)]
pub enum CipherError {
    /// Encryption key shorter than the cipher needs
    #[error("{cipher} key must be at least {expected} bytes, got {actual}")]
    KeyTooShort {
        cipher: CipherId,
        expected: usize,
        actual: usize,
    },

    /// IV of the wrong length
    #[error("IV must be 16 bytes, got {0}")]
    InvalidIv(usize),
}

/// XOR the AES-CTR keystream for (`cipher`, `key`, `iv`) into `data`.
///
/// Uses the first `cipher.key_len()` bytes of `key`.
fn apply_keystream(
    cipher: CipherId,
    key: &[u8],
    iv: &[u8],
    data: &mut [u8],
) -> Result<(), CipherError> {
    let key_len = cipher.key_len();
    if key.len() < key_len {
        return Err(CipherError::KeyTooShort {
            cipher,
            expected: key_len,
            actual: key.len(),
        });
    }
    if iv.len() != IV_LENGTH {
        return Err(CipherError::InvalidIv(iv.len()));
    }

    let key = &key[..key_len];
    match cipher {
        CipherId::Aes128Ctr => {
            let mut stream = Aes128Ctr::new(key.into(), iv.into());
            stream.apply_keystream(data);
        }
        CipherId::Aes256Ctr => {
            let mut stream = Aes256Ctr::new(key.into(), iv.into());
            stream.apply_keystream(data);
        }
    }
    Ok(())
}

/// Encrypt secret data
///
/// # Arguments
///
/// * `cipher` - AES variant
/// * `secret` - The secret data to encrypt
/// * `encryption_key` - The encryption half of the derived key
/// * `iv` - 16-byte initialization vector
pub fn encrypt_secret(
    cipher: CipherId,
    secret: &[u8],
    encryption_key: &[u8],
    iv: &[u8],
) -> Result<Vec<u8>, CipherError> {
    let mut ciphertext = secret.to_vec();
    apply_keystream(cipher, encryption_key, iv, &mut ciphertext)?;
    Ok(ciphertext)
}

/// Decrypt secret data
///
/// Only call this after the MAC over `ciphertext` has been verified.
pub fn decrypt_secret(
    cipher: CipherId,
    ciphertext: &[u8],
    decryption_key: &[u8],
    iv: &[u8],
) -> Result<SecretBytes, CipherError> {
    let mut plaintext = SecretBytes::new(Box::new(ciphertext.to_vec()));
    apply_keystream(
        cipher,
        decryption_key,
        iv,
        secrecy::ExposeSecretMut::expose_secret_mut(&mut plaintext),
    )?;
    Ok(plaintext)
}
