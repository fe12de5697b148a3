//! Key Derivation Function (KDF) implementation
//!
//! scrypt-based key derivation. The derived buffer is split in two equal,
//! non-overlapping halves: the first half keys the cipher, the second half
//! keys the MAC.

use std::time::Instant;

use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{FormatError, FormatResult, SealError, SealResult};
use super::profile::{
    CostProfile, MAX_SCRYPT_MEMORY, MAX_SCRYPT_N, MAX_SCRYPT_P, MIN_SCRYPT_N,
};
use crate::secure::SecretBytes;

/// Smallest dklen accepted when opening (legacy 32-byte layout)
pub const MIN_DKLEN: u32 = 32;

/// Largest dklen scrypt accepts
pub const MAX_DKLEN: u32 = 64;

/// Minimum salt length in bytes
pub const MIN_SALT_LENGTH: usize = 16;

/// KDF identifier as written in `crypto.kdf`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum KdfId {
    #[serde(rename = "scrypt")]
    Scrypt,
}

/// scrypt parameters as written in `crypto.kdfparams`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScryptParams {
    /// Derived key length in bytes
    pub dklen: u32,
    /// CPU/memory cost parameter (must be power of 2)
    pub n: u32,
    /// Parallelization parameter
    pub p: u32,
    /// Block size parameter
    pub r: u32,
    /// Random salt
    #[serde(with = "hex")]
    pub salt: Vec<u8>,
}

impl ScryptParams {
    /// Parameters for sealing under `profile` with a fresh salt
    pub fn from_profile(profile: &CostProfile, salt: Vec<u8>) -> Self {
        Self {
            dklen: profile.dklen(),
            n: profile.scrypt_n(),
            p: profile.scrypt_p(),
            r: profile.scrypt_r(),
            salt,
        }
    }

    /// Validate parameters read from a container
    pub fn validate(&self) -> FormatResult<()> {
        if !(MIN_DKLEN..=MAX_DKLEN).contains(&self.dklen) || self.dklen % 2 != 0 {
            return Err(FormatError::InvalidKdfParams(format!(
                "dklen must be an even number between {} and {}, got {}",
                MIN_DKLEN, MAX_DKLEN, self.dklen
            )));
        }
        if self.n < MIN_SCRYPT_N {
            return Err(FormatError::InvalidKdfParams(format!(
                "n must be at least {}, got {}",
                MIN_SCRYPT_N, self.n
            )));
        }
        if self.salt.len() < MIN_SALT_LENGTH {
            return Err(FormatError::InvalidKdfParams(format!(
                "salt must be at least {} bytes, got {}",
                MIN_SALT_LENGTH,
                self.salt.len()
            )));
        }
        check_cost(self.n, self.r, self.p, self.dklen as usize)
            .map(|_| ())
            .map_err(FormatError::InvalidKdfParams)
    }

    /// Derive the key pair for `passphrase`
    pub fn derive_key(&self, passphrase: &str) -> SealResult<DerivedKey> {
        let started = Instant::now();
        let output = scrypt_derive_key(
            passphrase,
            &self.salt,
            self.n,
            self.r,
            self.p,
            self.dklen as usize,
        )?;
        debug!(
            n = self.n,
            r = self.r,
            p = self.p,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "scrypt key derivation finished"
        );
        Ok(DerivedKey(output))
    }
}

/// scrypt output, split into encryption and MAC halves
pub struct DerivedKey(SecretBytes);

impl DerivedKey {
    /// First half of the derived buffer
    pub fn encryption_key(&self) -> &[u8] {
        let bytes = self.0.expose_secret();
        &bytes[..bytes.len() / 2]
    }

    /// Second half of the derived buffer
    pub fn mac_key(&self) -> &[u8] {
        let bytes = self.0.expose_secret();
        &bytes[bytes.len() / 2..]
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey")
            .field("length", &self.0.expose_secret().len())
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Bound the work a set of scrypt parameters can demand.
///
/// `n` is capped at `MAX_SCRYPT_N`, `p` at `MAX_SCRYPT_P` and the `128 * r * n`
/// working set at `MAX_SCRYPT_MEMORY`, so parameters read from a file can
/// never ask for more than the `Strong` preset.
fn check_cost(n: u32, r: u32, p: u32, dklen: usize) -> Result<scrypt::Params, String> {
    if !n.is_power_of_two() || n > MAX_SCRYPT_N {
        return Err(format!(
            "n must be a power of 2 no larger than {}, got {}",
            MAX_SCRYPT_N, n
        ));
    }
    if r == 0 {
        return Err("r must be positive".to_string());
    }
    if !(1..=MAX_SCRYPT_P).contains(&p) {
        return Err(format!("p must be between 1 and {}, got {}", MAX_SCRYPT_P, p));
    }
    let memory = 128 * u64::from(r) * u64::from(n);
    if memory > MAX_SCRYPT_MEMORY {
        return Err(format!(
            "n={} r={} needs {} bytes of memory, limit is {}",
            n, r, memory, MAX_SCRYPT_MEMORY
        ));
    }
    let log_n = n.trailing_zeros() as u8;
    scrypt::Params::new(log_n, r, p, dklen).map_err(|_| {
        format!(
            "unsupported combination n={} r={} p={} dklen={} (log2(n) must be below 16 * r)",
            n, r, p, dklen
        )
    })
}

fn scrypt_params(n: u32, r: u32, p: u32, dklen: usize) -> SealResult<scrypt::Params> {
    check_cost(n, r, p, dklen).map_err(SealError::InvalidProfile)
}

/// Derive a key using scrypt KDF
///
/// # Arguments
///
/// * `passphrase` - User passphrase (may be empty)
/// * `salt` - Random salt bytes
/// * `n` - CPU/memory cost parameter (must be power of 2)
/// * `r` - Block size parameter
/// * `p` - Parallelization parameter
/// * `dklen` - Desired key length in bytes
pub fn scrypt_derive_key(
    passphrase: &str,
    salt: &[u8],
    n: u32,
    r: u32,
    p: u32,
    dklen: usize,
) -> SealResult<SecretBytes> {
    let params = scrypt_params(n, r, p, dklen)?;

    let mut output = vec![0u8; dklen];
    scrypt::scrypt(passphrase.as_bytes(), salt, &params, &mut output)
        .map_err(|e| SealError::Kdf(e.to_string()))?;

    Ok(SecretBytes::new(Box::new(output)))
}
