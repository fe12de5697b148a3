//! KDF cost profiles
//!
//! A profile fixes the cipher and the scrypt cost factors used when sealing.
//! `open` never consults a profile: every parameter it needs is stored in the
//! container itself.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::{SealError, SealResult};

/// Lowest accepted scrypt N (2^12)
pub const MIN_SCRYPT_N: u32 = 1 << 12;

/// scrypt N of the `Standard` profile (2^18)
pub const STANDARD_SCRYPT_N: u32 = 1 << 18;

/// scrypt N of the `Strong` profile (2^20)
pub const STRONG_SCRYPT_N: u32 = 1 << 20;

/// scrypt parallelization of both presets
pub const DEFAULT_SCRYPT_P: u32 = 1;

/// scrypt block size
pub const SCRYPT_R: u32 = 8;

/// Derived key length: first half encrypts, second half authenticates
pub const SCRYPT_DKLEN: u32 = 64;

/// Salt length in bytes
pub const SALT_LENGTH: usize = 32;

/// Highest accepted scrypt N, the `Strong` preset
pub const MAX_SCRYPT_N: u32 = STRONG_SCRYPT_N;

/// Highest accepted scrypt P
pub const MAX_SCRYPT_P: u32 = 16;

/// Largest scrypt working set (128 * r * n bytes) accepted, 1 GiB
pub const MAX_SCRYPT_MEMORY: u64 = 128 * SCRYPT_R as u64 * STRONG_SCRYPT_N as u64;

/// Symmetric cipher identifier as written in `crypto.cipher`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CipherId {
    #[serde(rename = "aes-128-ctr")]
    Aes128Ctr,
    #[serde(rename = "aes-256-ctr")]
    Aes256Ctr,
}

impl CipherId {
    /// Key length in bytes
    pub fn key_len(&self) -> usize {
        match self {
            CipherId::Aes128Ctr => 16,
            CipherId::Aes256Ctr => 32,
        }
    }

    /// IV length in bytes (the AES block size for both variants)
    pub fn iv_len(&self) -> usize {
        16
    }

    /// Identifier as stored in the container
    pub fn as_str(&self) -> &'static str {
        match self {
            CipherId::Aes128Ctr => "aes-128-ctr",
            CipherId::Aes256Ctr => "aes-256-ctr",
        }
    }
}

impl fmt::Display for CipherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Named preset, or `Custom` for validated non-preset parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileName {
    Standard,
    Strong,
    Custom,
}

/// Cipher and KDF cost parameters used by `seal`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CostProfile {
    name: ProfileName,
    cipher: CipherId,
    scrypt_n: u32,
    scrypt_p: u32,
}

impl CostProfile {
    /// aes-128-ctr, scrypt N = 2^18, P = 1
    pub fn standard() -> Self {
        Self {
            name: ProfileName::Standard,
            cipher: CipherId::Aes128Ctr,
            scrypt_n: STANDARD_SCRYPT_N,
            scrypt_p: DEFAULT_SCRYPT_P,
        }
    }

    /// aes-256-ctr, scrypt N = 2^20, P = 1
    pub fn strong() -> Self {
        Self {
            name: ProfileName::Strong,
            cipher: CipherId::Aes256Ctr,
            scrypt_n: STRONG_SCRYPT_N,
            scrypt_p: DEFAULT_SCRYPT_P,
        }
    }

    /// A non-preset profile, validated the same way presets are.
    ///
    /// # Errors
    ///
    /// `SealError::InvalidProfile` if `scrypt_n` is not a power of two or lies
    /// outside `MIN_SCRYPT_N..=MAX_SCRYPT_N`, or if `scrypt_p` is zero or above
    /// `MAX_SCRYPT_P`.
    pub fn custom(cipher: CipherId, scrypt_n: u32, scrypt_p: u32) -> SealResult<Self> {
        let profile = Self {
            name: ProfileName::Custom,
            cipher,
            scrypt_n,
            scrypt_p,
        };
        profile.validate()?;
        Ok(profile)
    }

    /// Check the cost bounds
    pub fn validate(&self) -> SealResult<()> {
        if !self.scrypt_n.is_power_of_two() {
            return Err(SealError::InvalidProfile(format!(
                "scrypt n must be a power of 2, got {}",
                self.scrypt_n
            )));
        }
        if !(MIN_SCRYPT_N..=MAX_SCRYPT_N).contains(&self.scrypt_n) {
            return Err(SealError::InvalidProfile(format!(
                "scrypt n must be between {} and {}, got {}",
                MIN_SCRYPT_N, MAX_SCRYPT_N, self.scrypt_n
            )));
        }
        if !(1..=MAX_SCRYPT_P).contains(&self.scrypt_p) {
            return Err(SealError::InvalidProfile(format!(
                "scrypt p must be between 1 and {}, got {}",
                MAX_SCRYPT_P, self.scrypt_p
            )));
        }
        Ok(())
    }

    pub fn name(&self) -> ProfileName {
        self.name
    }

    pub fn cipher(&self) -> CipherId {
        self.cipher
    }

    pub fn scrypt_n(&self) -> u32 {
        self.scrypt_n
    }

    pub fn scrypt_p(&self) -> u32 {
        self.scrypt_p
    }

    pub fn scrypt_r(&self) -> u32 {
        SCRYPT_R
    }

    pub fn dklen(&self) -> u32 {
        SCRYPT_DKLEN
    }

    pub fn salt_len(&self) -> usize {
        SALT_LENGTH
    }
}

impl Default for CostProfile {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Display for CostProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            ProfileName::Standard => write!(f, "standard"),
            ProfileName::Strong => write!(f, "strong"),
            ProfileName::Custom => write!(
                f,
                "custom({}, n={}, p={})",
                self.cipher, self.scrypt_n, self.scrypt_p
            ),
        }
    }
}

impl FromStr for CostProfile {
    type Err = SealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "standard" => Ok(Self::standard()),
            "strong" => Ok(Self::strong()),
            _ => Err(SealError::InvalidProfile(format!(
                "unknown profile {:?} (valid: standard, strong)",
                s
            ))),
        }
    }
}
