//! Key derivation from mnemonic phrases
//!
//! Implements BIP-32 hierarchical deterministic derivation of secp256k1
//! private keys along BIP-44 paths. Only private (CKDpriv) derivation is
//! needed: the seed always comes from a mnemonic we hold.

use hmac::{Hmac, Mac};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::elliptic_curve::PrimeField;
use k256::{FieldBytes, Scalar, SecretKey as K256SecretKey};
use sha2::Sha512;
use zeroize::{Zeroize, Zeroizing};

use super::error::{MnemonicError, MnemonicResult};
use super::generate::Mnemonic;
use crate::secp256k1::Secp256k1SecretKey;
use crate::secure::{DerivationInfo, RawKeyMaterial};

type HmacSha512 = Hmac<Sha512>;

/// SLIP-0044 coin type for Ethereum
pub const ETHEREUM_COIN_TYPE: u32 = 60;

/// Default derivation path for the first Ethereum account
pub const DEFAULT_DERIVATION_PATH_SECP256K1: &str = "m/44'/60'/0'/0/0";

/// Indices at or above this value are hardened
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// HMAC key for the BIP-32 master node
const MASTER_HMAC_KEY: &[u8] = b"Bitcoin seed";

/// Configuration for key derivation
#[derive(Debug, Clone, Default)]
pub struct DerivationConfig {
    /// Account index (default: 0)
    pub account: u32,
    /// Optional BIP-39 passphrase (the "25th word")
    pub passphrase: Option<String>,
}

impl DerivationConfig {
    /// Create a new derivation config for the given account
    pub fn new(account: u32) -> Self {
        Self {
            account,
            passphrase: None,
        }
    }

    /// Set the passphrase
    pub fn with_passphrase(mut self, passphrase: &str) -> Self {
        self.passphrase = Some(passphrase.to_string());
        self
    }

    /// Get the BIP-44 path: m/44'/60'/{account}'/0/0
    pub fn path(&self) -> String {
        format!("m/44'/{}'/{}'/0/0", ETHEREUM_COIN_TYPE, self.account)
    }
}

/// One step of a derivation path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildIndex {
    Normal(u32),
    Hardened(u32),
}

impl ChildIndex {
    /// Index as serialized into the HMAC input
    fn to_bits(self) -> u32 {
        match self {
            ChildIndex::Normal(i) => i,
            ChildIndex::Hardened(i) => i | HARDENED_OFFSET,
        }
    }
}

/// Parsed BIP-32 derivation path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// Parse a path like "m/44'/60'/0'/0/0"
    ///
    /// Hardened components may be written with `'`, `h` or `H`.
    pub fn parse(path: &str) -> MnemonicResult<Self> {
        let path = path.trim();

        let mut parts = path.split('/');
        match parts.next() {
            Some("m") | Some("M") => {}
            _ => {
                return Err(MnemonicError::InvalidPath(
                    "path must start with 'm'".to_string(),
                ))
            }
        }

        let mut components = Vec::new();
        for part in parts {
            let (num_str, hardened) = match part
                .strip_suffix('\'')
                .or_else(|| part.strip_suffix('h'))
                .or_else(|| part.strip_suffix('H'))
            {
                Some(stripped) => (stripped, true),
                None => (part, false),
            };

            let index: u32 = num_str.parse().map_err(|_| {
                MnemonicError::InvalidPath(format!("invalid path component: {:?}", part))
            })?;

            if index >= HARDENED_OFFSET {
                return Err(MnemonicError::InvalidPath(format!(
                    "path component out of range: {}",
                    part
                )));
            }

            components.push(if hardened {
                ChildIndex::Hardened(index)
            } else {
                ChildIndex::Normal(index)
            });
        }

        if components.is_empty() {
            return Err(MnemonicError::InvalidPath(
                "path has no components".to_string(),
            ));
        }

        Ok(Self(components))
    }

    /// The path components in order
    pub fn components(&self) -> &[ChildIndex] {
        &self.0
    }
}

/// BIP-32 extended private key (key + chain code)
struct ExtendedPrivateKey {
    secret: Secp256k1SecretKey,
    chain_code: Zeroizing<[u8; 32]>,
}

impl ExtendedPrivateKey {
    /// Master node from a BIP-39 seed
    fn master(seed: &[u8]) -> MnemonicResult<Self> {
        let mut mac = HmacSha512::new_from_slice(MASTER_HMAC_KEY)
            .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))?;
        mac.update(seed);
        Self::from_hmac_output(mac, |il| {
            K256SecretKey::from_slice(il).map_err(|_| {
                MnemonicError::DerivationFailed("master key out of range".to_string())
            })
        })
    }

    /// CKDpriv: derive the child at `index`
    fn derive_child(&self, index: ChildIndex) -> MnemonicResult<Self> {
        let mut mac = HmacSha512::new_from_slice(self.chain_code.as_ref())
            .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))?;

        match index {
            ChildIndex::Hardened(_) => {
                let mut parent = self.secret.to_bytes();
                mac.update(&[0u8]);
                mac.update(&parent);
                parent.zeroize();
            }
            ChildIndex::Normal(_) => {
                let public = self.secret.inner().public_key().to_encoded_point(true);
                mac.update(public.as_bytes());
            }
        }
        mac.update(&index.to_bits().to_be_bytes());

        let parent = self.secret.inner().to_nonzero_scalar();
        Self::from_hmac_output(mac, |il| {
            let tweak: Option<Scalar> = Scalar::from_repr(*FieldBytes::from_slice(il)).into();
            let tweak = tweak.ok_or_else(|| {
                MnemonicError::DerivationFailed(format!("tweak out of range at {:?}", index))
            })?;
            let child = tweak + *parent;
            K256SecretKey::from_bytes(&child.to_bytes()).map_err(|_| {
                MnemonicError::DerivationFailed(format!("derived zero key at {:?}", index))
            })
        })
    }

    /// Split I = IL || IR; IL becomes the key via `make_key`, IR the chain code
    fn from_hmac_output<F>(mac: HmacSha512, make_key: F) -> MnemonicResult<Self>
    where
        F: FnOnce(&[u8]) -> MnemonicResult<K256SecretKey>,
    {
        let mut output = Zeroizing::new([0u8; 64]);
        output.copy_from_slice(&mac.finalize().into_bytes());

        let (il, ir) = output.split_at(32);
        let secret = make_key(il)?;

        let mut chain_code = Zeroizing::new([0u8; 32]);
        chain_code.copy_from_slice(ir);

        Ok(Self {
            secret: Secp256k1SecretKey::from_inner(secret),
            chain_code,
        })
    }
}

/// Derive a secp256k1 private key from a BIP-39 seed along `path`
pub fn derive_from_seed(
    seed: &[u8],
    path: &DerivationPath,
) -> MnemonicResult<Zeroizing<[u8; 32]>> {
    let mut node = ExtendedPrivateKey::master(seed)?;
    for index in path.components() {
        node = node.derive_child(*index)?;
    }
    Ok(Zeroizing::new(node.secret.to_bytes()))
}

/// Derive the Ethereum account key for `config` from a mnemonic
///
/// # Example
///
/// ```rust
/// use safekeystore_crypto::mnemonic::{derive_secp256k1_key, DerivationConfig, Mnemonic};
///
/// let mnemonic = Mnemonic::from_phrase(
///     "inflict race essay know royal crew deer seed sign evolve sure heart",
/// ).unwrap();
///
/// let key = derive_secp256k1_key(&mnemonic, &DerivationConfig::default()).unwrap();
/// assert_eq!(
///     key.to_hex(),
///     "2e24e7d81dfa3cdfed65e8c0d98cc97fc6524d9eb2c61cae7a23ee9ecafa0c47"
/// );
/// ```
pub fn derive_secp256k1_key(
    mnemonic: &Mnemonic,
    config: &DerivationConfig,
) -> MnemonicResult<RawKeyMaterial> {
    let path_str = config.path();
    let path = DerivationPath::parse(&path_str)?;

    let mut seed = mnemonic.to_seed(config.passphrase.as_deref());
    let derived = derive_from_seed(&seed, &path);
    seed.zeroize();

    let material = RawKeyMaterial::from_scalar(&*derived?)
        .map_err(|e| MnemonicError::DerivationFailed(e.to_string()))?;

    Ok(material.with_derivation(DerivationInfo {
        account_index: config.account,
        path: path_str,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_MNEMONIC: &str =
        "inflict race essay know royal crew deer seed sign evolve sure heart";
    const TEST_KEY: &str = "2e24e7d81dfa3cdfed65e8c0d98cc97fc6524d9eb2c61cae7a23ee9ecafa0c47";

    #[test]
    fn test_known_vector() {
        let mnemonic = Mnemonic::from_phrase(TEST_MNEMONIC).unwrap();
        let key = derive_secp256k1_key(&mnemonic, &DerivationConfig::default()).unwrap();

        assert_eq!(key.to_hex(), TEST_KEY);
        let info = key.derivation_info().unwrap();
        assert_eq!(info.path, DEFAULT_DERIVATION_PATH_SECP256K1);
        assert_eq!(info.account_index, 0);
    }

    #[test]
    fn test_bip32_test_vector_1() {
        // BIP-32 test vector 1, chain m/0'/1/2'/2/1000000000
        let seed = hex::decode("000102030405060708090a0b0c0d0e0f").unwrap();

        let master = derive_from_seed(&seed, &DerivationPath::parse("m/0'").unwrap()).unwrap();
        assert_eq!(
            hex::encode(master.as_slice()),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );

        let path = DerivationPath::parse("m/0'/1/2'/2/1000000000").unwrap();
        let leaf: Zeroizing<[u8; 32]> = derive_from_seed(&seed, &path).unwrap();
        assert_eq!(
            hex::encode(leaf.as_slice()),
            "471b76e389e528d6de6d816857e012c5455051cad6660850e58372a6c3e6e7c8"
        );
    }

    #[test]
    fn test_deterministic_derivation() {
        let m1 = Mnemonic::from_phrase(TEST_MNEMONIC).unwrap();
        let m2 = Mnemonic::from_phrase(TEST_MNEMONIC).unwrap();
        let config = DerivationConfig::default();

        let k1 = derive_secp256k1_key(&m1, &config).unwrap();
        let k2 = derive_secp256k1_key(&m2, &config).unwrap();
        assert_eq!(k1, k2);
    }

    #[test]
    fn test_different_accounts_different_keys() {
        let mnemonic = Mnemonic::from_phrase(TEST_MNEMONIC).unwrap();

        let k0 = derive_secp256k1_key(&mnemonic, &DerivationConfig::new(0)).unwrap();
        let k1 = derive_secp256k1_key(&mnemonic, &DerivationConfig::new(1)).unwrap();
        assert_ne!(k0, k1);
        assert_eq!(k1.derivation_info().unwrap().path, "m/44'/60'/1'/0/0");
    }

    #[test]
    fn test_passphrase_changes_keys() {
        let mnemonic = Mnemonic::from_phrase(TEST_MNEMONIC).unwrap();

        let plain = derive_secp256k1_key(&mnemonic, &DerivationConfig::new(0)).unwrap();
        let with_pass = derive_secp256k1_key(
            &mnemonic,
            &DerivationConfig::new(0).with_passphrase("test-passphrase"),
        )
        .unwrap();
        assert_ne!(plain, with_pass);
    }

    #[test]
    fn test_parse_derivation_path() {
        let path = DerivationPath::parse("m/44'/60'/0'/0/0").unwrap();
        assert_eq!(
            path.components(),
            &[
                ChildIndex::Hardened(44),
                ChildIndex::Hardened(60),
                ChildIndex::Hardened(0),
                ChildIndex::Normal(0),
                ChildIndex::Normal(0),
            ]
        );

        let alt = DerivationPath::parse("m/44h/60H/0'/0/0").unwrap();
        assert_eq!(alt, path);
    }

    #[test]
    fn test_invalid_path() {
        // Must start with m
        assert!(DerivationPath::parse("44'/60'/0'/0/0").is_err());
        // Invalid component
        assert!(DerivationPath::parse("m/abc/0").is_err());
        // Empty component
        assert!(DerivationPath::parse("m/44'//0").is_err());
        // No components
        assert!(DerivationPath::parse("m").is_err());
        // Index already in the hardened range
        assert!(DerivationPath::parse("m/2147483648").is_err());
    }

    #[test]
    fn test_derivation_config_path() {
        assert_eq!(DerivationConfig::new(5).path(), "m/44'/60'/5'/0/0");
        assert_eq!(
            DerivationConfig::default().path(),
            DEFAULT_DERIVATION_PATH_SECP256K1
        );
    }
}
