//! Verify command: open a keystore and report the recovered address

use super::common::get_passphrase;
use anyhow::{Context, Result};
use safekeystore_crypto::keystore::load_container;
use secrecy::ExposeSecret;
use std::path::Path;
use std::time::Instant;
use tracing::debug;

/// Execute the verify command
pub fn execute(file: &Path, passphrase_file: Option<&Path>) -> Result<()> {
    let container = load_container(file)
        .with_context(|| format!("Failed to load keystore: {}", file.display()))?;

    let passphrase = get_passphrase(passphrase_file, "Enter keystore passphrase: ", false)?;

    let started = Instant::now();
    let material = container
        .open(passphrase.expose_secret())
        .context("Failed to open keystore")?;
    debug!(elapsed_ms = started.elapsed().as_millis() as u64, "keystore opened");

    println!("OK: keystore opens to address 0x{}", material.identifier());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use safekeystore_crypto::keystore::{CipherId, CostProfile, KeystoreDir, MIN_SCRYPT_N};
    use safekeystore_crypto::RawKeyMaterial;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_verify_passphrase() {
        let temp_dir = TempDir::new().unwrap();
        let dir = KeystoreDir::new(temp_dir.path().join("keys")).unwrap();
        let raw = RawKeyMaterial::from_hex(
            "2e24e7d81dfa3cdfed65e8c0d98cc97fc6524d9eb2c61cae7a23ee9ecafa0c47",
        )
        .unwrap();
        let profile = CostProfile::custom(CipherId::Aes256Ctr, MIN_SCRYPT_N, 1).unwrap();
        let path = dir.store(&raw, "right", &profile).unwrap();

        let good = temp_dir.path().join("good");
        let bad = temp_dir.path().join("bad");
        fs::write(&good, "right\n").unwrap();
        fs::write(&bad, "wrong\n").unwrap();

        assert!(execute(&path, Some(&good)).is_ok());

        let err = execute(&path, Some(&bad)).unwrap_err();
        assert!(format!("{:#}", err).contains("invalid passphrase or corrupt keystore"));
    }
}
