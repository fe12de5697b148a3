//! Key generation command implementation
//!
//! Produces key material from a new or supplied mnemonic, seals it under the
//! chosen cost profile and writes it into the keystore directory.

use super::common::{display_mnemonic, get_passphrase, read_mnemonic_from_file};
use super::GenerateArgs;
use anyhow::{Context, Result};
use safekeystore_crypto::{KeyMaterialProvider, KeystoreDir};
use secrecy::ExposeSecret;
use std::time::Instant;
use tracing::info;

/// Execute the generate command
pub fn execute(args: GenerateArgs) -> Result<()> {
    let provider = KeyMaterialProvider::new();

    let material = match &args.mnemonic_file {
        Some(file) => {
            let phrase = read_mnemonic_from_file(file)?;
            provider
                .from_mnemonic(phrase.expose_secret())
                .context("Invalid mnemonic")?
        }
        None => {
            let generated = provider.generate().context("Failed to generate key")?;
            if args.show_mnemonic {
                display_mnemonic(generated.mnemonic.phrase());
            }
            generated.material
        }
    };

    let passphrase = get_passphrase(
        args.passphrase_file.as_deref(),
        "Enter passphrase for keystore encryption: ",
        args.passphrase_file.is_none(), // Only confirm if prompting
    )?;

    let dir = KeystoreDir::new(&args.dir).with_context(|| {
        format!("Failed to open keystore directory: {}", args.dir.display())
    })?;

    info!(profile = %args.profile, "sealing key");
    let started = Instant::now();
    let path = dir
        .store(&material, passphrase.expose_secret(), &args.profile)
        .context("Failed to store keystore")?;
    let elapsed = started.elapsed();

    println!("Address:  0x{}", material.identifier());
    println!("Keystore: {}", path.display());
    println!("Sealed in {:.2?} ({} profile)", elapsed, args.profile);

    Ok(())
}
