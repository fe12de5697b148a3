//! Inspect command: public container fields, no passphrase needed

use anyhow::{bail, Context, Result};
use safekeystore_crypto::keystore::load_container;
use serde_json::json;
use std::path::Path;

/// Execute the inspect command
pub fn execute(file: &Path, format: &str) -> Result<()> {
    let container = load_container(file)
        .with_context(|| format!("Failed to load keystore: {}", file.display()))?;
    let crypto = container.crypto();
    let kdf = &crypto.kdfparams;

    match format {
        "json" => {
            let info = json!({
                "address": container.address_hex(),
                "id": container.id().to_string(),
                "version": container.version(),
                "cipher": crypto.cipher.as_str(),
                "kdf": {
                    "n": kdf.n,
                    "r": kdf.r,
                    "p": kdf.p,
                    "dklen": kdf.dklen,
                },
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        "text" => {
            println!("Address: 0x{}", container.address_hex());
            println!("Id:      {}", container.id());
            println!("Version: {}", container.version());
            println!("Cipher:  {}", crypto.cipher);
            println!(
                "KDF:     scrypt (n={}, r={}, p={}, dklen={})",
                kdf.n, kdf.r, kdf.p, kdf.dklen
            );
        }
        other => bail!("Unknown output format: {} (expected text or json)", other),
    }

    Ok(())
}
