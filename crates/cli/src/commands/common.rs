//! Passphrase and mnemonic input helpers

use anyhow::{bail, Context, Result};
use secrecy::{ExposeSecret, SecretString};
use std::fs;
use std::path::Path;
use tracing::warn;
use zeroize::Zeroizing;

/// Read passphrase from file or prompt interactively
pub fn get_passphrase(
    passphrase_file: Option<&Path>,
    prompt: &str,
    confirm: bool,
) -> Result<SecretString> {
    let passphrase = match passphrase_file {
        Some(file) => read_passphrase_from_file(file)?,
        None => prompt_passphrase(prompt, confirm)?,
    };

    if passphrase.expose_secret().is_empty() {
        warn!("using an empty passphrase");
    }
    Ok(passphrase)
}

/// Read passphrase from a file. Only the final line ending is stripped, so an
/// empty file yields the empty passphrase.
pub fn read_passphrase_from_file(path: &Path) -> Result<SecretString> {
    let content = Zeroizing::new(
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read passphrase file: {}", path.display()))?,
    );

    Ok(SecretString::from(strip_line_ending(&content)))
}

/// Prompt for passphrase with optional confirmation
pub fn prompt_passphrase(prompt: &str, confirm: bool) -> Result<SecretString> {
    let passphrase = Zeroizing::new(
        rpassword::prompt_password(prompt).context("Failed to read passphrase")?,
    );

    if confirm {
        let confirmation = Zeroizing::new(
            rpassword::prompt_password("Confirm passphrase: ")
                .context("Failed to read passphrase confirmation")?,
        );

        if *passphrase != *confirmation {
            bail!("Passphrases do not match");
        }
    }

    Ok(SecretString::from(passphrase.as_str()))
}

/// Read a mnemonic phrase from a file
pub fn read_mnemonic_from_file(path: &Path) -> Result<SecretString> {
    let content = Zeroizing::new(
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read mnemonic file: {}", path.display()))?,
    );

    let mnemonic = content.trim();
    if mnemonic.is_empty() {
        bail!("Mnemonic file is empty");
    }

    Ok(SecretString::from(mnemonic))
}

fn strip_line_ending(s: &str) -> &str {
    s.strip_suffix("\r\n")
        .or_else(|| s.strip_suffix('\n'))
        .unwrap_or(s)
}

/// Print the mnemonic in numbered groups of four words
pub fn display_mnemonic(mnemonic: &str) {
    println!();
    println!("Mnemonic recovery phrase (shown once, store it offline):");
    println!();

    let words: Vec<&str> = mnemonic.split_whitespace().collect();
    for (i, chunk) in words.chunks(4).enumerate() {
        let formatted: Vec<String> = chunk
            .iter()
            .enumerate()
            .map(|(j, word)| format!("{:2}. {:<12}", i * 4 + j + 1, word))
            .collect();
        println!("  {}", formatted.join("  "));
    }
    println!();
}
