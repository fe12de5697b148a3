//! Subcommands
//!
//! - `generate`: create (or recover from a mnemonic) a key and seal it to disk
//! - `inspect`: print the public fields of a keystore file
//! - `verify`: open a keystore file with its passphrase
//!
//! Passphrases are read from a file or from the terminal without echo.

pub mod common;
pub mod generate;
pub mod inspect;
pub mod verify;

use anyhow::Result;
use clap::{Args, Subcommand};
use safekeystore_crypto::CostProfile;
use std::path::PathBuf;

/// Environment variable overriding the keystore directory
pub const SAFEKEYSTORE_DIR_ENV: &str = "SAFEKEYSTORE_DIR";

/// Environment variable overriding the cost profile
pub const SAFEKEYSTORE_PROFILE_ENV: &str = "SAFEKEYSTORE_PROFILE";

/// Default keystore directory, relative to the working directory
pub const DEFAULT_KEYSTORE_DIR: &str = "./wallets";

#[derive(Subcommand)]
pub enum Command {
    /// Generate a key and seal it into a new keystore file
    ///
    /// Creates a fresh 12-word BIP-39 mnemonic (or reads an existing one),
    /// derives the key at m/44'/60'/0'/0/0 and writes it encrypted under a
    /// passphrase.
    Generate(GenerateArgs),

    /// Print the public fields of a keystore file without decrypting it
    Inspect(InspectArgs),

    /// Decrypt a keystore file and print the address of the recovered key
    Verify(VerifyArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Directory the keystore file is written to
    #[arg(long, env = SAFEKEYSTORE_DIR_ENV, default_value = DEFAULT_KEYSTORE_DIR)]
    pub dir: PathBuf,

    /// Cost profile (standard|strong)
    #[arg(long, env = SAFEKEYSTORE_PROFILE_ENV, default_value = "standard")]
    pub profile: CostProfile,

    /// Recover from the mnemonic in this file instead of generating one
    #[arg(long)]
    pub mnemonic_file: Option<PathBuf>,

    /// Read passphrase from file instead of prompting
    #[arg(long)]
    pub passphrase_file: Option<PathBuf>,

    /// Print the generated mnemonic so it can be recorded
    #[arg(long)]
    pub show_mnemonic: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Keystore file
    pub file: PathBuf,

    /// Output format (text, json)
    #[arg(long, default_value = "text")]
    pub format: String,
}

#[derive(Args)]
pub struct VerifyArgs {
    /// Keystore file
    pub file: PathBuf,

    /// Read passphrase from file instead of prompting
    #[arg(long)]
    pub passphrase_file: Option<PathBuf>,
}

/// Run a subcommand
pub fn execute(command: Command) -> Result<()> {
    match command {
        Command::Generate(args) => generate::execute(args),
        Command::Inspect(args) => inspect::execute(&args.file, &args.format),
        Command::Verify(args) => verify::execute(&args.file, args.passphrase_file.as_deref()),
    }
}
