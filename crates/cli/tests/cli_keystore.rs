//! CLI integration tests for `safekeystore generate`, `inspect` and `verify`.
//!
//! These tests recover a known key from a mnemonic file, seal it into a
//! temporary directory and read it back through the other subcommands.

#![allow(deprecated)] // Command::cargo_bin is deprecated but still works

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const WORDS: &str = "inflict race essay know royal crew deer seed sign evolve sure heart";

fn safekeystore() -> Command {
    let mut cmd = Command::cargo_bin("safekeystore").unwrap();
    cmd.env_remove("SAFEKEYSTORE_DIR")
        .env_remove("SAFEKEYSTORE_PROFILE")
        .env_remove("RUST_LOG");
    cmd
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

/// Run `generate` from the known mnemonic and return the single keystore file
fn generate_known_key(temp_dir: &TempDir, passphrase: &str) -> PathBuf {
    let mnemonic = write(temp_dir.path(), "mnemonic.txt", WORDS);
    let passphrase = write(temp_dir.path(), "passphrase.txt", passphrase);
    let wallets = temp_dir.path().join("wallets");

    safekeystore()
        .args(["generate", "--dir"])
        .arg(&wallets)
        .arg("--mnemonic-file")
        .arg(&mnemonic)
        .arg("--passphrase-file")
        .arg(&passphrase)
        .assert()
        .success()
        .stdout(predicate::str::contains("Keystore:"))
        .stdout(predicate::str::contains("Address:  0x"));

    let files: Vec<PathBuf> = std::fs::read_dir(&wallets)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    files.into_iter().next().unwrap()
}

#[test]
fn test_generate_inspect_verify() {
    let temp_dir = TempDir::new().unwrap();
    let keystore = generate_known_key(&temp_dir, "cantami.o.diva.del.pelide\n");

    let name = keystore.file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("UTC--"));
    let address = name.rsplit("--").next().unwrap().to_string();

    let output = safekeystore()
        .args(["inspect", "--format", "json"])
        .arg(&keystore)
        .output()
        .unwrap();
    assert!(output.status.success());
    let info: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(info["address"], address.as_str());
    assert_eq!(info["cipher"], "aes-128-ctr");
    assert_eq!(info["kdf"]["n"], 262144);
    assert_eq!(info["version"], 3);

    let good = write(temp_dir.path(), "good.txt", "cantami.o.diva.del.pelide\n");
    safekeystore()
        .arg("verify")
        .arg(&keystore)
        .arg("--passphrase-file")
        .arg(&good)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("0x{}", address)));
}

#[test]
fn test_verify_wrong_passphrase() {
    let temp_dir = TempDir::new().unwrap();
    let keystore = generate_known_key(&temp_dir, "right");

    let bad = write(temp_dir.path(), "bad.txt", "wrong");
    safekeystore()
        .arg("verify")
        .arg(&keystore)
        .arg("--passphrase-file")
        .arg(&bad)
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "invalid passphrase or corrupt keystore",
        ));
}

#[test]
fn test_verify_rejects_oversized_kdf_cost() {
    let temp_dir = TempDir::new().unwrap();
    let keystore = generate_known_key(&temp_dir, "pw");

    let mut json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&keystore).unwrap()).unwrap();
    json["crypto"]["kdfparams"]["n"] = 2147483648u64.into();
    let crafted = write(temp_dir.path(), "crafted.json", &json.to_string());
    let passphrase = write(temp_dir.path(), "pw.txt", "pw");

    safekeystore()
        .arg("verify")
        .arg(&crafted)
        .arg("--passphrase-file")
        .arg(&passphrase)
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("invalid KDF parameters"));
}

#[test]
fn test_generate_rejects_altered_mnemonic() {
    let temp_dir = TempDir::new().unwrap();
    let mnemonic = write(
        temp_dir.path(),
        "mnemonic.txt",
        &WORDS.replace("heart", "accident"),
    );
    let passphrase = write(temp_dir.path(), "passphrase.txt", "pw");

    safekeystore()
        .arg("generate")
        .arg("--dir")
        .arg(temp_dir.path().join("wallets"))
        .arg("--mnemonic-file")
        .arg(&mnemonic)
        .arg("--passphrase-file")
        .arg(&passphrase)
        .assert()
        .failure()
        .stderr(predicate::str::contains("checksum"));
}

#[test]
fn test_inspect_rejects_empty_file() {
    let temp_dir = TempDir::new().unwrap();
    let empty = write(temp_dir.path(), "empty.json", "");

    safekeystore()
        .arg("inspect")
        .arg(&empty)
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed keystore"));
}

#[test]
fn test_unknown_profile_from_env() {
    let temp_dir = TempDir::new().unwrap();

    safekeystore()
        .env("SAFEKEYSTORE_PROFILE", "paranoid")
        .arg("generate")
        .arg("--dir")
        .arg(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown profile"));
}
