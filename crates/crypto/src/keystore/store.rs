//! Directory-backed container storage
//!
//! Containers are written to a temporary file in the target directory and
//! then renamed into place without replacing an existing file, so a reader
//! never observes a half-written container.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use alloy_primitives::Address;
use chrono::{DateTime, TimeDelta, Utc};
use tracing::{debug, info};

use super::container::EncryptedContainer;
use super::error::{OpenResult, SealResult};
use super::profile::CostProfile;
use crate::secure::RawKeyMaterial;

const TEMP_PREFIX: &str = ".tmp-";

/// A directory of sealed key files
#[derive(Debug)]
pub struct KeystoreDir {
    path: PathBuf,
    /// Held while writing; remembers the last timestamp handed out
    last_created: Mutex<Option<DateTime<Utc>>>,
}

impl KeystoreDir {
    /// Open `path`, creating it with owner-only permissions if missing
    pub fn new(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            fs::create_dir_all(path)?;

            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(path, fs::Permissions::from_mode(0o700))?;
            }
            debug!(dir = %path.display(), "created keystore directory");
        }

        Ok(Self {
            path: path.to_path_buf(),
            last_created: Mutex::new(None),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Seal `raw` and persist it. Returns the path of the new file.
    pub fn store(
        &self,
        raw: &RawKeyMaterial,
        passphrase: &str,
        profile: &CostProfile,
    ) -> SealResult<PathBuf> {
        let container = EncryptedContainer::seal(raw, passphrase, profile)?;
        self.persist(&container)
    }

    /// `store` with the `Standard` profile
    pub fn store_standard(&self, raw: &RawKeyMaterial, passphrase: &str) -> SealResult<PathBuf> {
        self.store(raw, passphrase, &CostProfile::standard())
    }

    /// `store` with the `Strong` profile
    pub fn store_strong(&self, raw: &RawKeyMaterial, passphrase: &str) -> SealResult<PathBuf> {
        self.store(raw, passphrase, &CostProfile::strong())
    }

    /// Atomically write an already sealed container.
    ///
    /// Fails with `AlreadyExists` rather than replacing a file of the same name.
    pub fn persist(&self, container: &EncryptedContainer) -> SealResult<PathBuf> {
        let bytes = container.serialize()?;

        let mut last_created = self
            .last_created
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        // Timestamps are strictly increasing so names never collide in-process
        let mut created = Utc::now();
        if let Some(last) = *last_created {
            if created <= last {
                created = last + TimeDelta::nanoseconds(1);
            }
        }
        let target = self
            .path
            .join(key_file_name(created, &container.address()));

        let mut tmp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .tempfile_in(&self.path)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            tmp.as_file()
                .set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        // On error the temporary file is removed when `PersistError` drops
        tmp.persist_noclobber(&target).map_err(|e| e.error)?;
        *last_created = Some(created);

        info!(
            address = %container.address_hex(),
            file = %target.display(),
            "stored encrypted key"
        );
        Ok(target)
    }

    /// Read and parse a container file
    pub fn load(&self, path: impl AsRef<Path>) -> OpenResult<EncryptedContainer> {
        load_container(path)
    }

    /// Files in this directory whose name ends with `address`, oldest first
    pub fn find(&self, address: &Address) -> OpenResult<Vec<PathBuf>> {
        let suffix = format!("--{}", hex::encode(address));
        let mut found = Vec::new();

        for entry in fs::read_dir(&self.path)? {
            let path = entry?.path();
            let matches = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| !name.starts_with(TEMP_PREFIX) && name.ends_with(&suffix));

            if matches && path.is_file() {
                found.push(path);
            }
        }

        // The timestamp prefix sorts chronologically
        found.sort();
        Ok(found)
    }
}

/// Read and parse a container file at any path
pub fn load_container(path: impl AsRef<Path>) -> OpenResult<EncryptedContainer> {
    let bytes = fs::read(path)?;
    Ok(EncryptedContainer::deserialize(&bytes)?)
}

/// `UTC--2024-01-02T03-04-05.000000006Z--<address>`
pub fn key_file_name(created: DateTime<Utc>, address: &Address) -> String {
    format!(
        "UTC--{}--{}",
        created.format("%Y-%m-%dT%H-%M-%S%.9fZ"),
        hex::encode(address)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keystore::error::{OpenError, SealError};
    use crate::keystore::profile::{CipherId, MIN_SCRYPT_N};
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn cheap_profile() -> CostProfile {
        CostProfile::custom(CipherId::Aes128Ctr, MIN_SCRYPT_N, 1).unwrap()
    }

    fn test_key() -> RawKeyMaterial {
        RawKeyMaterial::from_hex(
            "2e24e7d81dfa3cdfed65e8c0d98cc97fc6524d9eb2c61cae7a23ee9ecafa0c47",
        )
        .unwrap()
    }

    #[test]
    fn test_key_file_name() {
        let created = Utc
            .with_ymd_and_hms(2024, 1, 2, 3, 4, 5)
            .unwrap()
            .checked_add_signed(TimeDelta::nanoseconds(6))
            .unwrap();
        let address = test_key().address().unwrap();

        assert_eq!(
            key_file_name(created, &address),
            format!(
                "UTC--2024-01-02T03-04-05.000000006Z--{}",
                hex::encode(address)
            )
        );
    }

    #[test]
    fn test_store_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let dir = KeystoreDir::new(temp_dir.path()).unwrap();
        let raw = test_key();

        let path = dir.store(&raw, "file-test", &cheap_profile()).unwrap();
        assert!(path.starts_with(temp_dir.path()));

        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("UTC--"));
        assert!(name.ends_with(&raw.identifier()));

        let container = dir.load(&path).unwrap();
        assert_eq!(container.open("file-test").unwrap(), raw);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let temp_dir = TempDir::new().unwrap();
        let dir = KeystoreDir::new(temp_dir.path()).unwrap();
        dir.store(&test_key(), "pw", &cheap_profile()).unwrap();

        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(!entries[0].starts_with(TEMP_PREFIX));
    }

    #[test]
    fn test_persist_does_not_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let dir = KeystoreDir::new(temp_dir.path()).unwrap();
        let container = EncryptedContainer::seal(&test_key(), "pw", &cheap_profile()).unwrap();

        // Pin the clock ahead of now so the next name is known in advance
        let pinned = Utc.with_ymd_and_hms(2999, 1, 1, 0, 0, 0).unwrap();
        *dir.last_created.lock().unwrap() = Some(pinned);
        let taken = temp_dir.path().join(key_file_name(
            pinned + TimeDelta::nanoseconds(1),
            &container.address(),
        ));
        fs::write(&taken, b"existing key file").unwrap();

        let result = dir.persist(&container);
        assert!(
            matches!(&result, Err(SealError::Io(e)) if e.kind() == std::io::ErrorKind::AlreadyExists),
            "unexpected result: {:?}",
            result
        );
        assert_eq!(fs::read(&taken).unwrap(), b"existing key file");

        // The failed write leaves no temporary file and does not advance the clock
        let entries: Vec<_> = fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(entries, vec![taken]);
        assert_eq!(*dir.last_created.lock().unwrap(), Some(pinned));
    }

    #[test]
    fn test_store_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let dir = KeystoreDir::new(temp_dir.path().join("keys")).unwrap();
        fs::remove_dir(dir.path()).unwrap();

        let result = dir.store(&test_key(), "pw", &cheap_profile());
        assert!(matches!(result, Err(SealError::Io(_))));
    }

    #[test]
    fn test_find_by_address() {
        let temp_dir = TempDir::new().unwrap();
        let dir = KeystoreDir::new(temp_dir.path()).unwrap();
        let raw = test_key();
        let address = raw.address().unwrap();

        assert!(dir.find(&address).unwrap().is_empty());

        let first = dir.store(&raw, "pw", &cheap_profile()).unwrap();
        let second = dir.store(&raw, "pw", &cheap_profile()).unwrap();
        fs::write(temp_dir.path().join("unrelated.json"), b"{}").unwrap();

        let found = dir.find(&address).unwrap();
        assert_eq!(found, vec![first, second]);
    }

    #[test]
    fn test_load_empty_file_fails() {
        let temp_dir = TempDir::new().unwrap();
        let dir = KeystoreDir::new(temp_dir.path()).unwrap();
        let path = temp_dir.path().join("empty");
        fs::write(&path, b"").unwrap();

        assert!(matches!(dir.load(&path), Err(OpenError::Format(_))));
        assert!(matches!(
            dir.load(temp_dir.path().join("missing")),
            Err(OpenError::Io(_))
        ));
    }

    #[test]
    #[cfg(unix)]
    fn test_file_and_directory_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let keys = temp_dir.path().join("keys");
        let dir = KeystoreDir::new(&keys).unwrap();
        let path = dir.store(&test_key(), "pw", &cheap_profile()).unwrap();

        let file_mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(file_mode & 0o777, 0o600);

        let dir_mode = fs::metadata(&keys).unwrap().permissions().mode();
        assert_eq!(dir_mode & 0o777, 0o700);
    }

    #[test]
    fn test_concurrent_stores() {
        let temp_dir = TempDir::new().unwrap();
        let dir = KeystoreDir::new(temp_dir.path()).unwrap();

        let paths: Vec<PathBuf> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| dir.store(&test_key(), "pw", &cheap_profile()).unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
        for path in paths {
            assert!(dir.load(&path).unwrap().open("pw").is_ok());
        }
    }
}
