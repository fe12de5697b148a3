//! Fallible access to the operating system's random source

use rand::rngs::OsRng;
use rand::RngCore;
use thiserror::Error;

/// The random source could not produce bytes.
///
/// Fatal for the operation that needed them; never retried internally.
#[derive(Debug, Error)]
#[error("random source failure: {0}")]
pub struct EntropyError(String);

impl From<rand::Error> for EntropyError {
    fn from(err: rand::Error) -> Self {
        EntropyError(err.to_string())
    }
}

/// Fill `buf` from the OS CSPRNG
pub fn fill_random(buf: &mut [u8]) -> Result<(), EntropyError> {
    OsRng.try_fill_bytes(buf)?;
    Ok(())
}

/// Return `len` fresh random bytes from the OS CSPRNG
pub fn random_bytes(len: usize) -> Result<Vec<u8>, EntropyError> {
    let mut buf = vec![0u8; len];
    fill_random(&mut buf)?;
    Ok(buf)
}
