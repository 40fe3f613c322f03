//! Cryptographically secure random bytes.
//!
//! Nonces and key material come from a `RandomSource`. Failure is never
//! retried or papered over: a token built with weak randomness would break
//! nonce uniqueness.

use crate::error::CryptoError;

/// A source of cryptographically secure random bytes.
pub trait RandomSource: Send + Sync {
    /// Fill `buf` entirely with random bytes.
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError>;
}

/// Operating system CSPRNG via `getrandom`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        getrandom::getrandom(buf).map_err(|e| CryptoError::RngFailed(e.to_string()))
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &R {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        (**self).fill(buf)
    }
}

/// Draw `len` random bytes into a fresh vector.
pub fn random_bytes(source: &dyn RandomSource, len: usize) -> Result<Vec<u8>, CryptoError> {
    let mut bytes = vec![0u8; len];
    source.fill(&mut bytes)?;
    Ok(bytes)
}
