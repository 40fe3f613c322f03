#![allow(dead_code)]

use tessera::{CryptoError, RandomSource};

/// Fills every request with `0, 1, 2, ...`.
pub struct CountingRandom;

impl RandomSource for CountingRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        for (i, byte) in buf.iter_mut().enumerate() {
            *byte = i as u8;
        }
        Ok(())
    }
}

/// Hands out the same bytes for every request; lengths must match.
pub struct FixedRandom {
    bytes: Vec<u8>,
}

impl FixedRandom {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl RandomSource for FixedRandom {
    fn fill(&self, buf: &mut [u8]) -> Result<(), CryptoError> {
        let bytes = &self.bytes;
        if bytes.len() != buf.len() {
            return Err(CryptoError::RngFailed(format!(
                "fixed source holds {} bytes, {} requested",
                bytes.len(),
                buf.len()
            )));
        }
        buf.copy_from_slice(bytes);
        Ok(())
    }
}

pub fn counting(len: u8) -> Vec<u8> {
    (0..len).collect()
}
