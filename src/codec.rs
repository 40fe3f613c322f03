//! Token wire format and the ordered decode pipeline.
//!
//! Format: `base64url([version?][8 bytes: timestamp BE][nonce][ciphertext][tag])`
//!
//! The tag covers everything before it. Decoding runs these stages in order,
//! and the first failure is returned:
//! encoding, length, version, block alignment, authentication, freshness,
//! decryption, unpadding. No plaintext exists before authentication passes.
//!
//! Both functions are pure in their inputs; [`TokenManager`](crate::TokenManager)
//! supplies the clock, nonce and key ring.

use tessera_crypto::{base64url_decode, base64url_encode, KeyPrimitive};

use crate::error::{ConfigError, FormatError, TokenError};
use crate::freshness::{pack_time, unpack_time, FreshnessPolicy, TIMESTAMP_LENGTH};
use crate::keyring::KeySnapshot;
use crate::padding::{pad, unpad};

/// Build a token for `payload` issued at `now`. Deterministic for fixed inputs.
pub fn encode<K>(payload: &[u8], key: &K, now: u64, nonce: &[u8]) -> Result<String, ConfigError>
where
    K: KeyPrimitive + ?Sized,
{
    let layout = key.layout();

    let ciphertext = match layout.block_size {
        Some(block) => key.encrypt(&pad(payload, block), nonce),
        None => key.encrypt(payload, nonce),
    }
    .map_err(ConfigError::Encrypt)?;

    let mut prefix = Vec::with_capacity(layout.ciphertext_offset() + ciphertext.len());
    if let Some(version) = layout.version {
        prefix.push(version);
    }
    prefix.extend_from_slice(&pack_time(now));
    prefix.extend_from_slice(nonce);
    prefix.extend_from_slice(&ciphertext);

    Ok(base64url_encode(&key.authenticate(&prefix)))
}

/// Validate `token` against `keys` and `policy` at time `now`, returning the payload.
pub fn decode<K: KeyPrimitive>(
    token: &str,
    keys: &KeySnapshot<K>,
    policy: &FreshnessPolicy,
    now: u64,
) -> Result<Vec<u8>, TokenError> {
    let raw = base64url_decode(token).map_err(|_| TokenError::Encoding)?;
    let layout = keys.current().layout();

    let min = layout.min_token_len();
    if raw.len() < min {
        return Err(FormatError::TooShort {
            len: raw.len(),
            min,
        }
        .into());
    }

    if let Some(version) = layout.version {
        if raw[0] != version {
            return Err(FormatError::UnsupportedVersion(raw[0]).into());
        }
    }

    // Lengths only; nothing secret has been touched yet
    if let Some(block) = layout.block_size {
        let len = raw.len() - layout.ciphertext_offset() - layout.tag_len;
        if len % block != 0 {
            return Err(FormatError::MisalignedCiphertext { len, block }.into());
        }
    }

    let (key, message) = keys.verify(&raw)?;

    let time_bytes: [u8; TIMESTAMP_LENGTH] = message[layout.header_len()..layout.nonce_offset()]
        .try_into()
        .expect("timestamp slice is 8 bytes");
    policy.check(unpack_time(time_bytes), now)?;

    let nonce = &message[layout.nonce_offset()..layout.ciphertext_offset()];
    let ciphertext = &message[layout.ciphertext_offset()..];
    let plaintext = key
        .decrypt(ciphertext, nonce)
        .map_err(|_| TokenError::Authentication)?;

    match layout.block_size {
        Some(block) => Ok(unpad(&plaintext, block)?.to_vec()),
        None => Ok(plaintext),
    }
}
