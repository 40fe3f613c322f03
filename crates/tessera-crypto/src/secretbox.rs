//! XSalsa20-Poly1305 secretbox keys with an HMAC-SHA512-256 outer tag.
//!
//! Ciphertext format (NaCl-compatible): [16 bytes: Poly1305 tag][N bytes: ciphertext]
//! Authenticated message: [message][32 bytes: HMAC-SHA512 truncated to 256 bits]
//! One 32-byte secret keys both the cipher and the MAC.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha512;
use xsalsa20poly1305::aead::generic_array::GenericArray;
use xsalsa20poly1305::aead::{AeadInPlace, KeyInit};
use xsalsa20poly1305::XSalsa20Poly1305;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::primitive::{check_nonce, split_tag, KeyMaterial, KeyPrimitive};
use crate::types::{
    Layout, SECRETBOX_AUTH_LENGTH, SECRETBOX_KEY_LENGTH, SECRETBOX_MAC_LENGTH,
    SECRETBOX_NONCE_LENGTH,
};

type HmacSha512 = Hmac<Sha512>;

/// A 32-byte secretbox key.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SecretboxKey {
    bytes: [u8; SECRETBOX_KEY_LENGTH],
}

impl SecretboxKey {
    /// Create a key from exactly 32 bytes of key material.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let bytes: [u8; SECRETBOX_KEY_LENGTH] =
            key.try_into().map_err(|_| CryptoError::InvalidKeyLength {
                expected: SECRETBOX_KEY_LENGTH,
                got: key.len(),
            })?;
        Ok(Self { bytes })
    }

    fn cipher(&self) -> Result<XSalsa20Poly1305, CryptoError> {
        XSalsa20Poly1305::new_from_slice(&self.bytes)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
    }

    fn mac(&self) -> HmacSha512 {
        <HmacSha512 as Mac>::new_from_slice(&self.bytes)
            .expect("HMAC accepts keys of any length")
    }
}

impl KeyPrimitive for SecretboxKey {
    fn layout(&self) -> Layout {
        Layout {
            version: None,
            nonce_len: SECRETBOX_NONCE_LENGTH,
            min_ciphertext_len: SECRETBOX_MAC_LENGTH,
            tag_len: SECRETBOX_AUTH_LENGTH,
            block_size: None,
        }
    }

    fn encrypt(&self, plaintext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_nonce(nonce, SECRETBOX_NONCE_LENGTH)?;

        let mut sealed = Vec::with_capacity(SECRETBOX_MAC_LENGTH + plaintext.len());
        sealed.extend_from_slice(&[0u8; SECRETBOX_MAC_LENGTH]);
        sealed.extend_from_slice(plaintext);

        let tag = self
            .cipher()?
            .encrypt_in_place_detached(
                GenericArray::from_slice(nonce),
                b"",
                &mut sealed[SECRETBOX_MAC_LENGTH..],
            )
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        sealed[..SECRETBOX_MAC_LENGTH].copy_from_slice(&tag);
        Ok(sealed)
    }

    fn decrypt(&self, ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_nonce(nonce, SECRETBOX_NONCE_LENGTH)?;
        if ciphertext.len() < SECRETBOX_MAC_LENGTH {
            return Err(CryptoError::DecryptionFailed);
        }

        let (tag, body) = ciphertext.split_at(SECRETBOX_MAC_LENGTH);
        let mut plaintext = body.to_vec();
        let opened = self
            .cipher()
            .map_err(|_| CryptoError::DecryptionFailed)?
            .decrypt_in_place_detached(
                GenericArray::from_slice(nonce),
                b"",
                &mut plaintext,
                GenericArray::from_slice(tag),
            );
        if opened.is_err() {
            plaintext.zeroize();
            return Err(CryptoError::DecryptionFailed);
        }
        Ok(plaintext)
    }

    fn authenticate(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(message);
        let digest = mac.finalize().into_bytes();

        let mut out = Vec::with_capacity(message.len() + SECRETBOX_AUTH_LENGTH);
        out.extend_from_slice(message);
        out.extend_from_slice(&digest[..SECRETBOX_AUTH_LENGTH]);
        out
    }

    fn verify<'a>(&self, authenticated: &'a [u8]) -> Result<&'a [u8], CryptoError> {
        let (message, tag) = split_tag(authenticated, SECRETBOX_AUTH_LENGTH)?;
        let mut mac = self.mac();
        mac.update(message);
        mac.verify_truncated_left(tag)
            .map_err(|_| CryptoError::VerificationFailed)?;
        Ok(message)
    }
}

impl KeyMaterial for SecretboxKey {
    const LENGTH: usize = SECRETBOX_KEY_LENGTH;

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::new(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl fmt::Debug for SecretboxKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretboxKey")
            .field("algorithm", &"XSalsa20-Poly1305/HMAC-SHA512-256")
            .finish_non_exhaustive()
    }
}
