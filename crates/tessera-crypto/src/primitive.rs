//! The key primitive contract the token codec is written against.
//!
//! A primitive bundles one secret with an encryption scheme and a MAC. Two
//! implementations ship with this crate: [`SecretboxKey`](crate::SecretboxKey)
//! (XSalsa20-Poly1305 + HMAC-SHA512-256) and [`FernetKey`](crate::FernetKey)
//! (AES-128-CBC + HMAC-SHA256).

use crate::error::CryptoError;
use crate::random::RandomSource;
use crate::types::Layout;

/// Encryption and authentication under a single fixed-size secret.
///
/// Implementations must compare tags in constant time and must return raw
/// bytes from `encrypt`, never pre-encoded text.
pub trait KeyPrimitive: Send + Sync {
    /// Token layout this primitive produces.
    fn layout(&self) -> Layout;

    /// Encrypt `plaintext` under `nonce`.
    ///
    /// Block primitives require `plaintext` to be padded already.
    fn encrypt(&self, plaintext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Decrypt `ciphertext` under `nonce`.
    fn decrypt(&self, ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError>;

    /// Return `message || tag`.
    fn authenticate(&self, message: &[u8]) -> Vec<u8>;

    /// Check the trailing tag of `authenticated` and return the message part.
    fn verify<'a>(&self, authenticated: &'a [u8]) -> Result<&'a [u8], CryptoError>;
}

/// Key material with a textual form, used by key stores.
pub trait KeyMaterial: KeyPrimitive + Sized {
    /// Exact raw key length.
    const LENGTH: usize;

    /// Build from raw bytes. Wrong length is a configuration error.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError>;

    /// Raw key bytes. Handle with care.
    fn to_bytes(&self) -> Vec<u8>;

    /// Build from URL-safe base64 (padded or not).
    fn from_base64url(encoded: &str) -> Result<Self, CryptoError> {
        let mut bytes =
            crate::base64url::base64url_decode(encoded).map_err(CryptoError::InvalidKeyEncoding)?;
        let key = Self::from_bytes(&bytes);
        zeroize::Zeroize::zeroize(&mut bytes);
        key
    }

    /// URL-safe base64 without padding.
    fn to_base64url(&self) -> String {
        let mut bytes = self.to_bytes();
        let encoded = crate::base64url::base64url_encode(&bytes);
        zeroize::Zeroize::zeroize(&mut bytes);
        encoded
    }

    /// Generate a fresh key from `random`.
    fn generate(random: &dyn RandomSource) -> Result<Self, CryptoError> {
        let mut bytes = vec![0u8; Self::LENGTH];
        random.fill(&mut bytes)?;
        let key = Self::from_bytes(&bytes);
        zeroize::Zeroize::zeroize(&mut bytes);
        key
    }
}

impl<K: KeyPrimitive + ?Sized> KeyPrimitive for Box<K> {
    fn layout(&self) -> Layout {
        (**self).layout()
    }

    fn encrypt(&self, plaintext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError> {
        (**self).encrypt(plaintext, nonce)
    }

    fn decrypt(&self, ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError> {
        (**self).decrypt(ciphertext, nonce)
    }

    fn authenticate(&self, message: &[u8]) -> Vec<u8> {
        (**self).authenticate(message)
    }

    fn verify<'a>(&self, authenticated: &'a [u8]) -> Result<&'a [u8], CryptoError> {
        (**self).verify(authenticated)
    }
}

/// Split `authenticated` into `(message, tag)` with a `tag_len`-byte tag.
pub(crate) fn split_tag(authenticated: &[u8], tag_len: usize) -> Result<(&[u8], &[u8]), CryptoError> {
    if authenticated.len() < tag_len {
        return Err(CryptoError::VerificationFailed);
    }
    Ok(authenticated.split_at(authenticated.len() - tag_len))
}

/// Check a nonce length against what the primitive expects.
pub(crate) fn check_nonce(nonce: &[u8], expected: usize) -> Result<(), CryptoError> {
    if nonce.len() != expected {
        return Err(CryptoError::InvalidNonceLength {
            expected,
            got: nonce.len(),
        });
    }
    Ok(())
}
