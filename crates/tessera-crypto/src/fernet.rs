//! Fernet v1 keys: AES-128-CBC encryption with an HMAC-SHA256 tag.
//!
//! Key format: [16 bytes: signing key][16 bytes: encryption key]
//! The cipher runs without internal padding; callers pad to the block size
//! before `encrypt` and unpad after `decrypt`.

use std::fmt;

use aes::Aes128;
use cbc::cipher::block_padding::NoPadding;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CryptoError;
use crate::primitive::{check_nonce, split_tag, KeyMaterial, KeyPrimitive};
use crate::types::{
    Layout, AES_BLOCK_SIZE, FERNET_HALF_LENGTH, FERNET_HMAC_LENGTH, FERNET_KEY_LENGTH,
    FERNET_VERSION,
};

type HmacSha256 = Hmac<Sha256>;
type Aes128CbcEnc = cbc::Encryptor<Aes128>;
type Aes128CbcDec = cbc::Decryptor<Aes128>;

/// A Fernet key: signing half and encryption half.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct FernetKey {
    signing_key: [u8; FERNET_HALF_LENGTH],
    encryption_key: [u8; FERNET_HALF_LENGTH],
}

impl FernetKey {
    /// Create a key from 32 bytes: signing half first, encryption half second.
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        if key.len() != FERNET_KEY_LENGTH {
            return Err(CryptoError::InvalidKeyLength {
                expected: FERNET_KEY_LENGTH,
                got: key.len(),
            });
        }
        let mut signing_key = [0u8; FERNET_HALF_LENGTH];
        let mut encryption_key = [0u8; FERNET_HALF_LENGTH];
        signing_key.copy_from_slice(&key[..FERNET_HALF_LENGTH]);
        encryption_key.copy_from_slice(&key[FERNET_HALF_LENGTH..]);
        Ok(Self {
            signing_key,
            encryption_key,
        })
    }

    fn mac(&self) -> HmacSha256 {
        <HmacSha256 as Mac>::new_from_slice(&self.signing_key)
            .expect("HMAC accepts keys of any length")
    }
}

fn check_aligned(data: &[u8]) -> Result<(), CryptoError> {
    if data.is_empty() || data.len() % AES_BLOCK_SIZE != 0 {
        return Err(CryptoError::MisalignedInput {
            len: data.len(),
            block: AES_BLOCK_SIZE,
        });
    }
    Ok(())
}

impl KeyPrimitive for FernetKey {
    fn layout(&self) -> Layout {
        Layout {
            version: Some(FERNET_VERSION),
            nonce_len: AES_BLOCK_SIZE,
            min_ciphertext_len: AES_BLOCK_SIZE,
            tag_len: FERNET_HMAC_LENGTH,
            block_size: Some(AES_BLOCK_SIZE),
        }
    }

    fn encrypt(&self, plaintext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_nonce(nonce, AES_BLOCK_SIZE)?;
        check_aligned(plaintext)?;

        let cipher = Aes128CbcEnc::new_from_slices(&self.encryption_key, nonce)
            .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;
        Ok(cipher.encrypt_padded_vec_mut::<NoPadding>(plaintext))
    }

    fn decrypt(&self, ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, CryptoError> {
        check_nonce(nonce, AES_BLOCK_SIZE)?;
        check_aligned(ciphertext)?;

        let cipher = Aes128CbcDec::new_from_slices(&self.encryption_key, nonce)
            .map_err(|_| CryptoError::DecryptionFailed)?;
        cipher
            .decrypt_padded_vec_mut::<NoPadding>(ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }

    fn authenticate(&self, message: &[u8]) -> Vec<u8> {
        let mut mac = self.mac();
        mac.update(message);
        let digest = mac.finalize().into_bytes();

        let mut out = Vec::with_capacity(message.len() + FERNET_HMAC_LENGTH);
        out.extend_from_slice(message);
        out.extend_from_slice(&digest);
        out
    }

    fn verify<'a>(&self, authenticated: &'a [u8]) -> Result<&'a [u8], CryptoError> {
        let (message, tag) = split_tag(authenticated, FERNET_HMAC_LENGTH)?;
        let mut mac = self.mac();
        mac.update(message);
        mac.verify_slice(tag)
            .map_err(|_| CryptoError::VerificationFailed)?;
        Ok(message)
    }
}

impl KeyMaterial for FernetKey {
    const LENGTH: usize = FERNET_KEY_LENGTH;

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::new(bytes)
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(FERNET_KEY_LENGTH);
        bytes.extend_from_slice(&self.signing_key);
        bytes.extend_from_slice(&self.encryption_key);
        bytes
    }
}

impl fmt::Debug for FernetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FernetKey")
            .field("algorithm", &"AES-128-CBC/HMAC-SHA256")
            .finish_non_exhaustive()
    }
}
