/// Secretbox (XSalsa20-Poly1305) key length in bytes.
pub const SECRETBOX_KEY_LENGTH: usize = 32;

/// Secretbox nonce length in bytes (192 bits, safe to draw at random).
pub const SECRETBOX_NONCE_LENGTH: usize = 24;

/// Poly1305 tag length prepended to every secretbox ciphertext.
pub const SECRETBOX_MAC_LENGTH: usize = 16;

/// HMAC-SHA512-256 tag length appended by `SecretboxKey::authenticate`.
pub const SECRETBOX_AUTH_LENGTH: usize = 32;

/// Fernet key length: 16-byte signing half followed by 16-byte encryption half.
pub const FERNET_KEY_LENGTH: usize = 32;

/// Length of each Fernet key half.
pub const FERNET_HALF_LENGTH: usize = 16;

/// Leading version byte of Fernet v1 tokens.
pub const FERNET_VERSION: u8 = 0x80;

/// AES block size, which is also the Fernet IV length.
pub const AES_BLOCK_SIZE: usize = 16;

/// HMAC-SHA256 tag length appended by `FernetKey::authenticate`.
pub const FERNET_HMAC_LENGTH: usize = 32;

/// Byte layout a key primitive imposes on tokens built with it.
///
/// Format: `[version?][timestamp:8][nonce][ciphertext][tag]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    /// Leading version byte, if the format carries one.
    pub version: Option<u8>,
    /// Nonce (or IV) length.
    pub nonce_len: usize,
    /// Shortest ciphertext `encrypt` can produce.
    pub min_ciphertext_len: usize,
    /// Authentication tag length appended by `authenticate`.
    pub tag_len: usize,
    /// Plaintext block size for primitives without a native AEAD tag.
    pub block_size: Option<usize>,
}

impl Layout {
    /// Length of the version header (0 or 1 byte).
    pub fn header_len(&self) -> usize {
        usize::from(self.version.is_some())
    }

    /// Offset of the nonce, right after the header and the 8-byte timestamp.
    pub fn nonce_offset(&self) -> usize {
        self.header_len() + 8
    }

    /// Offset of the ciphertext.
    pub fn ciphertext_offset(&self) -> usize {
        self.nonce_offset() + self.nonce_len
    }

    /// Shortest well-formed token, in raw bytes.
    pub fn min_token_len(&self) -> usize {
        self.ciphertext_offset() + self.min_ciphertext_len + self.tag_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn secretbox_minimum_is_80_bytes() {
        let layout = Layout {
            version: None,
            nonce_len: SECRETBOX_NONCE_LENGTH,
            min_ciphertext_len: SECRETBOX_MAC_LENGTH,
            tag_len: SECRETBOX_AUTH_LENGTH,
            block_size: None,
        };
        assert_eq!(layout.nonce_offset(), 8);
        assert_eq!(layout.ciphertext_offset(), 32);
        assert_eq!(layout.min_token_len(), 80);
    }

    #[test]
    fn fernet_minimum_is_73_bytes() {
        let layout = Layout {
            version: Some(FERNET_VERSION),
            nonce_len: AES_BLOCK_SIZE,
            min_ciphertext_len: AES_BLOCK_SIZE,
            tag_len: FERNET_HMAC_LENGTH,
            block_size: Some(AES_BLOCK_SIZE),
        };
        assert_eq!(layout.header_len(), 1);
        assert_eq!(layout.ciphertext_offset(), 25);
        assert_eq!(layout.min_token_len(), 73);
    }
}
