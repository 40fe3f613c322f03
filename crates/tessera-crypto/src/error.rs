use thiserror::Error;

#[derive(Debug, Error)]
pub enum CryptoError {
    #[error("Invalid key length: expected {expected} bytes, got {got}")]
    InvalidKeyLength { expected: usize, got: usize },

    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(base64ct::Error),

    #[error("Invalid nonce length: expected {expected} bytes, got {got}")]
    InvalidNonceLength { expected: usize, got: usize },

    #[error("Input of {len} bytes is not a positive multiple of the {block}-byte block size")]
    MisalignedInput { len: usize, block: usize },

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed")]
    DecryptionFailed,

    #[error("Message authentication failed")]
    VerificationFailed,

    #[error("Random number generation failed: {0}")]
    RngFailed(String),
}
