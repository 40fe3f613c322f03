use std::path::PathBuf;

use tessera_crypto::CryptoError;
use thiserror::Error;

/// Structural problems found before or after authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("Token too short: expected at least {min} bytes, got {len}")]
    TooShort { len: usize, min: usize },

    #[error("Unsupported token version: 0x{0:02x}")]
    UnsupportedVersion(u8),

    #[error("Ciphertext of {len} bytes is not a multiple of the {block}-byte block size")]
    MisalignedCiphertext { len: usize, block: usize },

    #[error("Invalid padding")]
    WrongPadding,
}

/// Timestamp outside the accepted window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FreshnessError {
    #[error("Token expired: issued {age}s ago, ttl is {ttl}s")]
    Expired { age: u64, ttl: u64 },

    #[error("Token issued {ahead}s in the future, max clock skew is {max_skew}s")]
    TooFarInFuture { ahead: u64, max_skew: u64 },
}

/// Why a token was rejected. Returned per call; never fatal to the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Invalid token encoding")]
    Encoding,

    #[error("Malformed token: {0}")]
    Format(#[from] FormatError),

    /// No key in the ring authenticated the token, or decryption failed.
    #[error("Token authentication failed")]
    Authentication,

    #[error("Token rejected: {0}")]
    Freshness(#[from] FreshnessError),
}

impl TokenError {
    /// Short, stable label for logs and metrics. Carries no token data.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::Encoding => "encoding",
            TokenError::Format(FormatError::TooShort { .. }) => "too_short",
            TokenError::Format(FormatError::UnsupportedVersion(_)) => "unsupported_version",
            TokenError::Format(FormatError::MisalignedCiphertext { .. }) => "misaligned_ciphertext",
            TokenError::Format(FormatError::WrongPadding) => "wrong_padding",
            TokenError::Authentication => "authentication",
            TokenError::Freshness(FreshnessError::Expired { .. }) => "expired",
            TokenError::Freshness(FreshnessError::TooFarInFuture { .. }) => "too_far_in_future",
        }
    }
}

/// Setup and encode-side failures. These indicate a misconfigured system and
/// should abort initialization rather than be retried.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Key ring must contain at least one key")]
    EmptyKeyRing,

    #[error("Random source failed: {0}")]
    Entropy(#[source] CryptoError),

    #[error("Token encryption failed: {0}")]
    Encrypt(#[source] CryptoError),

    #[error("Invalid timestamp {value:?}: {reason}")]
    InvalidTimestamp { value: String, reason: String },

    #[error("Key store {}: {source}", .path.display())]
    KeyStore {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Key store line {line}: {source}")]
    KeyStoreEntry { line: usize, source: CryptoError },
}

/// Failures of the JSON token layer.
#[derive(Debug, Error)]
pub enum JsonTokenError {
    #[error("Token does not carry the expected prefix")]
    PrefixMismatch,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels_are_distinct() {
        let errors = [
            TokenError::Encoding,
            FormatError::TooShort { len: 1, min: 80 }.into(),
            FormatError::UnsupportedVersion(0x81).into(),
            FormatError::MisalignedCiphertext { len: 17, block: 16 }.into(),
            FormatError::WrongPadding.into(),
            TokenError::Authentication,
            FreshnessError::Expired { age: 6, ttl: 5 }.into(),
            FreshnessError::TooFarInFuture { ahead: 61, max_skew: 60 }.into(),
        ];
        let mut kinds: Vec<_> = errors.iter().map(TokenError::kind).collect();
        kinds.sort_unstable();
        kinds.dedup();
        assert_eq!(kinds.len(), errors.len());
    }

    #[test]
    fn messages_describe_the_failure() {
        let err: TokenError = FormatError::UnsupportedVersion(0x81).into();
        assert!(err.to_string().contains("0x81"));

        let err: TokenError = FreshnessError::Expired { age: 6, ttl: 5 }.into();
        assert!(err.to_string().contains("ttl is 5s"));
    }

    #[test]
    fn key_store_error_names_the_path() {
        let err = ConfigError::KeyStore {
            path: PathBuf::from("/var/lib/tessera/keys"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/var/lib/tessera/keys"));
    }
}
