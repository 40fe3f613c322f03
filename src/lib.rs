//! Opaque, time-stamped authenticated tokens with key rotation.
//!
//! Two wire formats share one codec: a secretbox format
//! ([`SecretboxKey`]) and Fernet v1 ([`FernetKey`]). Pick one by choosing the
//! key type of the [`KeyRing`].

pub mod clock;
pub mod codec;
pub mod config;
pub mod error;
pub mod freshness;
pub mod json;
pub mod keyring;
pub mod keystore;
pub mod manager;
pub mod padding;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::TokenConfig;
pub use error::{ConfigError, FormatError, FreshnessError, JsonTokenError, TokenError};
pub use freshness::{FreshnessPolicy, DEFAULT_MAX_CLOCK_SKEW};
pub use json::JsonTokens;
pub use keyring::{KeyRing, KeySnapshot};
pub use keystore::{append_key, load_or_create, parse_keys, render_keys};
pub use manager::TokenManager;
pub use tessera_crypto::{
    CryptoError, FernetKey, KeyMaterial, KeyPrimitive, OsRandom, RandomSource, SecretboxKey,
};
