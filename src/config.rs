//! Token settings, loadable from any serde format.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tessera_crypto::{KeyMaterial, RandomSource};
use tracing::info;

use crate::error::ConfigError;
use crate::freshness::{FreshnessPolicy, DEFAULT_MAX_CLOCK_SKEW};
use crate::keyring::KeyRing;
use crate::keystore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Maximum token age in seconds. Absent or zero disables expiry.
    pub ttl_secs: Option<u64>,
    pub max_clock_skew_secs: u64,
    /// Newline-delimited key file, created on first use.
    pub key_file: Option<PathBuf>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl_secs: None,
            max_clock_skew_secs: DEFAULT_MAX_CLOCK_SKEW.as_secs(),
            key_file: None,
        }
    }
}

impl TokenConfig {
    pub fn freshness_policy(&self) -> FreshnessPolicy {
        FreshnessPolicy::new(self.ttl_secs.map(Duration::from_secs))
            .with_max_clock_skew(Duration::from_secs(self.max_clock_skew_secs))
    }

    /// Load the configured key file, or generate a single in-memory key when
    /// none is configured.
    pub fn load_keys<K: KeyMaterial>(
        &self,
        random: &dyn RandomSource,
    ) -> Result<KeyRing<K>, ConfigError> {
        match &self.key_file {
            Some(path) => keystore::load_or_create(path, random),
            None => {
                info!("no key file configured, using an ephemeral key");
                let key = K::generate(random).map_err(ConfigError::Entropy)?;
                Ok(KeyRing::single(key))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use tessera_crypto::{OsRandom, SecretboxKey};

    use super::*;

    #[test]
    fn defaults_when_fields_missing() {
        let config: TokenConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TokenConfig::default());
        assert_eq!(config.freshness_policy(), FreshnessPolicy::default());
    }

    #[test]
    fn builds_freshness_policy() {
        let config: TokenConfig =
            serde_json::from_str(r#"{"ttl_secs": 300, "max_clock_skew_secs": 5}"#).unwrap();
        let policy = config.freshness_policy();
        assert_eq!(policy.ttl, Some(Duration::from_secs(300)));
        assert_eq!(policy.max_clock_skew, Duration::from_secs(5));
    }

    #[test]
    fn rejects_wrong_field_types() {
        assert!(serde_json::from_str::<TokenConfig>(r#"{"ttl_secs": "soon"}"#).is_err());
    }

    #[test]
    fn ephemeral_key_without_key_file() {
        let ring: KeyRing<SecretboxKey> = TokenConfig::default().load_keys(&OsRandom).unwrap();
        assert_eq!(ring.len(), 1);
    }

    #[test]
    fn loads_configured_key_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = TokenConfig {
            key_file: Some(dir.path().join("keys")),
            ..TokenConfig::default()
        };
        let first: KeyRing<SecretboxKey> = config.load_keys(&OsRandom).unwrap();
        let second: KeyRing<SecretboxKey> = config.load_keys(&OsRandom).unwrap();
        assert_eq!(first.current().to_bytes(), second.current().to_bytes());
    }
}
