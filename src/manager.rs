//! Call-site facade: a key ring plus injected randomness, clock and policy.

use std::sync::Arc;
use std::time::Duration;

use tessera_crypto::{random_bytes, KeyPrimitive, OsRandom, RandomSource};
use tracing::{debug, error};

use crate::clock::{Clock, SystemClock};
use crate::codec;
use crate::config::TokenConfig;
use crate::error::{ConfigError, TokenError};
use crate::freshness::FreshnessPolicy;
use crate::keyring::KeyRing;

/// Encodes and decodes tokens against a shared [`KeyRing`].
///
/// The ring is shared through an `Arc`, so rotation done elsewhere (for
/// example by [`append_key`](crate::keystore::append_key)) takes effect on the
/// next call.
pub struct TokenManager<K, R = OsRandom, C = SystemClock> {
    keys: Arc<KeyRing<K>>,
    random: R,
    clock: C,
    policy: FreshnessPolicy,
}

impl<K, R, C> TokenManager<K, R, C>
where
    K: KeyPrimitive,
    R: RandomSource,
    C: Clock,
{
    pub fn new(keys: Arc<KeyRing<K>>, random: R, clock: C) -> Self {
        Self {
            keys,
            random,
            clock,
            policy: FreshnessPolicy::default(),
        }
    }

    /// Build a manager whose freshness policy comes from `config`.
    pub fn from_config(keys: Arc<KeyRing<K>>, random: R, clock: C, config: &TokenConfig) -> Self {
        Self::new(keys, random, clock).with_policy(config.freshness_policy())
    }

    pub fn with_policy(mut self, policy: FreshnessPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn keys(&self) -> &Arc<KeyRing<K>> {
        &self.keys
    }

    pub fn policy(&self) -> &FreshnessPolicy {
        &self.policy
    }

    /// Encrypt `payload` under the current key with a fresh nonce.
    pub fn encode(&self, payload: &[u8]) -> Result<String, ConfigError> {
        let key = self.keys.current();
        let nonce = random_bytes(&self.random, key.layout().nonce_len).map_err(|e| {
            error!(error = %e, "failed to draw token nonce");
            ConfigError::Entropy(e)
        })?;
        codec::encode(payload, key.as_ref(), self.clock.now(), &nonce)
    }

    /// Decode with the manager's policy.
    pub fn decode(&self, token: &str) -> Result<Vec<u8>, TokenError> {
        self.decode_with_policy(token, &self.policy)
    }

    /// Decode with `ttl` replacing the policy's TTL for this call.
    pub fn decode_with_ttl(&self, token: &str, ttl: Duration) -> Result<Vec<u8>, TokenError> {
        self.decode_with_policy(token, &self.policy.with_ttl(Some(ttl)))
    }

    pub fn decode_with_policy(
        &self,
        token: &str,
        policy: &FreshnessPolicy,
    ) -> Result<Vec<u8>, TokenError> {
        let snapshot = self.keys.snapshot();
        codec::decode(token, &snapshot, policy, self.clock.now()).inspect_err(|e| {
            debug!(kind = e.kind(), keys = snapshot.len(), "rejected token");
        })
    }
}
