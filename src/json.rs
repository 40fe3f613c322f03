//! Tokens carrying a JSON document, optionally tagged with a textual prefix.
//!
//! Format: `{prefix}_{token}` when a prefix is given, the bare token otherwise.
//! The prefix is not authenticated; it routes tokens, it does not protect them.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tessera_crypto::{KeyPrimitive, OsRandom, RandomSource};

use crate::clock::{Clock, SystemClock};
use crate::error::JsonTokenError;
use crate::manager::TokenManager;

const PREFIX_SEPARATOR: char = '_';

pub struct JsonTokens<K, R = OsRandom, C = SystemClock> {
    manager: TokenManager<K, R, C>,
}

impl<K, R, C> JsonTokens<K, R, C>
where
    K: KeyPrimitive,
    R: RandomSource,
    C: Clock,
{
    pub fn new(manager: TokenManager<K, R, C>) -> Self {
        Self { manager }
    }

    pub fn manager(&self) -> &TokenManager<K, R, C> {
        &self.manager
    }

    pub fn encode<T: Serialize + ?Sized>(
        &self,
        value: &T,
        prefix: Option<&str>,
    ) -> Result<String, JsonTokenError> {
        let payload = serde_json::to_vec(value)?;
        let token = self.manager.encode(&payload)?;
        Ok(match prefix {
            Some(prefix) => format!("{prefix}{PREFIX_SEPARATOR}{token}"),
            None => token,
        })
    }

    /// Decode a token produced by [`encode`](Self::encode).
    ///
    /// `ttl` replaces the manager's TTL for this call; `None` keeps its policy.
    pub fn decode<T: DeserializeOwned>(
        &self,
        token: &str,
        prefix: Option<&str>,
        ttl: Option<Duration>,
    ) -> Result<T, JsonTokenError> {
        let token = match prefix {
            Some(prefix) => token
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix(PREFIX_SEPARATOR))
                .ok_or(JsonTokenError::PrefixMismatch)?,
            None => token,
        };

        let payload = match ttl {
            Some(ttl) => self.manager.decode_with_ttl(token, ttl)?,
            None => self.manager.decode(token)?,
        };
        Ok(serde_json::from_slice(&payload)?)
    }
}
