//! Ordered, append-only key collection with rotation.
//!
//! The newest key encrypts. Verification folds over the keys newest to
//! oldest and stops at the first key that authenticates. `push` swaps in a
//! new list, so a decode holding a [`KeySnapshot`] never sees a partial append.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use tessera_crypto::KeyPrimitive;
use tracing::info;

use crate::error::{ConfigError, TokenError};

type KeyList<K> = Arc<Vec<Arc<K>>>;

pub struct KeyRing<K> {
    keys: RwLock<KeyList<K>>,
}

impl<K: KeyPrimitive> KeyRing<K> {
    /// Build a ring from keys given oldest first. The last key becomes current.
    pub fn new(keys: impl IntoIterator<Item = K>) -> Result<Self, ConfigError> {
        Self::from_shared(keys.into_iter().map(Arc::new).collect())
    }

    /// A ring holding one key.
    pub fn single(key: K) -> Self {
        Self {
            keys: RwLock::new(Arc::new(vec![Arc::new(key)])),
        }
    }

    fn from_shared(keys: Vec<Arc<K>>) -> Result<Self, ConfigError> {
        if keys.is_empty() {
            return Err(ConfigError::EmptyKeyRing);
        }
        Ok(Self {
            keys: RwLock::new(Arc::new(keys)),
        })
    }

    /// Make `key` current. Older keys stay available for verification.
    pub fn push(&self, key: K) {
        let mut guard = self.keys.write();
        let mut next = Vec::with_capacity(guard.len() + 1);
        next.extend(guard.iter().cloned());
        next.push(Arc::new(key));
        *guard = Arc::new(next);
        info!(keys = guard.len(), "rotated key ring");
    }

    /// The key new tokens are encrypted with.
    pub fn current(&self) -> Arc<K> {
        self.snapshot().current_shared()
    }

    pub fn len(&self) -> usize {
        self.keys.read().len()
    }

    /// Always false for a constructed ring.
    pub fn is_empty(&self) -> bool {
        self.keys.read().is_empty()
    }

    /// Consistent view of the ring for the duration of one operation.
    pub fn snapshot(&self) -> KeySnapshot<K> {
        KeySnapshot {
            keys: Arc::clone(&self.keys.read()),
        }
    }

    /// Keys newest first.
    pub fn keys(&self) -> Vec<Arc<K>> {
        self.snapshot().keys.iter().rev().cloned().collect()
    }

    /// A new ring with only the keys `keep` accepts, in the same order.
    ///
    /// Used to retire old keys. Fails if nothing is kept.
    pub fn retain(&self, mut keep: impl FnMut(&K) -> bool) -> Result<Self, ConfigError> {
        let snapshot = self.snapshot();
        Self::from_shared(snapshot.keys.iter().filter(|key| keep(&***key)).cloned().collect())
    }
}

impl<K> fmt::Debug for KeyRing<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyRing")
            .field("keys", &self.keys.read().len())
            .finish()
    }
}

/// An immutable view of a [`KeyRing`] at one point in time.
pub struct KeySnapshot<K> {
    keys: KeyList<K>,
}

impl<K: KeyPrimitive> KeySnapshot<K> {
    pub fn current(&self) -> &K {
        self.keys
            .last()
            .expect("key ring is never empty")
    }

    fn current_shared(&self) -> Arc<K> {
        Arc::clone(self.keys.last().expect("key ring is never empty"))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Keys oldest first, the order they were pushed.
    pub fn oldest_first(&self) -> impl DoubleEndedIterator<Item = &K> {
        self.keys.iter().map(|key| key.as_ref())
    }

    /// Find the newest key whose tag matches and return it with the message.
    ///
    /// Failure never says which key came closest.
    pub fn verify<'a>(&self, authenticated: &'a [u8]) -> Result<(&K, &'a [u8]), TokenError> {
        self.oldest_first()
            .rev()
            .find_map(|key| key.verify(authenticated).ok().map(|message| (key, message)))
            .ok_or(TokenError::Authentication)
    }

    /// Decrypt with the newest key that succeeds.
    pub fn decrypt(&self, ciphertext: &[u8], nonce: &[u8]) -> Result<Vec<u8>, TokenError> {
        self.oldest_first()
            .rev()
            .find_map(|key| key.decrypt(ciphertext, nonce).ok())
            .ok_or(TokenError::Authentication)
    }
}

impl<K> Clone for KeySnapshot<K> {
    fn clone(&self) -> Self {
        Self {
            keys: Arc::clone(&self.keys),
        }
    }
}
