//! Content keys and the local keystore.
//!
//! A key is the 32-byte SHA-256 digest of a content block, the unit the
//! provider subsystem announces to the routing layer. The keystore tracks
//! every key the node is responsible for (re)announcing.

use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fmt;
use tokio::sync::RwLock;

/// A 32-byte content key.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Key([u8; 32]);

impl Key {
    /// Derive the key for a block of content.
    #[must_use]
    pub fn of(data: &[u8]) -> Self {
        Self(Sha256::digest(data).into())
    }

    /// Generate a random key, used to seed testnet runs.
    #[must_use]
    pub fn random() -> Self {
        Self(rand::random())
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Short hex prefix for log lines.
    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({}..)", self.short())
    }
}

/// The set of locally held keys eligible for (re)providing.
#[derive(Debug, Default)]
pub struct KeyStore {
    keys: RwLock<BTreeSet<Key>>,
}

impl KeyStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a key. Returns false if it was already tracked.
    pub async fn insert(&self, key: Key) -> bool {
        self.keys.write().await.insert(key)
    }

    pub async fn len(&self) -> usize {
        self.keys.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.keys.read().await.is_empty()
    }

    /// Point-in-time copy of every tracked key.
    pub async fn snapshot(&self) -> Vec<Key> {
        self.keys.read().await.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_of_is_deterministic() {
        let a = Key::of(b"hello world");
        let b = Key::of(b"hello world");
        assert_eq!(a, b);
        assert_eq!(a.to_string().len(), 64);
    }

    #[test]
    fn distinct_content_distinct_keys() {
        assert_ne!(Key::of(b"a"), Key::of(b"b"));
    }

    #[test]
    fn short_form_is_prefix_of_full() {
        let key = Key::of(b"block");
        assert!(key.to_string().starts_with(&key.short()));
        assert_eq!(key.short().len(), 8);
    }

    #[tokio::test]
    async fn keystore_dedupes_keys() {
        let store = KeyStore::new();
        let key = Key::of(b"block");
        assert!(store.insert(key).await);
        assert!(!store.insert(key).await);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn keystore_snapshot_copies_all_keys() {
        let store = KeyStore::new();
        for i in 0u8..10 {
            store.insert(Key::of(&[i])).await;
        }
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.len(), 10);
        assert!(!store.is_empty().await);
    }
}
