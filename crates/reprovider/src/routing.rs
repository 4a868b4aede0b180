//! Content routing interface the provider announces through.

use crate::content::Key;
use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::time::Duration;
use tracing::debug;

/// Announcement surface of the routing layer.
///
/// The provider subsystem only needs to advertise keys; lookup and
/// retrieval live elsewhere in the node.
#[async_trait]
pub trait ContentRouting: Send + Sync {
    /// Announce a batch of keys to the routing layer.
    async fn provide_many(&self, keys: &[Key]) -> Result<()>;

    /// Announce a single key.
    async fn provide(&self, key: Key) -> Result<()> {
        self.provide_many(std::slice::from_ref(&key)).await
    }
}

/// In-memory routing layer for tests and single-process testnet runs.
///
/// Records how often each key has been announced. An optional per-batch
/// latency approximates a real DHT round trip.
#[derive(Debug, Default)]
pub struct MemoryRouting {
    announced: DashMap<Key, u64>,
    latency: Duration,
}

impl MemoryRouting {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulate `latency` of routing-layer work per announced batch.
    #[must_use]
    pub fn with_latency(latency: Duration) -> Self {
        Self {
            announced: DashMap::new(),
            latency,
        }
    }

    /// Number of distinct keys ever announced.
    #[must_use]
    pub fn announced_keys(&self) -> usize {
        self.announced.len()
    }

    /// How many times `key` has been announced.
    #[must_use]
    pub fn announce_count(&self, key: &Key) -> u64 {
        self.announced.get(key).map_or(0, |count| *count)
    }
}

#[async_trait]
impl ContentRouting for MemoryRouting {
    async fn provide_many(&self, keys: &[Key]) -> Result<()> {
        if keys.is_empty() {
            return Ok(());
        }
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        for key in keys {
            *self.announced.entry(*key).or_insert(0) += 1;
        }
        debug!(keys = keys.len(), "announced batch to in-memory routing");
        Ok(())
    }
}
