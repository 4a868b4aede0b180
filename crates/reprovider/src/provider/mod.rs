//! Provider subsystem: announces locally held keys to the routing layer.
//!
//! Two implementations sit behind [`ProviderRef`]: the batched provider
//! used with the accelerated DHT client, which also accumulates the
//! counters surfaced by `reprovidectl stats`, and a simple provider that
//! announces keys as they arrive and keeps no counters.

mod batched;

pub use batched::BatchedProvider;

use crate::content::Key;
use crate::routing::ContentRouting;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// A key announcement request.
#[async_trait]
pub trait Provide: Send + Sync {
    /// Request that `key` be announced to the routing layer.
    async fn provide(&self, key: Key) -> Result<()>;
}

/// The node's configured provider implementation.
///
/// A closed set: only the batched variant exposes statistics, probed via
/// [`ProviderRef::as_stats_capable`].
#[derive(Clone)]
pub enum ProviderRef {
    Batched(Arc<BatchedProvider>),
    Simple(Arc<SimpleProvider>),
}

impl ProviderRef {
    /// Narrow to the stats-capable provider, if that is what is configured.
    #[must_use]
    pub fn as_stats_capable(&self) -> Option<&Arc<BatchedProvider>> {
        match self {
            ProviderRef::Batched(provider) => Some(provider),
            ProviderRef::Simple(_) => None,
        }
    }
}

#[async_trait]
impl Provide for ProviderRef {
    async fn provide(&self, key: Key) -> Result<()> {
        match self {
            ProviderRef::Batched(provider) => provider.provide(key).await,
            ProviderRef::Simple(provider) => provider.provide(key).await,
        }
    }
}

/// One-key-at-a-time provider. No batching, no counters.
pub struct SimpleProvider {
    routing: Arc<dyn ContentRouting>,
}

impl SimpleProvider {
    #[must_use]
    pub fn new(routing: Arc<dyn ContentRouting>) -> Arc<Self> {
        Arc::new(Self { routing })
    }
}

#[async_trait]
impl Provide for SimpleProvider {
    async fn provide(&self, key: Key) -> Result<()> {
        debug!(key = %key.short(), "announcing key");
        self.routing.provide(key).await
    }
}
