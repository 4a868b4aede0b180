//! The node handle consumed by diagnostic commands.

use crate::config::NodeConfig;
use crate::content::{Key, KeyStore};
use crate::provider::{BatchedProvider, Provide, ProviderRef, SimpleProvider};
use crate::routing::ContentRouting;
use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

/// A running (or offline) content-routing node, reduced to what the
/// provide subsystem and its diagnostics need.
///
/// The handle is owned by the caller and passed into commands at call
/// time; commands keep no state of their own across invocations.
pub struct Node {
    online: bool,
    keystore: Arc<KeyStore>,
    provider: ProviderRef,
}

impl Node {
    /// Build a node from configuration, wiring the provider variant the
    /// config selects.
    #[must_use]
    pub fn new(config: &NodeConfig, routing: Arc<dyn ContentRouting>) -> Self {
        let keystore = Arc::new(KeyStore::new());
        let provider = if config.provide.accelerated_dht_client {
            ProviderRef::Batched(BatchedProvider::new(
                routing,
                Arc::clone(&keystore),
                config.provide.clone(),
            ))
        } else {
            ProviderRef::Simple(SimpleProvider::new(routing))
        };
        Self {
            online: config.online,
            keystore,
            provider,
        }
    }

    #[must_use]
    pub fn is_online(&self) -> bool {
        self.online
    }

    #[must_use]
    pub fn provider(&self) -> &ProviderRef {
        &self.provider
    }

    #[must_use]
    pub fn keystore(&self) -> &Arc<KeyStore> {
        &self.keystore
    }

    /// Track `key` locally and request its announcement.
    pub async fn provide(&self, key: Key) -> Result<()> {
        self.keystore.insert(key).await;
        self.provider.provide(key).await
    }

    /// Spawn the background provider worker. Returns `None` when the node
    /// is offline or the configured provider has no worker loop.
    pub fn start(&self) -> Option<JoinHandle<()>> {
        if !self.online {
            return None;
        }
        match &self.provider {
            ProviderRef::Batched(provider) => {
                let provider = Arc::clone(provider);
                info!("starting batched provider worker");
                Some(tokio::spawn(async move { provider.run().await }))
            }
            ProviderRef::Simple(_) => None,
        }
    }
}
