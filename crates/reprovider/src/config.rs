//! Node configuration.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Top-level node configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Whether the node participates in the network. Offline nodes keep
    /// their provider inert and refuse stats queries.
    pub online: bool,
    pub provide: ProvideConfig,
}

/// Settings for the (re)provide subsystem.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvideConfig {
    /// Use the batched, stats-capable provider backed by the accelerated
    /// DHT client instead of the one-key-at-a-time simple provider.
    pub accelerated_dht_client: bool,
    /// How often queued provide requests are flushed as a batch.
    #[serde(with = "humantime_serde")]
    pub provide_interval: Duration,
    /// How often a full reprovide sweep reannounces every stored key.
    #[serde(with = "humantime_serde")]
    pub reprovide_interval: Duration,
    /// Maximum keys announced per routing call during a sweep.
    pub max_batch_size: usize,
    /// Simulated routing latency per batch, for testnet runs.
    #[serde(with = "humantime_serde")]
    pub announce_latency: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            online: true,
            provide: ProvideConfig::default(),
        }
    }
}

impl Default for ProvideConfig {
    fn default() -> Self {
        Self {
            accelerated_dht_client: true,
            provide_interval: Duration::from_secs(10),
            reprovide_interval: Duration::from_secs(12 * 60 * 60),
            max_batch_size: 1024,
            announce_latency: Duration::ZERO,
        }
    }
}

impl NodeConfig {
    /// Load a config file, accepting JSON or YAML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        serde_json::from_str(&content)
            .or_else(|_| serde_yaml::from_str(&content))
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }
}
