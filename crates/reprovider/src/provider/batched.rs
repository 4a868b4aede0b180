//! Batched provider backed by the accelerated DHT client.
//!
//! Provide requests queue up and flush in batches on an interval, and a
//! periodic sweep reannounces every key in the keystore. The counters kept
//! here feed the `reprovidectl stats` report.

use crate::config::ProvideConfig;
use crate::content::{Key, KeyStore};
use crate::provider::Provide;
use crate::routing::ContentRouting;
use crate::stats::ProviderStats;
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct Counters {
    total_provides: u64,
    total_provide_time: Duration,
    last_reprovide_duration: Duration,
    last_reprovide_batch_size: u64,
}

/// Stats-capable provider that queues announcements and flushes them in
/// batches.
pub struct BatchedProvider {
    routing: Arc<dyn ContentRouting>,
    keystore: Arc<KeyStore>,
    config: ProvideConfig,
    pending: Mutex<Vec<Key>>,
    counters: RwLock<Counters>,
}

impl BatchedProvider {
    #[must_use]
    pub fn new(
        routing: Arc<dyn ContentRouting>,
        keystore: Arc<KeyStore>,
        config: ProvideConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            routing,
            keystore,
            config,
            pending: Mutex::new(Vec::new()),
            counters: RwLock::new(Counters::default()),
        })
    }

    /// Snapshot the counters.
    ///
    /// The result is a point-in-time copy; the live counters keep moving
    /// once the lock is released.
    pub async fn stat(&self) -> Result<ProviderStats> {
        let counters = self.counters.read().await;
        let avg_provide_duration = if counters.total_provides == 0 {
            Duration::ZERO
        } else {
            counters.total_provide_time
                / u32::try_from(counters.total_provides).unwrap_or(u32::MAX)
        };
        Ok(ProviderStats {
            total_provides: counters.total_provides,
            avg_provide_duration,
            last_reprovide_duration: counters.last_reprovide_duration,
            last_reprovide_batch_size: counters.last_reprovide_batch_size,
        })
    }

    /// Drain the pending queue and announce it as one batch. Returns the
    /// number of keys announced.
    pub async fn flush_pending(&self) -> Result<usize> {
        let batch: Vec<Key> = {
            let mut pending = self.pending.lock().await;
            std::mem::take(&mut *pending)
        };
        if batch.is_empty() {
            return Ok(0);
        }

        let started = Instant::now();
        self.routing.provide_many(&batch).await?;
        let elapsed = started.elapsed();

        let mut counters = self.counters.write().await;
        counters.total_provides += batch.len() as u64;
        counters.total_provide_time += elapsed;
        drop(counters);

        debug!(keys = batch.len(), elapsed = ?elapsed, "flushed provide batch");
        Ok(batch.len())
    }

    /// Reannounce every key in the keystore, in `max_batch_size` chunks.
    /// Returns the number of keys swept.
    pub async fn reprovide_sweep(&self) -> Result<u64> {
        let keys = self.keystore.snapshot().await;
        let started = Instant::now();
        for chunk in keys.chunks(self.config.max_batch_size.max(1)) {
            self.routing.provide_many(chunk).await?;
        }
        let elapsed = started.elapsed();
        let swept = keys.len() as u64;

        let mut counters = self.counters.write().await;
        counters.total_provides += swept;
        counters.total_provide_time += elapsed;
        counters.last_reprovide_duration = elapsed;
        counters.last_reprovide_batch_size = swept;
        drop(counters);

        info!(keys = swept, elapsed = ?elapsed, "completed reprovide sweep");
        Ok(swept)
    }

    /// Worker loop: flush queued provides and run reprovide sweeps until
    /// the owning task is aborted. Routing failures are logged, never fatal
    /// to the loop.
    pub async fn run(&self) {
        let mut provide_tick = tokio::time::interval(self.config.provide_interval);
        let mut reprovide_tick = tokio::time::interval(self.config.reprovide_interval);

        loop {
            tokio::select! {
                _ = provide_tick.tick() => {
                    if let Err(e) = self.flush_pending().await {
                        warn!("provide batch failed: {e:#}");
                    }
                }
                _ = reprovide_tick.tick() => {
                    if let Err(e) = self.reprovide_sweep().await {
                        warn!("reprovide sweep failed: {e:#}");
                    }
                }
            }
        }
    }
}

#[async_trait]
impl Provide for BatchedProvider {
    async fn provide(&self, key: Key) -> Result<()> {
        self.pending.lock().await.push(key);
        Ok(())
    }
}
