//! The stats report command: gate, fetch, emit.
//!
//! One invocation produces exactly one snapshot or exactly one error,
//! never both. Nothing on this path is retried and nothing here updates a
//! counter; transient provider-side conditions are the provider's concern.

use crate::node::Node;
use crate::provider::BatchedProvider;
use crate::render::{self, RenderError};
use crate::stats::ProviderStats;
use std::io::Write;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Output encoding for the stats report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Aligned human-readable table.
    Text,
    /// Pretty-printed JSON of the raw snapshot.
    Json,
}

/// Failure of the stats report path. Every variant is terminal for the
/// invocation.
#[derive(Debug, Error)]
pub enum StatsReportError {
    #[error("this action must be run in online mode")]
    NotOnline,
    #[error(
        "the configured provider does not expose stats; set `provide.accelerated_dht_client: true` in the node config to enable the batched provider"
    )]
    UnsupportedProvider,
    #[error("failed to retrieve provider stats")]
    Retrieval(#[source] anyhow::Error),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("failed to emit stats snapshot")]
    Emit(#[source] std::io::Error),
}

/// Validate that `node` may serve a stats query and narrow its provider to
/// the stats-capable variant.
///
/// The online check runs first: an offline node's provider reference is
/// inert and must not be consulted.
pub fn stats_capable_provider(node: &Node) -> Result<&Arc<BatchedProvider>, StatsReportError> {
    if !node.is_online() {
        return Err(StatsReportError::NotOnline);
    }
    node.provider()
        .as_stats_capable()
        .ok_or(StatsReportError::UnsupportedProvider)
}

/// Run the full report: gate, snapshot the provider counters within
/// `timeout`, and emit in `format` to `out`.
///
/// A failure before emission leaves `out` untouched.
pub async fn run_stats_report<W: Write>(
    node: &Node,
    format: ReportFormat,
    timeout: Duration,
    out: &mut W,
) -> Result<(), StatsReportError> {
    let provider = stats_capable_provider(node)?;

    let stats = tokio::time::timeout(timeout, provider.stat())
        .await
        .map_err(|_| {
            StatsReportError::Retrieval(anyhow::anyhow!(
                "stats retrieval did not complete within {timeout:?}"
            ))
        })?
        .map_err(StatsReportError::Retrieval)?;
    debug!(
        total_provides = stats.total_provides,
        "fetched provider stats snapshot"
    );

    emit(&stats, format, out)
}

fn emit<W: Write>(
    stats: &ProviderStats,
    format: ReportFormat,
    out: &mut W,
) -> Result<(), StatsReportError> {
    match format {
        ReportFormat::Text => render::write_stats_table(stats, out)?,
        ReportFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, stats)
                .map_err(|e| StatsReportError::Emit(std::io::Error::other(e)))?;
            writeln!(out).map_err(StatsReportError::Emit)?;
            out.flush().map_err(StatsReportError::Emit)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NodeConfig;
    use crate::routing::MemoryRouting;

    fn node_with(online: bool, accelerated: bool) -> Node {
        let mut config = NodeConfig {
            online,
            ..Default::default()
        };
        config.provide.accelerated_dht_client = accelerated;
        Node::new(&config, Arc::new(MemoryRouting::new()))
    }

    async fn run(node: &Node, format: ReportFormat) -> Result<Vec<u8>, StatsReportError> {
        let mut out = Vec::new();
        run_stats_report(node, format, Duration::from_secs(5), &mut out).await?;
        Ok(out)
    }

    #[tokio::test]
    async fn offline_node_fails_before_the_capability_check() {
        // A simple provider would fail the capability check, so getting
        // NotOnline proves the online check runs first.
        let node = node_with(false, false);
        assert!(matches!(
            run(&node, ReportFormat::Text).await,
            Err(StatsReportError::NotOnline)
        ));
    }

    #[tokio::test]
    async fn offline_node_with_batched_provider_is_still_rejected() {
        let node = node_with(false, true);
        assert!(matches!(
            run(&node, ReportFormat::Json).await,
            Err(StatsReportError::NotOnline)
        ));
    }

    #[tokio::test]
    async fn simple_provider_is_unsupported() {
        let node = node_with(true, false);
        let err = run(&node, ReportFormat::Text).await.unwrap_err();
        assert!(matches!(err, StatsReportError::UnsupportedProvider));
        // The message must point at the flag that enables the capability.
        assert!(err.to_string().contains("accelerated_dht_client"));
    }

    #[tokio::test]
    async fn gate_narrows_to_the_batched_provider() {
        let node = node_with(true, true);
        assert!(stats_capable_provider(&node).is_ok());
    }

    #[tokio::test]
    async fn text_report_renders_the_table() {
        let node = node_with(true, true);
        let out = run(&node, ReportFormat::Text).await.unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("TotalProvides:"));
        assert_eq!(text.lines().count(), 4);
    }

    #[tokio::test]
    async fn json_report_round_trips_the_snapshot() {
        let node = node_with(true, true);
        let provider = node.provider().as_stats_capable().unwrap();
        node.provide(crate::content::Key::of(b"block")).await.unwrap();
        provider.flush_pending().await.unwrap();

        let out = run(&node, ReportFormat::Json).await.unwrap();
        let decoded: ProviderStats = serde_json::from_slice(&out).unwrap();
        assert_eq!(decoded.total_provides, 1);
    }
}
