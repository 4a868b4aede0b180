//! Saorsa (re)provider subsystem and diagnostics.
//!
//! A content-routing node periodically announces ("provides") the keys it
//! holds so other peers can find them through the DHT. This crate implements
//! the batched provide pipeline and the `reprovidectl` diagnostics surface
//! that reports its runtime counters.
//!
//! # Architecture
//!
//! ```text
//!   node.provide(key) ──► pending queue ──► batch flush ──► ContentRouting
//!                            ▲                                   ▲
//!        KeyStore ───────────┴──── reprovide sweep ──────────────┘
//!                                       │
//!                            counters (totals, last sweep)
//!                                       │
//!          reprovidectl stats ── gate ── stat() ── text table | JSON
//! ```
//!
//! The stats report path only snapshots and renders; every counter update
//! belongs to the provider worker.

pub mod config;
pub mod content;
pub mod format;
pub mod node;
pub mod provider;
pub mod render;
pub mod report;
pub mod routing;
pub mod stats;

pub use config::{NodeConfig, ProvideConfig};
pub use content::{Key, KeyStore};
pub use node::Node;
pub use provider::{BatchedProvider, Provide, ProviderRef, SimpleProvider};
pub use render::RenderError;
pub use report::{ReportFormat, StatsReportError, run_stats_report, stats_capable_provider};
pub use routing::{ContentRouting, MemoryRouting};
pub use stats::ProviderStats;
