//! Point-in-time counters exposed by the stats-capable provider.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Snapshot of the (re)provide subsystem counters.
///
/// Produced fresh by the batched provider's `stat()` accessor on every
/// report invocation. The report path never mutates one, and a snapshot
/// does not track the live counters once taken.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderStats {
    /// Announcements made since the subsystem started.
    pub total_provides: u64,
    /// Mean wall-clock time per announcement.
    pub avg_provide_duration: Duration,
    /// Wall-clock time of the most recently completed reprovide sweep.
    pub last_reprovide_duration: Duration,
    /// Keys announced in the most recent sweep.
    pub last_reprovide_batch_size: u64,
}
