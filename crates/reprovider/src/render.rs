//! Aligned text table rendering of a stats snapshot.

use crate::format::{format_compact, format_duration, format_full};
use crate::stats::ProviderStats;
use std::io::Write;
use thiserror::Error;

/// Decimal digits used for the compact count forms.
const COMPACT_DECIMALS: usize = 1;

/// A write into the report sink failed.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {row} row")]
    Write {
        row: &'static str,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to flush stats table")]
    Flush(#[source] std::io::Error),
}

/// Write the four-row aligned stats table.
///
/// Rows are emitted in a fixed order and the sink is flushed before
/// returning; a failed write names the row that rejected it. Count rows
/// pair the compact form with the full form in parentheses, duration rows
/// carry the duration alone.
pub fn write_stats_table<W: Write>(stats: &ProviderStats, out: &mut W) -> Result<(), RenderError> {
    let total = stats.total_provides as f64;
    let batch = stats.last_reprovide_batch_size as f64;

    let rows = [
        (
            "TotalProvides:",
            format_compact(total, COMPACT_DECIMALS),
            Some(format_full(total, 0)),
        ),
        (
            "AvgProvideDuration:",
            format_duration(stats.avg_provide_duration),
            None,
        ),
        (
            "LastReprovideDuration:",
            format_duration(stats.last_reprovide_duration),
            None,
        ),
        (
            "LastReprovideBatchSize:",
            format_compact(batch, COMPACT_DECIMALS),
            Some(format_full(batch, 0)),
        ),
    ];

    let label_width = rows.iter().map(|(label, ..)| label.len()).max().unwrap_or(0) + 1;
    // Only rows with a trailing full form take part in value-column
    // alignment; terminal cells are never padded.
    let value_width = rows
        .iter()
        .filter(|(_, _, full)| full.is_some())
        .map(|(_, value, _)| value.len())
        .max()
        .unwrap_or(0)
        + 1;

    for (label, value, full) in &rows {
        let line = match full {
            Some(full) => format!("{label:<label_width$}{value:<value_width$}({full})"),
            None => format!("{label:<label_width$}{value}"),
        };
        writeln!(out, "{line}").map_err(|source| RenderError::Write {
            row: label.trim_end_matches(':'),
            source,
        })?;
    }
    out.flush().map_err(RenderError::Flush)
}
