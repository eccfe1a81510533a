//! Cadence deduplicator.
//!
//! Gauges report on a fixed grid (every 6 minutes for CO-OPS water levels).
//! Exports also carry readings between ticks; those rows are dropped so
//! that one row remains per expected tick. Only the minute-of-hour is
//! checked. The filter is order-preserving and idempotent.

use crate::config::SamplingInterval;
use crate::logging::{self, Stage};
use crate::model::{CleanedTable, PreparedTable};
use crate::report::{CadenceDiagnostics, Reporter};

/// Keeps rows whose minute-of-hour lies on the `interval` grid.
///
/// When a reporter is supplied it receives the gap series before and after
/// filtering. Passing `None` skips the diagnostics. Reporter failures are
/// logged and never change the returned table.
pub fn remove_extra_datapoints(
    table: PreparedTable,
    interval: SamplingInterval,
    reporter: Option<&mut dyn Reporter>,
) -> CleanedTable {
    let rows_in = table.len();
    let original_times: Option<Vec<_>> = reporter.is_some().then(|| table.times().collect());

    let rows: Vec<_> = table
        .rows
        .into_iter()
        .filter(|r| interval.on_grid(&r.time))
        .collect();
    let cleaned = CleanedTable { rows };

    logging::log_stage_summary(Stage::Cadence, rows_in, cleaned.len());

    if let (Some(reporter), Some(original)) = (reporter, original_times) {
        let diagnostics = CadenceDiagnostics::new(original, cleaned.times());
        if let Err(e) = reporter.cadence(&diagnostics) {
            logging::warn(Stage::Cadence, &format!("diagnostics not produced: {}", e));
        }
    }

    cleaned
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
