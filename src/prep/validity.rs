//! Range/validity filter.
//!
//! Turns the raw loader table into a `PreparedTable`: sentinel values are
//! treated as missing, any row with a missing value is dropped (no
//! imputation), and only rows inside the inclusive time window survive.
//! Row order is preserved and the key is materialised as `time`.

use crate::config::{Sentinel, TimeWindow};
use crate::logging::{self, Stage};
use crate::model::{Observation, ObservationTable, PipelineError, PreparedTable, RawObservation};
use crate::timestamps::parse_timestamp;

/// Row accounting for one filter pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidityStats {
    pub rows_in: usize,
    /// Individual values at or below the sentinel threshold.
    pub sentinels_nulled: usize,
    /// Rows dropped because at least one field was missing.
    pub incomplete_rows: usize,
    /// Rows dropped because the key is not a timestamp.
    pub unparseable_keys: usize,
    /// Complete rows that fell outside the window.
    pub outside_window: usize,
    pub rows_out: usize,
}

/// Validates `[time_start, time_end]` and filters `table` to it.
///
/// Fails with `TimeRangeOrder` when start is after end and with
/// `InvalidTimestamp` when either bound is unparseable; nothing is
/// filtered in either case.
pub fn initial_data_prep(
    table: ObservationTable,
    time_start: &str,
    time_end: &str,
    sentinel: Sentinel,
) -> Result<PreparedTable, PipelineError> {
    let window = TimeWindow::new(time_start, time_end)?;
    Ok(filter_valid(table, &window, sentinel).0)
}

/// Filter with an already-validated window.
pub fn filter_valid(
    table: ObservationTable,
    window: &TimeWindow,
    sentinel: Sentinel,
) -> (PreparedTable, ValidityStats) {
    let mut stats = ValidityStats {
        rows_in: table.len(),
        ..Default::default()
    };

    let mut rows = Vec::with_capacity(table.len());
    for mut raw in table.rows {
        stats.sentinels_nulled += mask_sentinels(&mut raw, sentinel);

        let (Some(primary), Some(sigma), Some(backup), Some(verified), Some(prediction)) =
            (raw.primary, raw.sigma, raw.backup, raw.verified, raw.prediction)
        else {
            stats.incomplete_rows += 1;
            continue;
        };
        let Some(time) = parse_timestamp(&raw.key) else {
            stats.unparseable_keys += 1;
            logging::debug(Stage::Prep, &format!("dropping row with key '{}'", raw.key));
            continue;
        };
        if !window.contains(&time) {
            stats.outside_window += 1;
            continue;
        }
        rows.push(Observation {
            time,
            primary,
            sigma,
            backup,
            verified,
            prediction,
        });
    }
    stats.rows_out = rows.len();

    if stats.sentinels_nulled > 0 {
        logging::info(
            Stage::Prep,
            &format!("{} sentinel values treated as missing", stats.sentinels_nulled),
        );
    }
    if stats.unparseable_keys > 0 {
        logging::warn(
            Stage::Prep,
            &format!("{} rows dropped with unparseable timestamps", stats.unparseable_keys),
        );
    }
    logging::log_stage_summary(Stage::Prep, stats.rows_in, stats.rows_out);

    (PreparedTable { rows }, stats)
}

/// Replaces sentinel values with `None`; returns how many were replaced.
fn mask_sentinels(raw: &mut RawObservation, sentinel: Sentinel) -> usize {
    let mut masked = 0;
    for value in raw.values_mut() {
        if value.is_some_and(|v| sentinel.is_missing(v)) {
            *value = None;
            masked += 1;
        }
    }
    masked
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timestamps::format_timestamp;

    fn raw(key: &str, values: [Option<f64>; 5]) -> RawObservation {
        let [primary, sigma, backup, verified, prediction] = values;
        RawObservation {
            key: key.to_string(),
            primary,
            sigma,
            backup,
            verified,
            prediction,
        }
    }

    fn full(key: &str, v: f64) -> RawObservation {
        raw(key, [Some(v), Some(0.01), Some(v), Some(v), Some(v)])
    }

    fn table(rows: Vec<RawObservation>) -> ObservationTable {
        ObservationTable { rows }
    }

    fn keys(t: &PreparedTable) -> Vec<String> {
        t.rows.iter().map(|r| format_timestamp(&r.time)).collect()
    }

    // --- Sentinels and nulls ------------------------------------------------

    #[test]
    fn test_sentinel_row_is_dropped() {
        let t = table(vec![
            raw("2010-01-01 00:00:00", [Some(-99999.0), Some(0.1), Some(1.0), Some(1.0), Some(1.0)]),
            full("2010-01-01 00:06:00", 1.0),
        ]);
        let (out, stats) = filter_valid(t, &TimeWindow::default(), Sentinel::default());
        assert_eq!(keys(&out), vec!["2010-01-01 00:06:00"]);
        assert_eq!(stats.sentinels_nulled, 1);
        assert_eq!(stats.incomplete_rows, 1);
    }

    #[test]
    fn test_value_just_above_threshold_is_kept() {
        let t = table(vec![raw(
            "2010-01-01 00:00:00",
            [Some(-999.0), Some(0.1), Some(-999.0), Some(-999.0), Some(-999.0)],
        )]);
        let (out, stats) = filter_valid(t, &TimeWindow::default(), Sentinel::default());
        assert_eq!(out.len(), 1);
        assert_eq!(stats.sentinels_nulled, 0);
    }

    #[test]
    fn test_any_null_field_drops_the_row() {
        for missing in 0..5 {
            let mut values = [Some(1.0); 5];
            values[missing] = None;
            let t = table(vec![raw("2010-01-01 00:00:00", values)]);
            let (out, _) = filter_valid(t, &TimeWindow::default(), Sentinel::default());
            assert!(out.is_empty(), "row with field {missing} missing should be dropped");
        }
    }

    #[test]
    fn test_custom_sentinel_threshold() {
        let t = table(vec![full("2010-01-01 00:00:00", -600.0)]);
        let (out, _) = filter_valid(t, &TimeWindow::default(), Sentinel { threshold: -500.0 });
        assert!(out.is_empty());
    }

    // --- Window -------------------------------------------------------------

    #[test]
    fn test_window_is_inclusive_and_order_preserved() {
        let t = table(vec![
            full("2006-12-31 23:54:00", 1.0),
            full("2007-01-01 00:00:00", 2.0),
            full("2012-06-01 12:00:00", 3.0),
            full("2017-12-31 23:54:00", 4.0),
            full("2018-01-01 00:00:00", 5.0),
        ]);
        let (out, stats) = filter_valid(t, &TimeWindow::default(), Sentinel::default());
        assert_eq!(
            keys(&out),
            vec!["2007-01-01 00:00:00", "2012-06-01 12:00:00", "2017-12-31 23:54:00"]
        );
        assert_eq!(stats.outside_window, 2);
        assert_eq!(out.rows[0].primary, 2.0);
    }

    #[test]
    fn test_every_output_row_is_complete_and_in_window() {
        let window = TimeWindow::new("2010-01-01", "2010-01-02").unwrap();
        let t = table(vec![
            full("2009-12-31 23:00:00", 1.0),
            raw("2010-01-01 01:00:00", [None, Some(1.0), Some(1.0), Some(1.0), Some(1.0)]),
            full("2010-01-01 02:00:00", -5000.0),
            full("2010-01-01 03:00:00", 1.0),
            full("2010-01-03 00:00:00", 1.0),
        ]);
        let (out, _) = filter_valid(t, &window, Sentinel::default());
        assert_eq!(out.len(), 1);
        assert!(out.times().all(|t| window.contains(&t)));
    }

    #[test]
    fn test_unparseable_key_is_dropped_not_fatal() {
        let t = table(vec![full("not a time", 1.0), full("2010-01-01 00:00:00", 1.0)]);
        let (out, stats) = filter_valid(t, &TimeWindow::default(), Sentinel::default());
        assert_eq!(out.len(), 1);
        assert_eq!(stats.unparseable_keys, 1);
        assert_eq!(stats.rows_out, 1);
    }

    // --- Range validation ---------------------------------------------------

    #[test]
    fn test_reversed_range_is_ordering_error() {
        let t = table(vec![full("2010-01-01 00:00:00", 1.0)]);
        let err = initial_data_prep(t, "2017-12-31 23:54:00", "2007-01-01 00:00:00", Sentinel::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::TimeRangeOrder { .. }), "got {:?}", err);
    }

    #[test]
    fn test_reversed_range_fails_even_for_empty_table() {
        let err = initial_data_prep(ObservationTable::default(), "2011-01-01", "2010-01-01", Sentinel::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::TimeRangeOrder { .. }));
    }

    #[test]
    fn test_initial_data_prep_with_explicit_range() {
        let t = table(vec![full("2010-01-01 00:00:00", 1.0), full("2011-01-01 00:00:00", 1.0)]);
        let out = initial_data_prep(t, "2010-06-01", "2011-06-01", Sentinel::default()).unwrap();
        assert_eq!(keys(&out), vec!["2011-01-01 00:00:00"]);
    }
}
