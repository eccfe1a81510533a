//! Water-level export reader.
//!
//! Reads a delimited text file with a header row and pulls out the six
//! columns the pipeline uses:
//!
//! | source column       | field        |
//! |---------------------|--------------|
//! | `DATE_TIME`         | row key      |
//! | `A1_WL_VALUE_MSL`   | `primary`    |
//! | `A1_WL_SIGMA`       | `sigma`      |
//! | `B1_WL_VALUE_MSL`   | `backup`     |
//! | `VER_WL_VALUE_MSL`  | `verified`   |
//! | `PRED_WL_VALUE_MSL` | `prediction` |
//!
//! Other columns are ignored. `DATE_TIME` is kept as raw text. Values that
//! are empty or not numbers become `None`; the file itself must be
//! well-formed or the whole read fails.

use std::io::Read;
use std::path::Path;

use crate::logging::{self, Stage};
use crate::model::{COL_DATE_TIME, ObservationTable, PipelineError, RawObservation, VALUE_COLUMNS};

/// Reads a station file from disk.
pub fn read_water_levels(path: &Path) -> Result<ObservationTable, PipelineError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| PipelineError::FileUnreadable {
            path: path.to_path_buf(),
            source,
        })?;
    read_records(reader, path)
}

/// Reads station data from any reader. `origin` names the source in errors.
pub fn read_water_levels_from_reader<R: Read>(
    input: R,
    origin: &Path,
) -> Result<ObservationTable, PipelineError> {
    let reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);
    read_records(reader, origin)
}

fn read_records<R: Read>(
    mut reader: csv::Reader<R>,
    origin: &Path,
) -> Result<ObservationTable, PipelineError> {
    let malformed = |source: csv::Error| PipelineError::MalformedFile {
        path: origin.to_path_buf(),
        source,
    };

    let headers = reader.headers().map_err(malformed)?.clone();
    let position = |name: &str| headers.iter().position(|h| h == name);

    let mut missing = Vec::new();
    let key_idx = position(COL_DATE_TIME);
    if key_idx.is_none() {
        missing.push(COL_DATE_TIME.to_string());
    }
    let mut value_idx = [0usize; 5];
    for (slot, name) in value_idx.iter_mut().zip(VALUE_COLUMNS) {
        match position(name) {
            Some(i) => *slot = i,
            None => missing.push(name.to_string()),
        }
    }
    let key_idx = match key_idx {
        Some(i) if missing.is_empty() => i,
        _ => {
            return Err(PipelineError::MissingColumns {
                path: origin.to_path_buf(),
                missing,
            });
        }
    };

    let mut rows = Vec::new();
    let mut coerced = 0usize;

    for result in reader.records() {
        let record = result.map_err(malformed)?;
        let field = |i: usize| record.get(i).unwrap_or("");

        let mut values = [None; 5];
        for (value, idx) in values.iter_mut().zip(value_idx) {
            *value = coerce_numeric(field(idx));
            if value.is_none() {
                coerced += 1;
            }
        }
        let [primary, sigma, backup, verified, prediction] = values;

        rows.push(RawObservation {
            key: field(key_idx).to_string(),
            primary,
            sigma,
            backup,
            verified,
            prediction,
        });
    }

    logging::info(
        Stage::Ingest,
        &format!(
            "{}: {} values missing or non-numeric",
            origin.display(),
            coerced
        ),
    );
    logging::log_stage_summary(Stage::Ingest, rows.len(), rows.len());

    Ok(ObservationTable { rows })
}

/// Parses a cell as a number. Empty text, non-numeric text and NaN all
/// become `None`.
fn coerce_numeric(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    const HEADER: &str = "STATION_ID,DATE_TIME,A1_WL_VALUE_MSL,A1_WL_SIGMA,B1_WL_VALUE_MSL,\
                          VER_WL_VALUE_MSL,PRED_WL_VALUE_MSL,DATUM";

    fn read(text: &str) -> Result<ObservationTable, PipelineError> {
        read_water_levels_from_reader(text.as_bytes(), Path::new("fixture.csv"))
    }

    #[test]
    fn test_selects_and_renames_the_five_value_columns() {
        let text = format!("{HEADER}\n8536110,2010-01-01 00:00:00,1.1,0.01,1.2,1.1,1.0,MSL\n");
        let table = read(&text).expect("well-formed fixture should load");
        assert_eq!(table.len(), 1);
        let row = &table.rows[0];
        assert_eq!(row.key, "2010-01-01 00:00:00");
        assert_eq!(row.primary, Some(1.1));
        assert_eq!(row.sigma, Some(0.01));
        assert_eq!(row.backup, Some(1.2));
        assert_eq!(row.verified, Some(1.1));
        assert_eq!(row.prediction, Some(1.0));
    }

    #[test]
    fn test_column_order_in_file_does_not_matter() {
        let text = "PRED_WL_VALUE_MSL,VER_WL_VALUE_MSL,B1_WL_VALUE_MSL,A1_WL_SIGMA,A1_WL_VALUE_MSL,DATE_TIME\n\
                    5,4,3,2,1,2010-01-01 00:06\n";
        let row = read(text).unwrap().rows.remove(0);
        assert_eq!(
            [row.primary, row.sigma, row.backup, row.verified, row.prediction],
            [Some(1.0), Some(2.0), Some(3.0), Some(4.0), Some(5.0)]
        );
    }

    #[test]
    fn test_non_numeric_values_coerce_to_none() {
        let text = format!("{HEADER}\n8536110,2010-01-01 00:00:00,abc,,NaN,1.1, ,MSL\n");
        let row = read(&text).unwrap().rows.remove(0);
        assert_eq!(row.primary, None);
        assert_eq!(row.sigma, None);
        assert_eq!(row.backup, None);
        assert_eq!(row.verified, Some(1.1));
        assert_eq!(row.prediction, None);
    }

    #[test]
    fn test_sentinel_values_are_kept_as_numbers_at_load_time() {
        let text = format!("{HEADER}\n8536110,2010-01-01 00:00:00,-99999,0.01,1.2,1.1,1.0,MSL\n");
        let row = read(&text).unwrap().rows.remove(0);
        assert_eq!(row.primary, Some(-99999.0));
    }

    #[test]
    fn test_key_is_not_parsed() {
        let text = format!("{HEADER}\n8536110,garbage,1,1,1,1,1,MSL\n");
        let row = read(&text).unwrap().rows.remove(0);
        assert_eq!(row.key, "garbage");
    }

    #[test]
    fn test_missing_columns_are_all_reported() {
        let text = "DATE_TIME,A1_WL_VALUE_MSL,B1_WL_VALUE_MSL\n2010-01-01,1,1\n";
        match read(text) {
            Err(PipelineError::MissingColumns { missing, .. }) => {
                assert_eq!(missing, vec!["A1_WL_SIGMA", "VER_WL_VALUE_MSL", "PRED_WL_VALUE_MSL"]);
            }
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_key_column_is_reported() {
        let text = "A1_WL_VALUE_MSL,A1_WL_SIGMA,B1_WL_VALUE_MSL,VER_WL_VALUE_MSL,PRED_WL_VALUE_MSL\n";
        match read(text) {
            Err(PipelineError::MissingColumns { missing, .. }) => assert_eq!(missing, vec!["DATE_TIME"]),
            other => panic!("expected MissingColumns, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_row_is_malformed_file() {
        let text = format!("{HEADER}\n8536110,2010-01-01 00:00:00,1,1\n");
        assert!(matches!(read(&text), Err(PipelineError::MalformedFile { .. })));
    }

    #[test]
    fn test_header_only_file_is_empty_table() {
        let table = read(&format!("{HEADER}\n")).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_nonexistent_path_is_file_unreadable() {
        let path = PathBuf::from("/nonexistent/dir/station.csv");
        assert!(matches!(
            read_water_levels(&path),
            Err(PipelineError::FileUnreadable { .. })
        ));
    }

    #[test]
    fn test_coerce_numeric() {
        assert_eq!(coerce_numeric("1.25"), Some(1.25));
        assert_eq!(coerce_numeric(" -0.5 "), Some(-0.5));
        assert_eq!(coerce_numeric("1e3"), Some(1000.0));
        assert_eq!(coerce_numeric(""), None);
        assert_eq!(coerce_numeric("nan"), None);
        assert_eq!(coerce_numeric("n/a"), None);
    }
}
