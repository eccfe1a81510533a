//! Core data types for the tidal water-level QC pipeline.
//!
//! This module defines the shared domain model imported by all other modules:
//! the table produced at each pipeline stage, the feature/target outputs, and
//! the crate-wide error type. It contains no I/O.

use std::path::PathBuf;

use chrono::NaiveDateTime;
use thiserror::Error;

// ---------------------------------------------------------------------------
// Source columns
// ---------------------------------------------------------------------------

/// Timestamp column used as the row key.
pub const COL_DATE_TIME: &str = "DATE_TIME";

/// Source columns for the five numeric fields, in canonical order:
/// primary, sigma, backup, verified, prediction.
pub const VALUE_COLUMNS: [&str; 5] = [
    "A1_WL_VALUE_MSL",
    "A1_WL_SIGMA",
    "B1_WL_VALUE_MSL",
    "VER_WL_VALUE_MSL",
    "PRED_WL_VALUE_MSL",
];

/// Column names of the feature matrix. `verified` is never a feature.
pub const FEATURE_COLUMNS: [&str; 4] = ["primary", "sigma", "backup", "prediction"];

/// Name of the single target column.
pub const TARGET_COLUMN: &str = "goodPts";

// ---------------------------------------------------------------------------
// Loader output
// ---------------------------------------------------------------------------

/// One row as read from a station file. `None` marks a value that was
/// empty or could not be coerced to a number.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub key: String, // DATE_TIME text, unparsed
    pub primary: Option<f64>,
    pub sigma: Option<f64>,
    pub backup: Option<f64>,
    pub verified: Option<f64>,
    pub prediction: Option<f64>,
}

impl RawObservation {
    /// Mutable access to the five value fields in canonical order.
    pub fn values_mut(&mut self) -> [&mut Option<f64>; 5] {
        [
            &mut self.primary,
            &mut self.sigma,
            &mut self.backup,
            &mut self.verified,
            &mut self.prediction,
        ]
    }
}

/// Loader output, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObservationTable {
    pub rows: Vec<RawObservation>,
}

impl ObservationTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Filtered / cleaned rows
// ---------------------------------------------------------------------------

/// A fully populated observation with its timestamp materialised.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub time: NaiveDateTime,
    pub primary: f64,
    pub sigma: f64,
    pub backup: f64,
    pub verified: f64,
    pub prediction: f64,
}

/// Output of the validity filter. The ordinal index is the `Vec` position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PreparedTable {
    pub rows: Vec<Observation>,
}

/// Output of the cadence deduplicator: every timestamp sits on the
/// sampling grid.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CleanedTable {
    pub rows: Vec<Observation>,
}

macro_rules! table_len {
    ($($t:ty),*) => {$(
        impl $t {
            pub fn len(&self) -> usize {
                self.rows.len()
            }

            pub fn is_empty(&self) -> bool {
                self.rows.is_empty()
            }

            pub fn times(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
                self.rows.iter().map(|r| r.time)
            }
        }
    )*};
}

table_len!(PreparedTable, CleanedTable);

// ---------------------------------------------------------------------------
// Split outputs
// ---------------------------------------------------------------------------

/// Feature matrix: one `[primary, sigma, backup, prediction]` row per
/// observation.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    pub columns: [&'static str; 4],
    pub rows: Vec<[f64; 4]>,
}

impl FeatureMatrix {
    /// Values of a named column, or `None` if the matrix has no such column.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.columns.iter().position(|c| *c == name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }
}

/// QC label per observation: 1 when the verified reading equals the
/// primary reading, 0 otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetVector {
    pub name: &'static str,
    pub values: Vec<u8>,
}

impl TargetVector {
    pub fn positives(&self) -> usize {
        self.values.iter().filter(|v| **v == 1).count()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors surfaced by the pipeline. Malformed individual values never end
/// up here; they are coerced to missing and dropped by the filter.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The station file could not be opened.
    #[error("cannot read {}: {source}", path.display())]
    FileUnreadable {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// The header is missing one or more required columns.
    #[error("{} is missing required columns: {}", path.display(), missing.join(", "))]
    MissingColumns { path: PathBuf, missing: Vec<String> },
    /// The file is not well-formed delimited text.
    #[error("malformed file {}: {source}", path.display())]
    MalformedFile {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    /// A window bound could not be parsed as a timestamp.
    #[error("invalid timestamp: '{0}'")]
    InvalidTimestamp(String),
    /// The window start is after its end.
    #[error("the start time {start} is after the ending time {end}")]
    TimeRangeOrder { start: String, end: String },
    /// Sampling interval does not divide an hour evenly.
    #[error("sampling interval of {0} minutes must be between 1 and 60 and divide 60")]
    InvalidSamplingInterval(u32),
    /// Configuration file could not be read or parsed.
    #[error("config error in {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
    /// A diagnostics artefact could not be written.
    #[error("report error: {0}")]
    Report(String),
}
