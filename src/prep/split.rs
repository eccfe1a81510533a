//! Feature/target split.
//!
//! The target is the QC outcome: whether agency review kept the primary
//! sensor reading as the verified value. The verified column is therefore
//! never a feature.

use crate::logging::{self, Stage};
use crate::model::{CleanedTable, FEATURE_COLUMNS, FeatureMatrix, TARGET_COLUMN, TargetVector};

/// Projects each row onto `primary, sigma, backup, prediction`.
pub fn find_features(table: &CleanedTable) -> FeatureMatrix {
    FeatureMatrix {
        columns: FEATURE_COLUMNS,
        rows: table
            .rows
            .iter()
            .map(|r| [r.primary, r.sigma, r.backup, r.prediction])
            .collect(),
    }
}

/// `goodPts`: 1 where `verified == primary` exactly, 0 otherwise.
///
/// Both values come from the same upstream export, so equality is exact;
/// a tolerance would label adjusted readings as good.
pub fn find_target(table: &CleanedTable) -> TargetVector {
    let values: Vec<u8> = table
        .rows
        .iter()
        .map(|r| u8::from(r.verified == r.primary))
        .collect();
    TargetVector {
        name: TARGET_COLUMN,
        values,
    }
}

/// Both halves at once, with a log line on label balance.
pub fn split(table: &CleanedTable) -> (FeatureMatrix, TargetVector) {
    let features = find_features(table);
    let target = find_target(table);
    logging::info(
        Stage::Split,
        &format!(
            "{} labelled good, {} flagged",
            target.positives(),
            target.values.len() - target.positives()
        ),
    );
    logging::log_stage_summary(Stage::Split, table.len(), target.values.len());
    (features, target)
}
