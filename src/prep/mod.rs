//! Cleaning stages, applied in order:
//!
//! ```text
//!   ObservationTable ── validity ──▶ PreparedTable ── cadence ──▶ CleanedTable ── split ──▶ features, target
//! ```
//!
//! Submodules:
//! - `validity`: sentinel masking, null dropping, time window.
//! - `cadence` : keeps only rows on the sampling grid.
//! - `split`   : feature matrix and `goodPts` target.

pub mod cadence;
pub mod split;
pub mod validity;

pub use cadence::remove_extra_datapoints;
pub use split::{find_features, find_target};
pub use validity::{ValidityStats, filter_valid, initial_data_prep};
