//! Station file ingestion.
//!
//! Submodules:
//! - `water_levels`: reads a CO-OPS water-level export into an `ObservationTable`.

pub mod water_levels;

pub use water_levels::{read_water_levels, read_water_levels_from_reader};
