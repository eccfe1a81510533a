//! Tide gauge water-level preparation for QC labelling.
//!
//! Reads a CO-OPS water-level export, removes missing and sentinel values,
//! restricts it to a time window, drops readings between sampling ticks,
//! and splits the result into a feature matrix and a `goodPts` target that
//! marks readings the agency kept unchanged after review.
//!
//! ```no_run
//! use std::path::Path;
//! use tideqc::{config::PipelineConfig, pipeline::Pipeline};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let data = pipeline.run(Path::new("capemay_2007_2017.csv"), None)?;
//! println!("{} rows, {} good", data.summary.rows_kept, data.summary.good_points);
//! # Ok::<(), tideqc::model::PipelineError>(())
//! ```

pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod prep;
pub mod report;
pub mod stations;
pub mod timestamps;
