//! Diagnostics reporting.
//!
//! The cleaning stages never draw anything themselves. When a caller wants
//! diagnostics it hands a `Reporter` to the cadence stage, which passes it
//! the timestamp gaps before and after filtering. A failing reporter is
//! logged and otherwise ignored.
//!
//! Submodules:
//! - `plot` : stacked SVG line plots of the gap series.
//! - `gaps` : the gap series as CSV.
//! - `map`  : Leaflet/GeoJSON rendering of station locations.

pub mod gaps;
pub mod map;
pub mod plot;

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::logging::{self, Stage};
use crate::model::PipelineError;

pub use gaps::GapCsvReporter;
pub use plot::SvgReporter;

// ---------------------------------------------------------------------------
// Diagnostics payload
// ---------------------------------------------------------------------------

/// Consecutive timestamp differences, in seconds, before and after the
/// cadence filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CadenceDiagnostics {
    pub original: Vec<i64>,
    pub cleaned: Vec<i64>,
}

impl CadenceDiagnostics {
    pub fn new<I, J>(original: I, cleaned: J) -> Self
    where
        I: IntoIterator<Item = NaiveDateTime>,
        J: IntoIterator<Item = NaiveDateTime>,
    {
        Self {
            original: time_differences(original),
            cleaned: time_differences(cleaned),
        }
    }

    pub fn summary(&self) -> (GapSummary, GapSummary) {
        (GapSummary::of(&self.original), GapSummary::of(&self.cleaned))
    }
}

/// Differences between consecutive timestamps, in seconds. `n` timestamps
/// give `n - 1` differences.
pub fn time_differences<I>(times: I) -> Vec<i64>
where
    I: IntoIterator<Item = NaiveDateTime>,
{
    let times: Vec<NaiveDateTime> = times.into_iter().collect();
    times
        .windows(2)
        .map(|w| (w[1] - w[0]).num_seconds())
        .collect()
}

/// Compact description of one gap series.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct GapSummary {
    pub count: usize,
    pub min_seconds: Option<i64>,
    pub max_seconds: Option<i64>,
    /// Gap length in seconds → number of occurrences.
    pub histogram: BTreeMap<i64, usize>,
}

impl GapSummary {
    pub fn of(gaps: &[i64]) -> Self {
        let mut histogram = BTreeMap::new();
        for g in gaps {
            *histogram.entry(*g).or_insert(0) += 1;
        }
        Self {
            count: gaps.len(),
            min_seconds: gaps.iter().copied().min(),
            max_seconds: gaps.iter().copied().max(),
            histogram,
        }
    }

    /// True when every gap has the same length.
    pub fn is_uniform(&self) -> bool {
        self.histogram.len() <= 1
    }
}

// ---------------------------------------------------------------------------
// Reporter interface
// ---------------------------------------------------------------------------

pub trait Reporter {
    fn cadence(&mut self, diagnostics: &CadenceDiagnostics) -> Result<(), PipelineError>;
}

/// Writes gap summaries to the log.
#[derive(Debug, Default)]
pub struct LogReporter;

impl Reporter for LogReporter {
    fn cadence(&mut self, diagnostics: &CadenceDiagnostics) -> Result<(), PipelineError> {
        let (before, after) = diagnostics.summary();
        for (label, s) in [("original", &before), ("cleaned", &after)] {
            logging::info(
                Stage::Report,
                &format!(
                    "{} gaps: {} intervals, min {:?}s, max {:?}s, {} distinct",
                    label,
                    s.count,
                    s.min_seconds,
                    s.max_seconds,
                    s.histogram.len()
                ),
            );
        }
        if !after.is_uniform() {
            logging::warn(
                Stage::Report,
                "cleaned series still has irregular gaps (missing ticks)",
            );
        }
        Ok(())
    }
}

/// Keeps every diagnostics payload it receives.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    pub received: Vec<CadenceDiagnostics>,
}

impl Reporter for MemoryReporter {
    fn cadence(&mut self, diagnostics: &CadenceDiagnostics) -> Result<(), PipelineError> {
        self.received.push(diagnostics.clone());
        Ok(())
    }
}

/// Fans one payload out to several reporters. Every reporter runs; the
/// first error is returned.
#[derive(Default)]
pub struct ReporterSet {
    reporters: Vec<Box<dyn Reporter>>,
}

impl ReporterSet {
    pub fn push(&mut self, reporter: Box<dyn Reporter>) {
        self.reporters.push(reporter);
    }

    pub fn len(&self) -> usize {
        self.reporters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reporters.is_empty()
    }
}

impl Reporter for ReporterSet {
    fn cadence(&mut self, diagnostics: &CadenceDiagnostics) -> Result<(), PipelineError> {
        let mut first_err = None;
        for r in &mut self.reporters {
            if let Err(e) = r.cadence(diagnostics) {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
