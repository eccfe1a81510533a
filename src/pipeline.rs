//! End-to-end pipeline: load → filter → deduplicate → split.
//!
//! `Pipeline` holds the configuration and chains the stages; it does no
//! processing of its own beyond bookkeeping for `PipelineSummary`.

use std::path::Path;

use serde::Serialize;

use crate::config::PipelineConfig;
use crate::ingest::read_water_levels;
use crate::logging::{self, Stage};
use crate::model::{CleanedTable, FeatureMatrix, ObservationTable, PipelineError, TargetVector};
use crate::prep::{filter_valid, remove_extra_datapoints, split::split};
use crate::report::{GapCsvReporter, LogReporter, Reporter, ReporterSet, SvgReporter};
use crate::timestamps::format_timestamp;

/// Row accounting for a full run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineSummary {
    pub source: String,
    pub window_start: String,
    pub window_end: String,
    pub interval_minutes: u32,
    pub rows_read: usize,
    pub sentinels_nulled: usize,
    pub incomplete_rows: usize,
    pub unparseable_keys: usize,
    pub outside_window: usize,
    pub off_grid: usize,
    pub rows_kept: usize,
    pub good_points: usize,
    pub flagged_points: usize,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub cleaned: CleanedTable,
    pub features: FeatureMatrix,
    pub target: TargetVector,
    pub summary: PipelineSummary,
}

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Reads `path` and runs every stage.
    pub fn run(
        &self,
        path: &Path,
        reporter: Option<&mut dyn Reporter>,
    ) -> Result<PreparedData, PipelineError> {
        let table = read_water_levels(path).inspect_err(|e| {
            logging::error(Stage::Ingest, &e.to_string());
        })?;
        Ok(self.run_table(table, &path.display().to_string(), reporter))
    }

    /// Runs the stages on an already-loaded table. `source` labels the
    /// summary.
    pub fn run_table(
        &self,
        table: ObservationTable,
        source: &str,
        reporter: Option<&mut dyn Reporter>,
    ) -> PreparedData {
        let cfg = &self.config;

        let (prepared, validity) = filter_valid(table, &cfg.window, cfg.sentinel);
        let cleaned = remove_extra_datapoints(prepared, cfg.interval, reporter);
        let (features, target) = split(&cleaned);

        let good_points = target.positives();
        let summary = PipelineSummary {
            source: source.to_string(),
            window_start: format_timestamp(&cfg.window.start()),
            window_end: format_timestamp(&cfg.window.end()),
            interval_minutes: cfg.interval.minutes(),
            rows_read: validity.rows_in,
            sentinels_nulled: validity.sentinels_nulled,
            incomplete_rows: validity.incomplete_rows,
            unparseable_keys: validity.unparseable_keys,
            outside_window: validity.outside_window,
            off_grid: validity.rows_out - cleaned.len(),
            rows_kept: cleaned.len(),
            good_points,
            flagged_points: cleaned.len() - good_points,
        };

        PreparedData { cleaned, features, target, summary }
    }

    /// Reporters implied by the `[report]` config: `None` when figures are
    /// suppressed, otherwise a log summary plus SVG and CSV files when an
    /// output directory is set.
    pub fn configured_reporters(&self) -> Option<ReporterSet> {
        let report = &self.config.report;
        if report.suppress_figures {
            return None;
        }
        let mut set = ReporterSet::default();
        set.push(Box::new(LogReporter));
        if let Some(dir) = &report.output_dir {
            set.push(Box::new(SvgReporter::new(dir)));
            set.push(Box::new(GapCsvReporter::new(dir)));
        }
        Some(set)
    }
}
