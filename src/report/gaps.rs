//! Gap series as CSV, for plotting in external tools.
//!
//! Long format, one row per gap: `series,index,seconds` where `series` is
//! `original` or `cleaned`.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::logging::{self, Stage};
use crate::model::PipelineError;

use super::{CadenceDiagnostics, Reporter};

pub const GAPS_FILE_NAME: &str = "time_differences.csv";

#[derive(Debug, Serialize)]
struct GapRow<'a> {
    series: &'a str,
    index: usize,
    seconds: i64,
}

#[derive(Debug, Clone)]
pub struct GapCsvReporter {
    output_dir: PathBuf,
}

impl GapCsvReporter {
    pub fn new(output_dir: &Path) -> Self {
        Self { output_dir: output_dir.to_path_buf() }
    }

    pub fn path(&self) -> PathBuf {
        self.output_dir.join(GAPS_FILE_NAME)
    }
}

impl Reporter for GapCsvReporter {
    fn cadence(&mut self, diagnostics: &CadenceDiagnostics) -> Result<(), PipelineError> {
        let path = self.path();
        let report_err = |msg: String| PipelineError::Report(format!("{}: {}", path.display(), msg));

        std::fs::create_dir_all(&self.output_dir).map_err(|e| report_err(e.to_string()))?;
        let mut writer = csv::Writer::from_path(&path).map_err(|e| report_err(e.to_string()))?;
        write_gaps(&mut writer, diagnostics).map_err(|e| report_err(e.to_string()))?;
        writer.flush().map_err(|e| report_err(e.to_string()))?;

        logging::info(Stage::Report, &format!("wrote {}", path.display()));
        Ok(())
    }
}

fn write_gaps<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    diagnostics: &CadenceDiagnostics,
) -> Result<(), csv::Error> {
    for (series, gaps) in [("original", &diagnostics.original), ("cleaned", &diagnostics.cleaned)] {
        for (index, seconds) in gaps.iter().enumerate() {
            writer.serialize(GapRow { series, index, seconds: *seconds })?;
        }
    }
    Ok(())
}
