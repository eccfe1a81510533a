//! Stacked line plots of timestamp gaps.
//!
//! Two panels, "Original Time Differences" above "Cleaned Time
//! Differences", each plotting gap length (minutes) against sample index.
//! A clean series plots as a flat line at the sampling interval.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::logging::{self, Stage};
use crate::model::PipelineError;

use super::{CadenceDiagnostics, Reporter};

pub const PLOT_FILE_NAME: &str = "time_differences.svg";

const WIDTH: f64 = 800.0;
const PANEL_HEIGHT: f64 = 280.0;
const MARGIN: f64 = 48.0;

/// Writes the SVG to `<output_dir>/time_differences.svg`.
#[derive(Debug, Clone)]
pub struct SvgReporter {
    output_dir: PathBuf,
}

impl SvgReporter {
    pub fn new(output_dir: &Path) -> Self {
        Self { output_dir: output_dir.to_path_buf() }
    }

    pub fn path(&self) -> PathBuf {
        self.output_dir.join(PLOT_FILE_NAME)
    }
}

impl Reporter for SvgReporter {
    fn cadence(&mut self, diagnostics: &CadenceDiagnostics) -> Result<(), PipelineError> {
        let path = self.path();
        std::fs::create_dir_all(&self.output_dir)
            .and_then(|_| std::fs::write(&path, render_svg(diagnostics)))
            .map_err(|e| PipelineError::Report(format!("{}: {}", path.display(), e)))?;
        logging::info(Stage::Report, &format!("wrote {}", path.display()));
        Ok(())
    }
}

/// Renders both gap series as a standalone SVG document.
pub fn render_svg(diagnostics: &CadenceDiagnostics) -> String {
    let height = PANEL_HEIGHT * 2.0;
    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{WIDTH}" height="{height}" viewBox="0 0 {WIDTH} {height}">"#
    );
    let _ = writeln!(svg, r#"<rect width="100%" height="100%" fill="white"/>"#);
    panel(&mut svg, "Original Time Differences", &diagnostics.original, 0.0);
    panel(&mut svg, "Cleaned Time Differences", &diagnostics.cleaned, PANEL_HEIGHT);
    svg.push_str("</svg>\n");
    svg
}

fn panel(svg: &mut String, title: &str, gaps: &[i64], top: f64) {
    let left = MARGIN;
    let right = WIDTH - MARGIN / 2.0;
    let y_top = top + MARGIN;
    let y_bottom = top + PANEL_HEIGHT - MARGIN / 2.0;

    let _ = writeln!(
        svg,
        r#"<text x="{}" y="{}" font-family="sans-serif" font-size="14" text-anchor="middle">{}</text>"#,
        WIDTH / 2.0,
        top + MARGIN / 2.0,
        title
    );
    let _ = writeln!(
        svg,
        r#"<rect x="{left}" y="{y_top}" width="{}" height="{}" fill="none" stroke="black"/>"#,
        right - left,
        y_bottom - y_top
    );

    if gaps.is_empty() {
        return;
    }
    let minutes: Vec<f64> = gaps.iter().map(|s| *s as f64 / 60.0).collect();
    let (lo, hi) = minutes
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)));
    // Pad a flat series so it draws mid-panel rather than on the frame.
    let (lo, hi) = if hi > lo { (lo, hi) } else { (lo - 1.0, hi + 1.0) };

    for (value, y) in [(hi, y_top), (lo, y_bottom)] {
        let _ = writeln!(
            svg,
            r#"<text x="{}" y="{}" font-family="sans-serif" font-size="10" text-anchor="end">{:.1}</text>"#,
            left - 4.0,
            y + 3.0,
            value
        );
    }

    let x_step = if minutes.len() > 1 {
        (right - left) / (minutes.len() - 1) as f64
    } else {
        0.0
    };
    let points: Vec<String> = minutes
        .iter()
        .enumerate()
        .map(|(i, v)| {
            let x = left + i as f64 * x_step;
            let y = y_bottom - (v - lo) / (hi - lo) * (y_bottom - y_top);
            format!("{:.2},{:.2}", x, y)
        })
        .collect();
    let _ = writeln!(
        svg,
        r#"<polyline fill="none" stroke="steelblue" stroke-width="1" points="{}"/>"#,
        points.join(" ")
    );
}
