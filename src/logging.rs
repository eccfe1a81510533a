//! Structured logging for the water-level QC pipeline
//!
//! Every message is tagged with the pipeline stage that produced it.
//! Messages go through the `log` facade; `init_logger` installs an `env_logger` backend writing to the
//! console or appending to a file.

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use log::LevelFilter;

/// Target used for every record emitted by this crate.
pub const LOG_TARGET: &str = "tideqc";

// ---------------------------------------------------------------------------
// Pipeline stages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Ingest,
    Prep,
    Cadence,
    Split,
    Report,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Ingest => write!(f, "INGEST"),
            Stage::Prep => write!(f, "PREP"),
            Stage::Cadence => write!(f, "CADENCE"),
            Stage::Split => write!(f, "SPLIT"),
            Stage::Report => write!(f, "REPORT"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger setup
// ---------------------------------------------------------------------------

/// Installs the global logger. Calling it twice is harmless; the first
/// installation wins.
pub fn init_logger(min_level: LevelFilter, log_file: Option<&Path>, console_timestamps: bool) {
    // Already initialised by an earlier call or by the embedding program.
    let _ = build_logger(min_level, log_file, console_timestamps).try_init();
}

/// Configures the `env_logger` builder without installing it.
///
/// With `log_file` set, records are appended to that file instead of the
/// console. With `console_timestamps` off, console lines carry only level
/// and message.
pub fn build_logger(
    min_level: LevelFilter,
    log_file: Option<&Path>,
    console_timestamps: bool,
) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(min_level);

    let to_file = match log_file {
        Some(path) => match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
                true
            }
            Err(e) => {
                eprintln!("Failed to open log file {}: {}", path.display(), e);
                false
            }
        },
        None => false,
    };

    if to_file || console_timestamps {
        builder.format(|buf, record| {
            writeln!(
                buf,
                "{} {} {}",
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                record.level(),
                record.args()
            )
        });
    } else {
        builder.format(|buf, record| writeln!(buf, "   {:<5} {}", record.level(), record.args()));
    }
    builder
}

// ---------------------------------------------------------------------------
// Public logging functions
// ---------------------------------------------------------------------------

fn render(stage: Stage, message: &str) -> String {
    format!("{}: {}", stage, message)
}

pub fn info(stage: Stage, message: &str) {
    log::info!(target: LOG_TARGET, "{}", render(stage, message));
}

pub fn warn(stage: Stage, message: &str) {
    log::warn!(target: LOG_TARGET, "{}", render(stage, message));
}

pub fn error(stage: Stage, message: &str) {
    log::error!(target: LOG_TARGET, "{}", render(stage, message));
}

pub fn debug(stage: Stage, message: &str) {
    log::debug!(target: LOG_TARGET, "{}", render(stage, message));
}

// ---------------------------------------------------------------------------
// Stage summaries
// ---------------------------------------------------------------------------

/// Logs how many rows a stage kept. A stage that empties a non-empty table
/// is a warning: the window or cadence is probably wrong for the station.
pub fn log_stage_summary(stage: Stage, rows_in: usize, rows_out: usize) {
    let message = stage_summary_message(rows_in, rows_out);
    if rows_in > 0 && rows_out == 0 {
        warn(stage, &message);
    } else {
        info(stage, &message);
    }
}

fn stage_summary_message(rows_in: usize, rows_out: usize) -> String {
    format!(
        "{}/{} rows kept, {} dropped",
        rows_out,
        rows_in,
        rows_in.saturating_sub(rows_out)
    )
}
