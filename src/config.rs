//! Pipeline configuration.
//!
//! Station-specific parameters (valid time window, sampling cadence, missing
//! data sentinel) are passed in explicitly rather than baked into the
//! pipeline stages. They can be loaded from a TOML file, located either
//! directly or through the `TIDEQC_CONFIG` environment variable (a `.env`
//! file in the working directory is honoured).
//!
//! ```toml
//! [window]
//! start = "2007-01-01 00:00:00"
//! end   = "2017-12-31 23:54:00"
//!
//! [cadence]
//! interval_minutes = 6
//!
//! [sentinel]
//! threshold = -1000.0
//! ```

use std::path::{Path, PathBuf};

use chrono::{NaiveDateTime, Timelike};
use serde::Deserialize;

use crate::model::PipelineError;
use crate::timestamps::parse_timestamp;

/// Environment variable naming the config file.
pub const CONFIG_ENV_VAR: &str = "TIDEQC_CONFIG";

pub const DEFAULT_WINDOW_START: &str = "2007-01-01 00:00:00";
pub const DEFAULT_WINDOW_END: &str = "2017-12-31 23:54:00";
pub const DEFAULT_INTERVAL_MINUTES: u32 = 6;

/// Station exports encode "no data" as -99999; anything at or below this
/// is treated as missing.
pub const DEFAULT_SENTINEL_THRESHOLD: f64 = -1000.0;

// ---------------------------------------------------------------------------
// Time window
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` range of timestamps to keep.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeWindow {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl TimeWindow {
    /// Parses both bounds. Fails with `InvalidTimestamp` if either bound is
    /// unparseable and with `TimeRangeOrder` if start is after end.
    pub fn new(start: &str, end: &str) -> Result<Self, PipelineError> {
        let s = parse_timestamp(start)
            .ok_or_else(|| PipelineError::InvalidTimestamp(start.to_string()))?;
        let e = parse_timestamp(end)
            .ok_or_else(|| PipelineError::InvalidTimestamp(end.to_string()))?;
        Self::from_bounds(s, e)
    }

    pub fn from_bounds(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, PipelineError> {
        if start > end {
            return Err(PipelineError::TimeRangeOrder {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    /// Both ends inclusive.
    pub fn contains(&self, t: &NaiveDateTime) -> bool {
        *t >= self.start && *t <= self.end
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        // Both literals are valid and ordered; parse failure here is a typo.
        Self::new(DEFAULT_WINDOW_START, DEFAULT_WINDOW_END)
            .unwrap_or_else(|e| panic!("default time window is invalid: {e}"))
    }
}

// ---------------------------------------------------------------------------
// Sampling interval
// ---------------------------------------------------------------------------

/// Expected sampling cadence in whole minutes. Only divisors of 60 are
/// accepted so that the grid repeats every hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplingInterval(u32);

impl SamplingInterval {
    pub fn from_minutes(minutes: u32) -> Result<Self, PipelineError> {
        if minutes == 0 || minutes > 60 || 60 % minutes != 0 {
            return Err(PipelineError::InvalidSamplingInterval(minutes));
        }
        Ok(Self(minutes))
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }

    /// Whether the timestamp's minute-of-hour lies on the grid.
    pub fn on_grid(&self, t: &NaiveDateTime) -> bool {
        t.minute() % self.0 == 0
    }
}

impl Default for SamplingInterval {
    fn default() -> Self {
        Self(DEFAULT_INTERVAL_MINUTES)
    }
}

// ---------------------------------------------------------------------------
// Sentinel
// ---------------------------------------------------------------------------

/// Missing-data marker: any value at or below `threshold`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sentinel {
    pub threshold: f64,
}

impl Sentinel {
    pub fn is_missing(&self, value: f64) -> bool {
        value <= self.threshold
    }
}

impl Default for Sentinel {
    fn default() -> Self {
        Self { threshold: DEFAULT_SENTINEL_THRESHOLD }
    }
}

// ---------------------------------------------------------------------------
// Report and logging options
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportConfig {
    /// Skip the cadence diagnostics entirely.
    pub suppress_figures: bool,
    /// Directory for SVG/CSV/HTML artefacts. No files are written when unset.
    pub output_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub level: log::LevelFilter,
    pub file: Option<PathBuf>,
    pub console_timestamps: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: log::LevelFilter::Info,
            file: None,
            console_timestamps: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Full configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineConfig {
    pub window: TimeWindow,
    pub interval: SamplingInterval,
    pub sentinel: Sentinel,
    pub report: ReportConfig,
    pub logging: LogConfig,
}

// On-disk layout. Every table and key is optional.

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    window: WindowSection,
    #[serde(default)]
    cadence: CadenceSection,
    #[serde(default)]
    sentinel: SentinelSection,
    #[serde(default)]
    report: ReportSection,
    #[serde(default)]
    logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowSection {
    #[serde(default = "default_start")]
    start: String,
    #[serde(default = "default_end")]
    end: String,
}

impl Default for WindowSection {
    fn default() -> Self {
        Self { start: default_start(), end: default_end() }
    }
}

fn default_start() -> String {
    DEFAULT_WINDOW_START.to_string()
}

fn default_end() -> String {
    DEFAULT_WINDOW_END.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CadenceSection {
    #[serde(default = "default_interval")]
    interval_minutes: u32,
}

impl Default for CadenceSection {
    fn default() -> Self {
        Self { interval_minutes: DEFAULT_INTERVAL_MINUTES }
    }
}

fn default_interval() -> u32 {
    DEFAULT_INTERVAL_MINUTES
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SentinelSection {
    #[serde(default = "default_threshold")]
    threshold: f64,
}

impl Default for SentinelSection {
    fn default() -> Self {
        Self { threshold: DEFAULT_SENTINEL_THRESHOLD }
    }
}

fn default_threshold() -> f64 {
    DEFAULT_SENTINEL_THRESHOLD
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReportSection {
    #[serde(default)]
    suppress_figures: bool,
    output_dir: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct LoggingSection {
    level: Option<String>,
    file: Option<PathBuf>,
    console_timestamps: Option<bool>,
}

impl PipelineConfig {
    /// Parses configuration from TOML text. `origin` is only used in error
    /// messages.
    pub fn from_toml_str(text: &str, origin: &Path) -> Result<Self, PipelineError> {
        let config_err = |message: String| PipelineError::Config {
            path: origin.to_path_buf(),
            message,
        };

        let file: ConfigFile = toml::from_str(text).map_err(|e| config_err(e.to_string()))?;

        let window = TimeWindow::new(&file.window.start, &file.window.end)?;
        let interval = SamplingInterval::from_minutes(file.cadence.interval_minutes)?;

        let level = match file.logging.level.as_deref() {
            None => log::LevelFilter::Info,
            Some(s) => s
                .parse::<log::LevelFilter>()
                .map_err(|_| config_err(format!("unknown log level '{s}'")))?,
        };

        Ok(Self {
            window,
            interval,
            sentinel: Sentinel { threshold: file.sentinel.threshold },
            report: ReportConfig {
                suppress_figures: file.report.suppress_figures,
                output_dir: file.report.output_dir,
            },
            logging: LogConfig {
                level,
                file: file.logging.file,
                console_timestamps: file.logging.console_timestamps.unwrap_or(true),
            },
        })
    }

    /// Reads and parses a TOML config file.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        let text = std::fs::read_to_string(path).map_err(|e| PipelineError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_toml_str(&text, path)
    }

    /// Loads the file named by `TIDEQC_CONFIG` (after reading `.env`), or
    /// falls back to defaults when the variable is unset.
    pub fn from_env() -> Result<Self, PipelineError> {
        dotenv::dotenv().ok();
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) => Self::load(Path::new(&path)),
            Err(_) => Ok(Self::default()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
