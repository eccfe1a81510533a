use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use tideqc::config::{PipelineConfig, SamplingInterval, TimeWindow};
use tideqc::logging;
use tideqc::model::PipelineError;
use tideqc::pipeline::Pipeline;
use tideqc::report::{Reporter, map};

/// Prepare a tide gauge water-level export for QC labelling.
#[derive(Debug, Parser)]
#[command(name = "tideqc", version)]
struct Cli {
    /// Station export (CSV with DATE_TIME and *_WL_* columns)
    file: PathBuf,

    /// TOML config file (defaults to $TIDEQC_CONFIG, then built-in defaults)
    #[arg(long)]
    config: Option<PathBuf>,

    /// First timestamp to keep, inclusive
    #[arg(long)]
    start: Option<String>,

    /// Last timestamp to keep, inclusive
    #[arg(long)]
    end: Option<String>,

    /// Sampling interval in minutes; must divide 60
    #[arg(long)]
    interval: Option<u32>,

    /// Directory for diagnostic SVG/CSV output
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Skip cadence diagnostics
    #[arg(long)]
    no_figures: bool,

    /// Also write the station map to this HTML file
    #[arg(long)]
    map: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match build_config(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("tideqc: {}", e);
            return ExitCode::FAILURE;
        }
    };

    logging::init_logger(
        config.logging.level,
        config.logging.file.as_deref(),
        config.logging.console_timestamps,
    );

    match run(&cli, config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("tideqc: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Config file (explicit or from the environment) with command-line
/// overrides applied on top.
fn build_config(cli: &Cli) -> Result<PipelineConfig, PipelineError> {
    let config = match &cli.config {
        Some(path) => PipelineConfig::load(path)?,
        None => PipelineConfig::from_env()?,
    };
    apply_overrides(cli, config)
}

/// A bound given alone replaces only that end of the configured window.
fn apply_overrides(cli: &Cli, mut config: PipelineConfig) -> Result<PipelineConfig, PipelineError> {
    if cli.start.is_some() || cli.end.is_some() {
        let start = cli.start.clone().unwrap_or_else(|| config.window.start().to_string());
        let end = cli.end.clone().unwrap_or_else(|| config.window.end().to_string());
        config.window = TimeWindow::new(&start, &end)?;
    }
    if let Some(minutes) = cli.interval {
        config.interval = SamplingInterval::from_minutes(minutes)?;
    }
    if let Some(dir) = &cli.report_dir {
        config.report.output_dir = Some(dir.clone());
    }
    if cli.no_figures {
        config.report.suppress_figures = true;
    }
    Ok(config)
}

fn run(cli: &Cli, config: PipelineConfig) -> Result<(), PipelineError> {
    let pipeline = Pipeline::new(config);
    let mut reporters = pipeline.configured_reporters();
    let reporter = reporters.as_mut().map(|r| r as &mut dyn Reporter);

    let data = pipeline.run(&cli.file, reporter)?;

    if let Some(path) = &cli.map {
        map::write_map(path)?;
    }

    let json = serde_json::to_string_pretty(&data.summary)
        .map_err(|e| PipelineError::Report(e.to_string()))?;
    println!("{}", json);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tideqc::timestamps::format_timestamp;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["tideqc", "station.csv"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    fn window(config: &PipelineConfig) -> (String, String) {
        (
            format_timestamp(&config.window.start()),
            format_timestamp(&config.window.end()),
        )
    }

    #[test]
    fn test_no_flags_keep_config() {
        let config = apply_overrides(&cli(&[]), PipelineConfig::default()).unwrap();
        assert_eq!(
            window(&config),
            ("2007-01-01 00:00:00".to_string(), "2017-12-31 23:54:00".to_string())
        );
        assert_eq!(config.interval.minutes(), 6);
        assert!(!config.report.suppress_figures);
        assert_eq!(config.report.output_dir, None);
    }

    #[test]
    fn test_start_alone_keeps_configured_end() {
        let config =
            apply_overrides(&cli(&["--start", "2010-06-01"]), PipelineConfig::default()).unwrap();
        assert_eq!(
            window(&config),
            ("2010-06-01 00:00:00".to_string(), "2017-12-31 23:54:00".to_string())
        );
    }

    #[test]
    fn test_end_alone_keeps_configured_start() {
        let config = apply_overrides(&cli(&["--end", "2008-01-01 12:30"]), PipelineConfig::default())
            .unwrap();
        assert_eq!(
            window(&config),
            ("2007-01-01 00:00:00".to_string(), "2008-01-01 12:30:00".to_string())
        );
    }

    #[test]
    fn test_end_before_configured_start_is_ordering_error() {
        let err = apply_overrides(&cli(&["--end", "2001-01-01"]), PipelineConfig::default())
            .unwrap_err();
        assert!(matches!(err, PipelineError::TimeRangeOrder { .. }), "got {:?}", err);
    }

    #[test]
    fn test_interval_and_report_flags() {
        let config = apply_overrides(
            &cli(&["--interval", "15", "--report-dir", "out", "--no-figures"]),
            PipelineConfig::default(),
        )
        .unwrap();
        assert_eq!(config.interval.minutes(), 15);
        assert_eq!(config.report.output_dir, Some(PathBuf::from("out")));
        assert!(config.report.suppress_figures);
    }

    #[test]
    fn test_bad_interval_is_rejected() {
        let err = apply_overrides(&cli(&["--interval", "7"]), PipelineConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidSamplingInterval(7)));
    }

    #[test]
    fn test_explicit_config_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tideqc.toml");
        std::fs::write(&path, "[cadence]\ninterval_minutes = 10\n").unwrap();
        let config_arg = path.display().to_string();
        let config = build_config(&cli(&["--config", &config_arg, "--start", "2009-01-01"])).unwrap();
        assert_eq!(config.interval.minutes(), 10);
        assert_eq!(window(&config).0, "2009-01-01 00:00:00");
    }
}
