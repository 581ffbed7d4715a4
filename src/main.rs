use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;

use warehouse_tracking::api::formatting::render;
use warehouse_tracking::utils::{init_logging, LogLevel};
use warehouse_tracking::{
    AnomalyDetector, ConfigurationManager, OutputFormat, PingLoader, SystemConfig, Trilaterator,
    WarehouseReport,
};

/// Locate warehouse vehicles and flag the ones that may need inspection
#[derive(Parser, Debug)]
#[command(name = "warehouse-tracking", version, about)]
struct Cli {
    /// CSV file of access point readings (vehicle_id,timestamp,distance,anchor)
    pings: PathBuf,

    /// JSON configuration with anchor positions and detector thresholds
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Override the configured log level
    #[arg(long, value_enum)]
    log_level: Option<LogLevel>,
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => ConfigurationManager::from_file(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?
            .get_system_config()
            .clone(),
        None => SystemConfig::default(),
    };
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging(&config.logging);

    let trilaterator = Trilaterator::new(config.anchors.clone()).context("invalid anchor layout")?;
    let loader = PingLoader::new(trilaterator);
    let observations = loader
        .load_path(&cli.pings)
        .with_context(|| format!("reading pings from {}", cli.pings.display()))?;

    let detector = AnomalyDetector::new(config.detector.clone());
    let report = WarehouseReport::build(observations, &detector)?;

    print!("{}", render(&report, cli.format)?);
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}
