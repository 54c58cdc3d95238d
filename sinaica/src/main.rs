use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sinaica::domain::{StationId, StationTable};
use sinaica::sinaica::{DEFAULT_DATA_URL, DEFAULT_META_URL, SinaicaClient, SinaicaConfig};
use sinaica::stations::load_station_table;

#[derive(Parser, Debug)]
#[command(name = "sinaica")]
#[command(about = "Download and normalize SINAICA air-quality data")]
struct Cli {
    /// JSON file with station metadata to join onto measurements
    #[arg(long, env = "SINAICA_STATIONS")]
    stations: Option<PathBuf>,

    /// Measurement data endpoint
    #[arg(long, env = "SINAICA_DATA_URL", default_value = DEFAULT_DATA_URL)]
    data_url: String,

    /// Station metadata endpoint
    #[arg(long, env = "SINAICA_META_URL", default_value = DEFAULT_META_URL)]
    meta_url: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "30")]
    timeout: u64,

    /// Maximum random pause between requests, in milliseconds
    #[arg(long, default_value = "2000")]
    max_pause_ms: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct Download {
    /// Parameter code, e.g. O3 or PM2.5
    #[arg(short, long)]
    parameter: String,

    /// First day (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,

    /// Last day (YYYY-MM-DD), at most one month after the first
    #[arg(long)]
    end: Option<String>,

    /// Crude or Manual
    #[arg(long = "type", default_value = "Crude")]
    data_type: String,

    /// Drop readings above the parameter's ceiling
    #[arg(long)]
    remove_extremes: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download one parameter for every station
    ParamData(Download),

    /// Download one parameter for a single station
    StationData {
        #[arg(short, long)]
        station: u32,

        #[command(flatten)]
        download: Download,
    },

    /// List the parameters a station measures
    StationParams {
        #[arg(short, long)]
        station: u32,

        /// Crude, Validated or Manual
        #[arg(long = "type", default_value = "Crude")]
        data_type: String,
    },

    /// Show the first and last date a station has data for
    StationDates {
        #[arg(short, long)]
        station: u32,

        /// Crude, Validated or Manual
        #[arg(long = "type", default_value = "Crude")]
        data_type: String,
    },
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value).context("failed to write output")?;
    writeln!(out)?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let stations = match &cli.stations {
        Some(path) => {
            let table = load_station_table(path)
                .with_context(|| format!("loading stations from {}", path.display()))?;
            info!(count = table.len(), "loaded station metadata");
            table
        }
        None => StationTable::new(),
    };

    let config = SinaicaConfig::new()
        .with_data_url(cli.data_url)
        .with_meta_url(cli.meta_url)
        .with_timeout(cli.timeout)
        .with_max_pause(Duration::from_millis(cli.max_pause_ms));
    let client = SinaicaClient::new(config, Arc::new(stations))?;

    match cli.command {
        Command::ParamData(d) => {
            let data = client
                .param_data(
                    &d.parameter,
                    d.start.as_deref(),
                    d.end.as_deref(),
                    &d.data_type,
                    d.remove_extremes,
                )
                .await?;
            info!(rows = data.len(), "download complete");
            print_json(&data)
        }
        Command::StationData { station, download: d } => {
            let data = client
                .station_data(
                    StationId(station),
                    &d.parameter,
                    d.start.as_deref(),
                    d.end.as_deref(),
                    &d.data_type,
                    d.remove_extremes,
                )
                .await?;
            info!(rows = data.len(), "download complete");
            print_json(&data)
        }
        Command::StationParams { station, data_type } => {
            let params = client.station_params(StationId(station), &data_type).await;
            print_json(&params)
        }
        Command::StationDates { station, data_type } => {
            let limits = client.station_dates(StationId(station), &data_type).await;
            print_json(&limits.as_pair())
        }
    }
}
