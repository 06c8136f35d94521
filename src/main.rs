//! # Tidetable CLI
//!
//! Thin wrapper over the library: parse arguments, fetch one annual table,
//! write CSV to stdout. Diagnostics go to stderr so the CSV stream stays
//! clean for piping.

use anyhow::Context;
use clap::builder::PossibleValuesParser;
use clap::Parser;
use std::time::Duration;
use tidetable::{Config, Datum, HttpTransport, TideRequest, TideTable, TimeZone, DATUMS};

/// Download a NOAA annual tide prediction table as CSV.
#[derive(Debug, Parser)]
#[command(name = "tidetable", version, about)]
struct Cli {
    /// NOAA station id (e.g. 8517921)
    station_id: String,

    /// Prediction year (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Vertical datum for predicted heights
    #[arg(long, value_parser = PossibleValuesParser::new(DATUMS))]
    datum: Option<String>,

    /// Time zone for reported times
    #[arg(long, value_parser = ["gmt", "lst"])]
    time_zone: Option<String>,

    /// Path to a config file (default: tidetable.toml if present)
    #[arg(long)]
    config: Option<String>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tidetable=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };

    let datum = Datum::parse(cli.datum.as_deref().unwrap_or(&config.defaults.datum));
    let time_zone = match cli
        .time_zone
        .as_deref()
        .unwrap_or(&config.defaults.time_zone)
    {
        "lst" => TimeZone::LocalStandard,
        _ => TimeZone::Gmt,
    };

    let mut request = TideRequest::new(cli.station_id)?
        .datum(datum)
        .time_zone(time_zone);
    if let Some(year) = cli.year {
        request = request.year(year);
    }

    let transport = HttpTransport::with_base_url(
        config.http.base_url.clone(),
        Duration::from_secs(config.http.timeout_secs),
    )?;
    let table = TideTable::fetch_with(request, &transport)
        .context("failed to fetch tide predictions")?;

    if table.is_empty() {
        tracing::warn!(
            url = table.url(),
            "no predictions returned; check station id and datum"
        );
    }

    table.write_csv(std::io::stdout().lock())?;
    Ok(())
}
