use std::{path::PathBuf, process::ExitCode};

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::Parser;
use forecast_engine::{
    config::ForecastConfig,
    forecast,
    report::{ErrorReport, PredictionReport},
};
use market_data_ingestor::{
    models::request_params::{BarsRequest, DEFAULT_LOOKBACK_DAYS},
    providers::{DataProvider, alpaca_rest::AlpacaProvider, json_file::JsonFileProvider},
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Forecast the next close of one ticker")]
struct Cli {
    /// Ticker symbol, e.g. AAPL.
    ticker: String,
    /// TOML config; defaults apply when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Read bars from a JSON file instead of the Alpaca API.
    #[arg(long, value_name = "FILE")]
    bars_file: Option<PathBuf>,
    /// Calendar days of history to request.
    #[arg(
        long,
        default_value_t = DEFAULT_LOOKBACK_DAYS,
        value_parser = clap::value_parser!(u32).range(1..=36_500)
    )]
    lookback_days: u32,
    /// Last day of the window (defaults to today, UTC).
    #[arg(long, value_name = "YYYY-MM-DD")]
    end: Option<NaiveDate>,
}

async fn run(cli: &Cli) -> Result<PredictionReport> {
    let ticker = cli.ticker.trim().to_uppercase();
    let config = match &cli.config {
        Some(path) => ForecastConfig::from_path(path)?,
        None => ForecastConfig::default(),
    };

    let provider: Box<dyn DataProvider + Send + Sync> = match &cli.bars_file {
        Some(path) => Box::new(JsonFileProvider::new(path)),
        None => Box::new(AlpacaProvider::new().context("failed to set up Alpaca provider")?),
    };

    let end = cli.end.unwrap_or_else(|| Utc::now().date_naive());
    let request = BarsRequest::trailing(&ticker, end, cli.lookback_days);
    info!(ticker = %ticker, start = %request.start, end = %request.end, "fetching daily bars");
    let series = provider.fetch_daily_bars(&request).await?;

    let result = forecast(&series, &config)?;
    Ok(PredictionReport::from(&result))
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string(value) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("failed to encode output: {e}"),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    // stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli).await {
        Ok(report) => {
            print_json(&report);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(ticker = %cli.ticker, "forecast failed: {err:#}");
            print_json(&ErrorReport::new(format!("{err:#}")));
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookback_defaults_to_a_year() {
        let cli = Cli::try_parse_from(["forecast", "aapl"]).unwrap();
        assert_eq!(cli.lookback_days, DEFAULT_LOOKBACK_DAYS);
        assert!(cli.end.is_none());
    }

    #[test]
    fn lookback_is_bounded() {
        for days in ["0", "36501", "99999999999", "-5"] {
            assert!(
                Cli::try_parse_from(["forecast", "AAPL", "--lookback-days", days]).is_err(),
                "accepted --lookback-days {days}"
            );
        }
        let cli = Cli::try_parse_from(["forecast", "AAPL", "--lookback-days", "36500"]).unwrap();
        assert_eq!(cli.lookback_days, 36_500);
    }
}
