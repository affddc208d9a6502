mod config;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::AppConfig;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{fmt, EnvFilter};
use tradeviz_core::{DataProvider, Period};
use tradeviz_data::CsvDataProvider;
use tradeviz_indicators::{apply_studies, describe, StudyKind};

#[derive(Parser)]
#[command(name = "tradeviz")]
#[command(about = "Stock indicator engine: moving averages, Bollinger bands, RSI, MACD and ATR over daily price history")]
#[command(version)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// TOML config file
    #[arg(short, long, env = "TRADEVIZ_CONFIG")]
    config: Option<PathBuf>,

    /// Directory holding one <SYMBOL>.csv per symbol
    #[arg(short, long, env = "TRADEVIZ_DATA_DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute indicators for a symbol and print the latest rows
    Indicators {
        /// Symbol (e.g. "AAPL")
        symbol: String,

        /// Lookback period (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, ytd, max)
        #[arg(short, long)]
        period: Option<Period>,

        /// Comma-separated indicators (sma, bollinger, rsi, macd, atr); all when omitted
        #[arg(short, long)]
        indicators: Option<String>,

        /// Number of trailing rows to print
        #[arg(short, long, default_value = "10")]
        rows: usize,

        /// Print the full augmented series as JSON
        #[arg(long)]
        json: bool,
    },

    /// Descriptive statistics of price and indicator columns
    Summary {
        symbol: String,

        #[arg(short, long)]
        period: Option<Period>,

        #[arg(short, long)]
        indicators: Option<String>,

        #[arg(long)]
        json: bool,
    },

    /// Closing prices of several symbols side by side
    Compare {
        /// Symbols to compare
        #[arg(required = true)]
        symbols: Vec<String>,

        #[arg(short, long)]
        period: Option<Period>,

        #[arg(short, long, default_value = "10")]
        rows: usize,

        #[arg(long)]
        json: bool,
    },

    /// List symbols found in the data directory
    Symbols,

    /// Start the API server
    Server {
        /// Bind address
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::load(cli.config.as_deref())?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data_dir.clone());
    let provider = CsvDataProvider::new(&data_dir);

    match cli.command {
        Commands::Indicators {
            symbol,
            period,
            indicators,
            rows,
            json,
        } => {
            let period = period.unwrap_or(config.period);
            let kinds = study_kinds(indicators.as_deref())?;
            let series = provider.load_series(&symbol, period).await?;
            let report = apply_studies(series, &config.indicators.studies(&kinds));

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                let series = report.series.series();
                println!(
                    "{} ({}, {} rows)",
                    series.symbol(),
                    period,
                    series.len()
                );
                println!("{}", report::latest_rows(&report.series, rows));
                if !report.is_complete() {
                    println!("{}", report::failures(&report.failures));
                }
            }
        }
        Commands::Summary {
            symbol,
            period,
            indicators,
            json,
        } => {
            let period = period.unwrap_or(config.period);
            let kinds = study_kinds(indicators.as_deref())?;
            let series = provider.load_series(&symbol, period).await?;
            let report = apply_studies(series, &config.indicators.studies(&kinds));
            let summaries = describe(&report.series);

            if json {
                println!("{}", serde_json::to_string_pretty(&summaries)?);
            } else {
                let series = report.series.series();
                match (series.first_date(), series.last_date()) {
                    (Some(first), Some(last)) => println!(
                        "{} ({}): {} rows, {} → {}",
                        series.symbol(),
                        period,
                        series.len(),
                        first.format("%Y-%m-%d"),
                        last.format("%Y-%m-%d")
                    ),
                    _ => println!("{} ({}): no rows", series.symbol(), period),
                }
                println!("{}", report::summary_table(&summaries));
                if !report.is_complete() {
                    println!("{}", report::failures(&report.failures));
                }
            }
        }
        Commands::Compare {
            symbols,
            period,
            rows,
            json,
        } => {
            let period = period.unwrap_or(config.period);
            let set = provider.load_set(&symbols, period).await?;
            let table = set.close_table();
            tracing::info!(symbols = set.len(), dates = table.index.len(), "Compared closes");

            if json {
                println!("{}", serde_json::to_string_pretty(&table)?);
            } else {
                println!("{}", report::close_table(&table, rows));
            }
        }
        Commands::Symbols => {
            let symbols = provider.available_symbols().await?;
            if symbols.is_empty() {
                println!("No CSV files found in {}", data_dir.display());
            } else {
                println!("Available symbols:");
                for symbol in symbols {
                    println!("  {}", symbol);
                }
            }
        }
        Commands::Server { bind } => {
            let bind = bind.unwrap_or_else(|| config.server.bind.clone());
            tracing::info!(data_dir = %data_dir.display(), "Serving CSV data");
            let state = tradeviz_api::AppState::new(Arc::new(provider))
                .with_settings(config.indicators.clone())
                .with_default_period(config.period);
            tradeviz_api::start_server(state, &bind).await?;
        }
    }

    Ok(())
}

fn study_kinds(list: Option<&str>) -> Result<Vec<StudyKind>> {
    match list {
        Some(list) => Ok(StudyKind::parse_list(list)?),
        None => Ok(StudyKind::ALL.to_vec()),
    }
}
