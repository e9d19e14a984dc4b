//! fundview CLI binary.
//!
//! Annual net income, dividends and their growth from SEC EDGAR, plus share
//! price history from Yahoo Finance.

mod render;

use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use fundview::{
    CikDirectory, CompanyReport, EdgarProvider, FundamentalsService, PriceField, PriceQuery, Symbol,
    UnitChoice, YahooProvider,
};
use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fundview")]
#[command(about = "Company fundamentals and share prices", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// User agent sent to SEC EDGAR ("Name contact@example.com")
    #[arg(
        long,
        global = true,
        env = "FUNDVIEW_USER_AGENT",
        default_value = "fundview/0.1 admin@example.com"
    )]
    user_agent: String,

    /// JSON file of extra ticker to CIK mappings
    #[arg(long, global = true, env = "FUNDVIEW_CIK_FILE")]
    cik_file: Option<PathBuf>,

    /// Look up tickers missing from the table in the SEC ticker listing
    #[arg(long, global = true)]
    sec_lookup: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Annual net income and dividends with year-over-year growth
    Report {
        /// Ticker symbols
        #[arg(required = true)]
        tickers: Vec<String>,

        /// Display unit (auto, B, M or raw)
        #[arg(long, default_value = "auto")]
        unit: UnitChoice,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// Daily share price history
    Prices {
        /// Ticker symbol
        ticker: String,

        /// First date (YYYY-MM-DD), defaults to ten years ago
        #[arg(long)]
        start: Option<NaiveDate>,

        /// Last date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        end: Option<NaiveDate>,

        /// Price column (close, open, high, low, adj-close, volume)
        #[arg(long, default_value = "close")]
        column: PriceField,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },

    /// List known ticker to CIK mappings
    Tickers,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Csv,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Installs the log subscriber; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("warn,fundview={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_directory(cik_file: Option<&PathBuf>) -> fundview::Result<CikDirectory> {
    let builtin = CikDirectory::builtin();
    match cik_file {
        Some(path) => Ok(builtin.merged(CikDirectory::from_file(path)?)),
        None => Ok(builtin),
    }
}

/// Stacks the reports of several companies into one frame.
fn reports_frame(reports: &[CompanyReport]) -> Result<DataFrame, Box<dyn std::error::Error>> {
    let mut frame: Option<DataFrame> = None;
    for report in reports {
        let df = report.to_frame()?;
        frame = Some(match frame.take() {
            Some(mut acc) => {
                acc.vstack_mut(&df)?;
                acc
            }
            None => df,
        });
    }
    Ok(frame.unwrap_or_default())
}

fn write_csv(mut df: DataFrame) -> Result<(), Box<dyn std::error::Error>> {
    CsvWriter::new(std::io::stdout().lock())
        .include_header(true)
        .finish(&mut df)?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let directory = load_directory(cli.cik_file.as_ref())?;
    debug!(entries = directory.len(), "Ticker table ready");

    match cli.command {
        Commands::Tickers => {
            print!("{}", render::tickers_text(&directory));
        }
        Commands::Report {
            tickers,
            unit,
            format,
        } => {
            let edgar = EdgarProvider::new(&cli.user_agent)
                .with_directory(directory)
                .with_remote_lookup(cli.sec_lookup);
            let service = FundamentalsService::new(Arc::new(edgar));

            let mut reports = Vec::with_capacity(tickers.len());
            for ticker in &tickers {
                reports.push(service.report(&Symbol::new(ticker)).await);
            }

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
                Format::Csv => write_csv(reports_frame(&reports)?)?,
                Format::Text => {
                    for (i, report) in reports.iter().enumerate() {
                        if i > 0 {
                            println!();
                        }
                        print!("{}", render::report_text(report, unit));
                    }
                }
            }
        }
        Commands::Prices {
            ticker,
            start,
            end,
            column,
            format,
        } => {
            let edgar = EdgarProvider::new(&cli.user_agent).with_directory(directory);
            let service = FundamentalsService::new(Arc::new(edgar))
                .with_prices(Arc::new(YahooProvider::new()));

            let query = PriceQuery {
                start,
                end,
                field: column,
            };
            let report = service.prices(&Symbol::new(ticker), query).await?;

            match format {
                Format::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                Format::Csv => write_csv(report.to_frame()?)?,
                Format::Text => print!("{}", render::prices_text(&report)),
            }
        }
    }

    Ok(())
}
