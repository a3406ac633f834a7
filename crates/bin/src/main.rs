//! Vendor health CLI binary.
//!
//! Refreshes vendor statements and prints dashboard views as JSON.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::process;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vendor::{
    Dashboard, MetricsStore, RefreshPipeline, Settings, Ticker, initialize_targets, target_tickers,
};

const DEFAULT_LOG_FILTER: &str = "vendor=info,vendor_alphavantage=info";

#[derive(Parser)]
#[command(name = "vendor-health")]
#[command(about = "Vendor financial health metrics", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Store the profiles of the target vendors
    Init,

    /// Fetch statements and compute metrics
    Refresh {
        /// Tickers to refresh (all target vendors if omitted)
        tickers: Vec<String>,
    },

    /// Show the latest figures of a vendor
    Summary {
        /// Vendor ticker
        ticker: String,
    },

    /// Compare all target vendors
    Compare,

    /// Show revenue and income trends of a vendor
    Trends {
        /// Vendor ticker
        ticker: String,
    },

    /// Show all metric records of a vendor
    Metrics {
        /// Vendor ticker
        ticker: String,
    },

    /// List stored vendors
    Vendors,

    /// Show API key status
    Keys,

    /// Delete all stored profiles, statements and metrics
    Reset,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let settings = Settings::from_env()?;

    let store = Arc::new(settings.store()?);
    let dashboard = Dashboard::new(store.clone(), settings.cache_ttl());

    match cli.command {
        Commands::Init => {
            let created = initialize_targets(store.as_ref()).await?;
            info!(created = created.len(), "Initialized target vendors");
            print_json(&created)?;
        }
        Commands::Refresh { tickers } => {
            let tickers: Vec<Ticker> = if tickers.is_empty() {
                target_tickers()
            } else {
                tickers.into_iter().map(Ticker::new).collect()
            };
            let pipeline = RefreshPipeline::new(Arc::new(settings.provider()?), store)
                .with_comparison_cache(dashboard.cache());
            let summary = pipeline.refresh_all(&tickers).await;
            print_json(&summary)?;
            if !summary.failed.is_empty() {
                let failed = summary.failed.len();
                return Err(format!("{failed} of {} refreshes failed", tickers.len()).into());
            }
        }
        Commands::Summary { ticker } => {
            print_json(&dashboard.summary(&Ticker::new(ticker)).await?)?;
        }
        Commands::Compare => print_json(&dashboard.comparison().await?)?,
        Commands::Trends { ticker } => {
            print_json(&dashboard.trends(&Ticker::new(ticker)).await?)?;
        }
        Commands::Metrics { ticker } => {
            print_json(&dashboard.metrics(&Ticker::new(ticker)).await?)?;
        }
        Commands::Vendors => print_json(&dashboard.vendors().await?)?,
        Commands::Keys => print_json(&settings.provider()?.key_status())?,
        Commands::Reset => {
            store.clear().await?;
            info!(database = %settings.database_path().display(), "Cleared stored data");
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
