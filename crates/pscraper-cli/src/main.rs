mod scrape;
mod summarize;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pscraper")]
#[command(about = "Vehicle listing scraper for Autotrader and cars.com")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape listings and write them as JSON Lines.
    Scrape {
        #[arg(value_enum)]
        site: SiteArg,
        /// Output file (defaults to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Aggregate a JSON Lines master table into dealer and manufacturer statistics.
    Summarize {
        #[arg(long)]
        input: PathBuf,
        /// Date treated as "today" when deciding which listings sold (YYYY-MM-DD).
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SiteArg {
    Autotrader,
    Cars,
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = pscraper_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(env = %config.env, "configuration loaded");

    match cli.command {
        Commands::Scrape { site, output } => {
            scrape::run_scrape(&config, site, output.as_deref()).await
        }
        Commands::Summarize { input, today } => summarize::run_summarize(&input, today),
    }
}
