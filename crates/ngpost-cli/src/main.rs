mod lookup;
mod validate;

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use ngpost_core::{AppConfig, PostalCodeTable};
use ngpost_geocoder::{GeocodingClient, RateLimiter};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "ngpost-cli")]
#[command(about = "Nigerian postal code lookup and geocoder validation")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Look up a postal code by state and LGA
    Lookup {
        #[arg(long)]
        state: String,
        #[arg(long)]
        lga: String,
    },
    /// Reverse-geocode a coordinate
    Reverse {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Score the local table when the provider has no postcode
        #[arg(long)]
        fallback: bool,
    },
    /// List states, or the LGAs of one state
    States {
        #[arg(long)]
        state: Option<String>,
    },
    /// Replay the bundled test coordinates and report viability
    Validate {
        /// Only run the first N cases
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, value_enum, default_value_t = OutputFormat::Summary)]
        output: OutputFormat,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Summary,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ngpost_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let table = Arc::new(PostalCodeTable::load(config.postal_codes_path.as_deref())?);

    match cli.command {
        Commands::Lookup { state, lga } => lookup::run_lookup(&table, &state, &lga)?,
        Commands::Reverse { lat, lng, fallback } => {
            let client = build_client(&config)?;
            lookup::run_reverse(table, client, lat, lng, fallback).await?;
        }
        Commands::States { state } => lookup::run_states(&table, state.as_deref())?,
        Commands::Validate { limit, output } => {
            let client = build_client(&config)?;
            validate::run_validate(&config, table, client, limit, output).await?;
        }
    }

    Ok(())
}

fn build_client(config: &AppConfig) -> anyhow::Result<GeocodingClient> {
    let limiter = Arc::new(RateLimiter::new(Duration::from_millis(
        config.geocoder_min_interval_ms,
    )));
    Ok(GeocodingClient::from_config(config, limiter)?)
}
