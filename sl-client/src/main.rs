use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sl_client::sl::{DEFAULT_BASE_URL, DEFAULT_MAX_RESULTS, SlClient, SlConfig, SlError};
use sl_client::table::{departure_tables, station_table};
use sl_client::widget::{self, ConfigError, REFRESH_INTERVAL, WidgetConfig, WidgetParameters};

#[derive(Parser, Debug)]
#[command(
    name = "sl",
    version,
    about = "Stations and live departures from the SL real-time API"
)]
struct Cli {
    /// Base URL of the SL API
    #[arg(long, global = true, default_value = DEFAULT_BASE_URL)]
    base_url: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up stations by name and print their site ids
    #[command(name = "station_search")]
    StationSearch {
        /// The API key
        key: String,

        /// The search string
        search_string: String,

        /// The number of search results
        #[arg(default_value_t = DEFAULT_MAX_RESULTS)]
        max_result: usize,

        /// Include addresses and points of interest, not only stations
        #[arg(long)]
        all_places: bool,
    },

    /// Print the live departure board of a site, one table per transport mode
    #[command(name = "departure_search")]
    DepartureSearch {
        /// The API key
        key: String,

        /// Site id of the station
        site_id: String,

        /// The time window, in minutes
        time_window: u32,
    },

    /// Print the status-bar line, refreshing periodically
    Widget {
        /// JSON file of widget options
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Widget option, e.g. `-p sl.line_number=51` (overrides the file)
        #[arg(short = 'p', long = "parameter", value_name = "NAME=VALUE")]
        parameters: Vec<String>,

        /// Seconds between refreshes
        #[arg(long, default_value_t = REFRESH_INTERVAL.as_secs())]
        interval: u64,

        /// Refresh once and exit
        #[arg(long)]
        once: bool,
    },
}

/// Anything that ends a command early.
#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Sl(#[from] SlError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Logs go to stderr; stdout carries the tables and widget lines.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let client = SlClient::new(SlConfig::new().with_base_url(cli.base_url))?;

    match cli.command {
        Command::StationSearch {
            key,
            search_string,
            max_result,
            all_places,
        } => {
            let stations = client
                .search_stations(&key, &search_string, max_result, !all_places)
                .await?;
            println!("{}", station_table(&stations));
        }

        Command::DepartureSearch {
            key,
            site_id,
            time_window,
        } => {
            let board = client.get_departures(&key, &site_id, time_window).await?;
            if let Some(updated) = board.latest_update_time() {
                info!(%updated, data_age = ?board.data_age, "board timestamp");
            }
            print!("{}", departure_tables(&board));
        }

        Command::Widget {
            config,
            parameters,
            interval,
            once,
        } => {
            let mut params = match config {
                Some(path) => WidgetParameters::load(path)?,
                None => WidgetParameters::new(),
            };
            for assignment in &parameters {
                params.set_assignment(assignment)?;
            }
            let config = WidgetConfig::from_parameters(&params)?;

            if once {
                println!("{}", widget::refresh(&client, &config).await?);
            } else {
                let period = Duration::from_secs(interval.max(1));
                widget::run(&client, &config, period, |line| println!("{line}")).await;
            }
        }
    }

    Ok(())
}
