mod browse;
mod dataset;
mod terminal;
mod view;

use clap::{Parser, Subcommand};
use kpp_core::{CheckpointStatus, CheckpointType, ListLayout};
use kpp_view::{CategoryFilter, MapStyle};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "kpp")]
#[command(about = "Border checkpoint map: load, filter and browse the checkpoint dataset")]
struct Cli {
    /// Path or http(s) URL of the checkpoint GeoJSON (overrides KPP_DATA_SOURCE)
    #[arg(long, global = true)]
    source: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the dataset and report what normalization did
    Check,
    /// Filter once and print the list and stats
    View {
        /// Free-text query (name, region, country, type or status)
        #[arg(long, short = 'q', default_value = "")]
        query: String,
        /// Transport type: all, a key such as `rail`, or a Russian label
        #[arg(long = "type", default_value = "all")]
        type_filter: CategoryFilter<CheckpointType>,
        /// Status: all, a key such as `closed`, or a Russian label
        #[arg(long = "status", default_value = "all")]
        status_filter: CategoryFilter<CheckpointStatus>,
        /// Group rows by neighbouring country
        #[arg(long)]
        grouped: bool,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Print the map style tables as JSON
    Style,
    /// Interactive session driven by commands on stdin
    Browse {
        /// Simulated map style load time
        #[arg(long, default_value = "300")]
        map_delay_ms: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let mut config = kpp_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(source) = cli.source {
        config.data_source = source;
    }
    tracing::debug!(env = %config.env, source = %config.data_source, "configuration loaded");

    match cli.command {
        Some(Commands::Check) | None => dataset::run_check(&config).await?,
        Some(Commands::View {
            query,
            type_filter,
            status_filter,
            grouped,
            json,
        }) => {
            if grouped {
                config.list_layout = ListLayout::GroupedByCountry;
            }
            let query = kpp_view::ViewQuery {
                text: query,
                type_filter,
                status_filter,
            };
            view::run_view(&config, &query, json).await?;
        }
        Some(Commands::Style) => {
            let style = MapStyle::new(config.cluster_radius, config.cluster_max_zoom);
            println!("{}", serde_json::to_string_pretty(&style)?);
        }
        Some(Commands::Browse { map_delay_ms }) => {
            browse::run_browse(&config, std::time::Duration::from_millis(map_delay_ms)).await?;
        }
    }

    Ok(())
}
