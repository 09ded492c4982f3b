mod sync;
mod transform;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vtsync_core::SyncApi;

const DEFAULT_INPUT: &str = "csv-input/visiotech.csv";

#[derive(Debug, Parser)]
#[command(name = "vtsync")]
#[command(about = "Convert the supplier catalog to Shopify products and push them to the store")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Write the Shopify import CSV from a supplier file
    Transform {
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,
        /// Defaults to `csv-output/shopify_products_<date>.csv`
        output: Option<PathBuf>,
    },
    /// Transform, write the import CSV, then create or update products in Shopify
    Sync {
        #[arg(default_value = DEFAULT_INPUT)]
        input: PathBuf,
        output: Option<PathBuf>,
        /// Report what would be created or updated without changing the store
        #[arg(long)]
        dry_run: bool,
        /// Overrides `SHOPIFY_SYNC_API`
        #[arg(long)]
        api: Option<SyncApi>,
    },
    /// Push a previously generated Shopify import CSV
    Upload {
        csv: PathBuf,
        #[arg(long)]
        dry_run: bool,
        #[arg(long)]
        api: Option<SyncApi>,
    },
}

fn default_output_path() -> PathBuf {
    let today = chrono::Utc::now().date_naive();
    PathBuf::from(format!("csv-output/shopify_products_{}.csv", today.format("%Y-%m-%d")))
}

/// `RUST_LOG` wins; otherwise the configured level applies.
fn init_tracing(default_level: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = vtsync_core::load_app_config()?;
    init_tracing(&config.log_level);

    match cli.command {
        Commands::Transform { input, output } => {
            let output = output.unwrap_or_else(default_output_path);
            transform::run_transform(&config, &input, &output)?;
        }
        Commands::Sync {
            input,
            output,
            dry_run,
            api,
        } => {
            let output = output.unwrap_or_else(default_output_path);
            sync::run_sync(&config, &input, &output, dry_run, api).await?;
        }
        Commands::Upload { csv, dry_run, api } => {
            sync::run_upload(&config, &csv, dry_run, api).await?;
        }
    }

    Ok(())
}
