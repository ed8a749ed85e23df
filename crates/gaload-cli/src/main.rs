use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod run;

#[derive(Debug, Parser)]
#[command(name = "gaload")]
#[command(about = "Load a Universal Analytics report into a warehouse table")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch the configured report and bulk-insert it.
    Run {
        /// Report configuration (view id, dates, dimensions, metrics, target).
        #[arg(long, env = "GALOAD_CONFIG", default_value = "gaload.yaml")]
        config: PathBuf,

        /// Google service-account key file.
        #[arg(long, env = "GALOAD_SERVICE_ACCOUNT_KEY", default_value = "service-account-key.json")]
        key_file: PathBuf,

        /// Warehouse credential file.
        #[arg(long, env = "GALOAD_WAREHOUSE_CREDENTIALS", default_value = "warehouse.json")]
        warehouse_file: PathBuf,

        /// Request timeout for the Reporting API, in seconds.
        #[arg(long, env = "GALOAD_TIMEOUT_SECS", default_value_t = 30)]
        timeout_secs: u64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            config,
            key_file,
            warehouse_file,
            timeout_secs,
        } => run::run(&config, &key_file, &warehouse_file, timeout_secs).await,
    }
}
