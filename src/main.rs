use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use output_relay::config::{AppConfig, CliConfig, FileConfig};
use output_relay::relay::Relay;
use output_relay::server::{
    metrics, run_server, websocket::ConnectionManager, websocket::DEFAULT_OUTGOING_BUFFER,
    RequestsLoggingLevel,
};

#[derive(Parser, Debug)]
#[clap(version, about = "Rebroadcasts client output updates to every connected client")]
struct CliArgs {
    /// Path to an optional TOML config file. Values in the file override CLI flags.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The address to bind to.
    #[clap(long, default_value = "0.0.0.0")]
    pub host: String,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 5000)]
    pub port: u16,

    /// The port for the metrics server (Prometheus scraping). Disabled if not set.
    #[clap(long)]
    pub metrics_port: Option<u16>,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Messages buffered per connection before broadcasts to it are dropped.
    #[clap(long, default_value_t = DEFAULT_OUTGOING_BUFFER)]
    pub outgoing_buffer: usize,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            host: self.host.clone(),
            port: self.port,
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
            outgoing_buffer: self.outgoing_buffer,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!(
        "Starting output-relay {}-{}",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH")
    );

    metrics::init_metrics();

    let relay = Arc::new(Relay::new(ConnectionManager::new(
        app_config.outgoing_buffer,
    )));

    run_server(app_config.server_config(), relay).await?;

    info!("Relay stopped");
    Ok(())
}
