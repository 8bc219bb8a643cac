use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use broken_promises::config::{Overrides, TrackerToml, resolve};

mod cmd;

#[derive(Parser)]
#[command(name = "broken-promises")]
#[command(version, about = "Track broken promises on a small issue board")]
pub struct Cli {
    /// Port to serve on [default: 3000]
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Address to bind [default: 127.0.0.1]
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// JSON file holding the issues [default: data.json]
    #[arg(long, env = "DATA_FILE")]
    pub data_file: Option<PathBuf>,

    /// Path to a TOML config file. Defaults to ./tracker.toml when present
    #[arg(long, env = "TRACKER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Create an empty data file and exit
    #[arg(long)]
    pub init: bool,

    /// Disable the permissive CORS layer
    #[arg(long)]
    pub no_cors: bool,

    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub log_json: bool,
}

fn init_logging(verbose: bool, json: bool) {
    let default_filter = if verbose {
        "debug"
    } else {
        "info,tower_http=warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr),
            )
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_json);

    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let file = TrackerToml::load_or_default(cli.config.as_deref(), &cwd)?;
    let config = resolve(
        &file,
        Overrides {
            host: cli.host,
            port: cli.port,
            data_file: cli.data_file,
            cors: cli.no_cors.then_some(false),
        },
    );

    cmd::cmd_serve(config, cli.init).await
}
