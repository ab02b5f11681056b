use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{EnvFilter, prelude::*};
use uniattend_core::config::UniattendConfig;

#[derive(Parser, Debug)]
#[command(name = "uniattend-server")]
#[command(about = "Serve the shared attendance store over HTTP")]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// JSON file holding the attendance data
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Directory with a web front-end to serve
    #[arg(long)]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => {
            debug!("loading config from {:?}", path);
            UniattendConfig::load_from(&path)?
        }
        None => UniattendConfig::load()?,
    };

    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(data_file) = cli.data_file {
        config.data_file = data_file;
    }
    if let Some(static_dir) = cli.static_dir {
        config.static_dir = Some(static_dir);
    }

    uniattend_server::run_until_ctrl_c(config).await
}
