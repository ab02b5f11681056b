mod client;
mod commands;
mod render;
mod state;
mod sync;
#[cfg(test)]
mod testing;
mod utils;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, prelude::*};
use uniattend_core::config::UniattendConfig;

use crate::commands::Context;

#[derive(Parser)]
#[command(name = "uniattend")]
#[command(about = "Record and share attendance codes for your class sessions")]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Server to sync with (e.g. "http://127.0.0.1:3000")
    #[arg(short, long, global = true)]
    server: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List academic weeks and how many codes each has
    Weeks,
    /// Show the sessions and codes of a week
    Show {
        /// Week id (e.g. "week_3")
        week: String,
    },
    /// Record a code for one session
    Set {
        week: String,
        session: String,
        /// Code to record; uppercased and clipped to 5 characters
        code: String,
    },
    /// Remove every code of a week
    Clear {
        week: String,

        /// Don't ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
    /// Enter codes for a week interactively
    Edit { week: String },
    /// Print a week in submission format
    Copy { week: String },
    /// Write a JSON backup of all codes
    Export {
        /// Output file (defaults to uni_attendance_backup_<date>.json)
        path: Option<PathBuf>,
    },
    /// Replace all codes with a JSON backup
    Import { path: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let mut config = match cli.config {
        Some(path) => UniattendConfig::load_from(&path)?,
        None => UniattendConfig::load()?,
    };
    if let Some(server) = cli.server {
        config.server_url = server;
    }

    let ctx = Context::connect(&config).await?;

    match cli.command {
        Commands::Weeks => commands::weeks::run(&ctx),
        Commands::Show { week } => commands::show::run(&ctx, &week),
        Commands::Set {
            week,
            session,
            code,
        } => commands::set::run(&ctx, &week, &session, &code).await,
        Commands::Clear { week, yes } => commands::clear::run(&ctx, &week, yes).await,
        Commands::Edit { week } => commands::edit::run(&ctx, &week).await,
        Commands::Copy { week } => commands::copy::run(&ctx, &week),
        Commands::Export { path } => commands::export::run(&ctx, path),
        Commands::Import { path } => commands::import::run(&ctx, &path).await,
    }
}
