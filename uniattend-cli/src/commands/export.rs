use std::path::PathBuf;

use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use uniattend_core::export::{backup_file_name, export_json};

use super::Context;

pub fn run(ctx: &Context, path: Option<PathBuf>) -> Result<()> {
    let store = ctx.state.snapshot()?;
    let path = path.unwrap_or_else(|| {
        PathBuf::from(backup_file_name(chrono::Local::now().date_naive()))
    });

    let json = export_json(&store)?;
    std::fs::write(&path, json)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{} Exported {} weeks to {}", "✓".green(), store.len(), path.display());

    Ok(())
}
