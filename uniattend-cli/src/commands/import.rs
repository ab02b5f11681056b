use std::path::Path;

use anyhow::{Context as _, Result};
use owo_colors::OwoColorize;
use uniattend_core::export::parse_import;

use super::Context;

pub async fn run(ctx: &Context, path: &Path) -> Result<()> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let store = parse_import(&text)?;
    let weeks = store.len();

    ctx.state
        .import(store)
        .await
        .context("Import failed, nothing was changed")?;

    println!(
        "{} Imported {} weeks. Attendance codes are synced for everyone.",
        "✓".green(),
        weeks
    );

    Ok(())
}
