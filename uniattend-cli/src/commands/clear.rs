use anyhow::Result;
use dialoguer::Confirm;
use owo_colors::OwoColorize;

use super::Context;

pub async fn run(ctx: &Context, week_id: &str, yes: bool) -> Result<()> {
    let label = ctx
        .week(week_id)
        .map(|w| w.label.clone())
        .unwrap_or_else(|_| week_id.to_string());

    if !yes {
        let confirmed = Confirm::new()
            .with_prompt(format!("  Clear all codes for {}?", label))
            .default(false)
            .interact()?;
        if !confirmed {
            return Ok(());
        }
    }

    ctx.state.clear_week(week_id)?;
    ctx.flush().await;

    println!("{} Cleared {}", "✓".green(), label);

    Ok(())
}
