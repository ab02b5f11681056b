use anyhow::Result;
use uniattend_core::export::week_summary;

use super::Context;

/// Print the week in the format expected by attendance submissions.
pub fn run(ctx: &Context, week_id: &str) -> Result<()> {
    let week = ctx.week(week_id)?;
    let store = ctx.state.snapshot()?;

    print!("{}", week_summary(week, store.week(week_id)));

    Ok(())
}
