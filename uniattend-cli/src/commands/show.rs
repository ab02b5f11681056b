use anyhow::Result;

use super::Context;
use crate::render::{Render, WeekView};

pub fn run(ctx: &Context, week_id: &str) -> Result<()> {
    let week = ctx.week(week_id)?;
    let store = ctx.state.snapshot()?;

    let view = WeekView {
        week,
        record: store.week(week_id),
    };
    println!("{}", view.render());

    Ok(())
}
