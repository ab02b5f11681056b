use anyhow::Result;

use super::Context;
use crate::render::WeekView;

pub fn run(ctx: &Context) -> Result<()> {
    let store = ctx.state.snapshot()?;

    for week in &ctx.weeks {
        let view = WeekView {
            week,
            record: store.week(&week.id),
        };
        println!("{}", view.render_line());
    }

    Ok(())
}
