use anyhow::Result;
use owo_colors::OwoColorize;

use super::Context;

pub async fn run(ctx: &Context, week_id: &str, session_id: &str, code: &str) -> Result<()> {
    // Ids are opaque to the store; only warn about ones the schedule doesn't know
    match ctx.week(week_id) {
        Ok(week) if !week.has_session(session_id) => {
            println!(
                "{}",
                format!("note: {} has no session '{}'", week_id, session_id).dimmed()
            );
        }
        Err(_) => {
            println!("{}", format!("note: '{}' is not a scheduled week", week_id).dimmed());
        }
        Ok(_) => {}
    }

    ctx.state.set_code(week_id, session_id, code)?;
    ctx.flush().await;

    let store = ctx.state.snapshot()?;
    let code = store.code(week_id, session_id).unwrap_or("(unset)");
    println!("{} {} {} {}", "✓".green(), week_id, session_id, code.bold());

    Ok(())
}
