use anyhow::Result;
use dialoguer::Input;
use owo_colors::OwoColorize;

use super::Context;
use crate::render::{Render, WeekView};

enum Line<'a> {
    Refresh,
    Quit,
    Clear,
    Set { session_id: &'a str, code: &'a str },
}

fn parse_line(line: &str) -> Line<'_> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (None, _) => Line::Refresh,
        (Some("q" | "quit"), None) => Line::Quit,
        (Some("clear"), None) => Line::Clear,
        (Some(session_id), code) => Line::Set {
            session_id,
            code: code.unwrap_or(""),
        },
    }
}

fn print_week(ctx: &Context, week_id: &str) -> Result<()> {
    let week = ctx.week(week_id)?;
    let store = ctx.state.snapshot()?;
    let view = WeekView {
        week,
        record: store.week(week_id),
    };
    println!("{}\n", view.render());
    Ok(())
}

/// Interactive editing of one week. Edits are applied locally at once and
/// synced in the background.
pub async fn run(ctx: &Context, week_id: &str) -> Result<()> {
    let week = ctx.week(week_id)?;
    print_week(ctx, week_id)?;
    println!(
        "{}",
        "Type '<session> <code>' to record a code, '<session>' to unset it,\n\
         an empty line to refresh from the server, 'clear' or 'q'."
            .dimmed()
    );

    loop {
        let input: String = tokio::task::block_in_place(|| {
            Input::<String>::new()
                .with_prompt("  ")
                .allow_empty(true)
                .interact_text()
        })?;

        match parse_line(&input) {
            Line::Quit => break,
            Line::Refresh => {
                let drift = ctx.state.reconcile().await;
                match drift {
                    Ok(drift) => {
                        for divergence in &drift {
                            println!("{}", divergence.render());
                        }
                    }
                    Err(e) => println!("   {}", e.to_string().red()),
                }
                print_week(ctx, week_id)?;
            }
            Line::Clear => ctx.state.clear_week(week_id)?,
            Line::Set { session_id, code } => {
                if !week.has_session(session_id) {
                    println!("   {}", format!("unknown session '{}'", session_id).red());
                    continue;
                }
                ctx.state.set_code(week_id, session_id, code)?;
            }
        }
    }

    ctx.flush().await;
    Ok(())
}
