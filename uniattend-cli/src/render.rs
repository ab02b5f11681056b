//! TUI rendering traits for uniattend types.
//!
//! Extension traits that add colored terminal rendering to uniattend-core
//! types using owo_colors.

use owo_colors::OwoColorize;
use uniattend_core::schedule::AcademicWeek;
use uniattend_core::{FieldDivergence, WeekRecord};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

/// A week together with the codes recorded for it.
pub struct WeekView<'a> {
    pub week: &'a AcademicWeek,
    pub record: Option<&'a WeekRecord>,
}

impl WeekView<'_> {
    fn filled(&self) -> usize {
        self.week
            .sessions()
            .filter(|s| self.code(&s.id).is_some())
            .count()
    }

    fn code(&self, session_id: &str) -> Option<&str> {
        self.record.and_then(|r| r.code(session_id))
    }

    /// One-line summary for week lists
    pub fn render_line(&self) -> String {
        let total = self.week.sessions().count();
        let filled = self.filled();
        let progress = format!("{}/{}", filled, total);
        let progress = if filled == total {
            progress.green().to_string()
        } else if filled == 0 {
            progress.dimmed().to_string()
        } else {
            progress.yellow().to_string()
        };

        format!("{:<8} {}  {}", self.week.id.bold(), self.week.label, progress)
    }
}

impl Render for WeekView<'_> {
    fn render(&self) -> String {
        let mut lines = vec![format!("📅 {} {}", self.week.label.bold(), self.week.id.dimmed())];

        for day in &self.week.schedule {
            lines.push(String::new());
            lines.push(format!("   {}, {}", day.day, day.date).dimmed().to_string());
            for session in &day.sessions {
                let code = match self.code(&session.id) {
                    Some(code) => code.green().bold().to_string(),
                    None => "-----".dimmed().to_string(),
                };
                lines.push(format!(
                    "   {:<7} {:<8} {:<7} {}",
                    session.course_code,
                    session.session_type,
                    session.id.dimmed(),
                    code
                ));
            }
        }

        lines.join("\n")
    }
}

impl Render for FieldDivergence {
    fn render(&self) -> String {
        let local = self.local.as_deref().unwrap_or("(unset)");
        let remote = self.remote.as_deref().unwrap_or("(unset)");
        format!(
            "   {} {} {}: {} → {}",
            "~".yellow(),
            self.week_id,
            self.session_id,
            local.red(),
            remote.green()
        )
    }
}
