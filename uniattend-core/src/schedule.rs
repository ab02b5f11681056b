//! Academic week generation.
//!
//! The attendance store never validates ids against this schedule; it is
//! reference data for rendering and for the text summary.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::error::{AttendError, AttendResult};

pub const DEFAULT_WEEK_COUNT: usize = 15;

/// Monday of week 1.
pub const DEFAULT_START_DATE: NaiveDate = match NaiveDate::from_ymd_opt(2025, 11, 3) {
    Some(date) => date,
    None => panic!("invalid default start date"),
};

/// A session slot repeated every week.
#[derive(Debug, Clone, Copy)]
pub struct SessionTemplate {
    pub id: &'static str,
    pub course_code: &'static str,
    pub session_type: &'static str,
}

/// The sessions of one weekday, in display order.
#[derive(Debug, Clone, Copy)]
pub struct DayTemplate {
    pub day: &'static str,
    pub sessions: &'static [SessionTemplate],
}

const fn session(
    id: &'static str,
    course_code: &'static str,
    session_type: &'static str,
) -> SessionTemplate {
    SessionTemplate {
        id,
        course_code,
        session_type,
    }
}

/// Monday to Friday, one entry per weekday.
pub const DEFAULT_TEMPLATE: &[DayTemplate] = &[
    DayTemplate {
        day: "Monday",
        sessions: &[session("mon_1", "FIT1047", "W02")],
    },
    DayTemplate {
        day: "Tuesday",
        sessions: &[
            session("tue_1", "FIT1058", "W02-P1"),
            session("tue_2", "FIT1058", "W02-P2"),
            session("tue_3", "FIT1051", "W01"),
        ],
    },
    DayTemplate {
        day: "Wednesday",
        sessions: &[
            session("wed_1", "FIT1045", "W02"),
            session("wed_2", "FIT1058", "A01"),
        ],
    },
    DayTemplate {
        day: "Thursday",
        sessions: &[session("thu_1", "FIT1047", "A01")],
    },
    DayTemplate {
        day: "Friday",
        sessions: &[
            session("fri_1", "FIT1051", "A08"),
            session("fri_2", "FIT1045", "A08"),
        ],
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub course_code: String,
    pub session_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailySchedule {
    pub day: String,
    /// e.g. "3 November 2025"
    pub date: String,
    pub sessions: Vec<Session>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcademicWeek {
    pub id: String,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub schedule: Vec<DailySchedule>,
}

impl AcademicWeek {
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.schedule.iter().flat_map(|day| day.sessions.iter())
    }

    pub fn has_session(&self, session_id: &str) -> bool {
        self.sessions().any(|s| s.id == session_id)
    }
}

/// Generate `count` consecutive weeks, the first starting on `start`.
pub fn generate_weeks(
    count: usize,
    start: NaiveDate,
    template: &[DayTemplate],
) -> Vec<AcademicWeek> {
    (0..count)
        .map(|i| {
            let monday = start + Duration::days(7 * i as i64);
            let friday = monday + Duration::days(4);

            let schedule = template
                .iter()
                .enumerate()
                .map(|(offset, day)| DailySchedule {
                    day: day.day.to_string(),
                    date: format_date(monday + Duration::days(offset as i64)),
                    sessions: day
                        .sessions
                        .iter()
                        .map(|s| Session {
                            id: s.id.to_string(),
                            course_code: s.course_code.to_string(),
                            session_type: s.session_type.to_string(),
                        })
                        .collect(),
                })
                .collect();

            AcademicWeek {
                id: format!("week_{}", i + 1),
                label: format!("Mon {} - Fri {}", short_label(monday), short_label(friday)),
                start_date: monday,
                end_date: friday,
                schedule,
            }
        })
        .collect()
}

pub fn find_week<'a>(weeks: &'a [AcademicWeek], week_id: &str) -> AttendResult<&'a AcademicWeek> {
    weeks
        .iter()
        .find(|w| w.id == week_id)
        .ok_or_else(|| AttendError::WeekNotFound(week_id.to_string()))
}

/// "3 November 2025"
fn format_date(date: NaiveDate) -> String {
    date.format("%-d %B %Y").to_string()
}

/// "3rd November"
fn short_label(date: NaiveDate) -> String {
    format!("{} {}", ordinal(date.day()), date.format("%B"))
}

fn ordinal(n: u32) -> String {
    let suffix = match (n % 100, n % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordinal_suffixes() {
        let cases = [
            (1, "1st"),
            (2, "2nd"),
            (3, "3rd"),
            (4, "4th"),
            (11, "11th"),
            (12, "12th"),
            (13, "13th"),
            (21, "21st"),
            (22, "22nd"),
            (30, "30th"),
        ];
        for (n, expected) in cases {
            assert_eq!(ordinal(n), expected);
        }
    }

    #[test]
    fn test_default_weeks() {
        let weeks = generate_weeks(DEFAULT_WEEK_COUNT, DEFAULT_START_DATE, DEFAULT_TEMPLATE);
        assert_eq!(weeks.len(), 15);

        let first = &weeks[0];
        assert_eq!(first.id, "week_1");
        assert_eq!(first.label, "Mon 3rd November - Fri 7th November");
        assert_eq!(first.end_date, NaiveDate::from_ymd_opt(2025, 11, 7).unwrap());
        assert_eq!(first.schedule[0].date, "3 November 2025");
        assert_eq!(first.schedule[4].date, "7 November 2025");
        assert_eq!(first.sessions().count(), 9);

        // Jan 6th 2026 falls in week 10
        let tenth = &weeks[9];
        assert_eq!(tenth.id, "week_10");
        assert_eq!(tenth.start_date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert_eq!(tenth.schedule[1].date, "6 January 2026");
    }

    #[test]
    fn test_label_spans_month_boundary() {
        let weeks = generate_weeks(5, DEFAULT_START_DATE, DEFAULT_TEMPLATE);
        assert_eq!(weeks[3].label, "Mon 24th November - Fri 28th November");
        assert_eq!(weeks[4].label, "Mon 1st December - Fri 5th December");
    }

    #[test]
    fn test_find_week() {
        let weeks = generate_weeks(3, DEFAULT_START_DATE, DEFAULT_TEMPLATE);
        assert_eq!(find_week(&weeks, "week_2").unwrap().id, "week_2");
        assert!(find_week(&weeks, "week_4").is_err());
        assert!(weeks[0].has_session("tue_3"));
        assert!(!weeks[0].has_session("sat_1"));
    }
}
