//! Backups and the plain-text week summary.

use chrono::NaiveDate;

use crate::attendance::{AttendanceStore, WeekRecord};
use crate::error::{AttendError, AttendResult};
use crate::schedule::AcademicWeek;

/// Pretty-printed JSON of the whole store.
pub fn export_json(store: &AttendanceStore) -> AttendResult<String> {
    Ok(serde_json::to_string_pretty(store)?)
}

/// `uni_attendance_backup_2025-11-03.json`
pub fn backup_file_name(date: NaiveDate) -> String {
    format!("uni_attendance_backup_{}.json", date.format("%Y-%m-%d"))
}

/// Parse a backup document.
///
/// The document must be a JSON object; anything else is rejected without
/// touching the current store.
pub fn parse_import(text: &str) -> AttendResult<AttendanceStore> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| AttendError::InvalidImport(e.to_string()))?;

    if !value.is_object() {
        return Err(AttendError::InvalidImport(
            "expected a JSON object at the top level".into(),
        ));
    }

    serde_json::from_value(value).map_err(|e| AttendError::InvalidImport(e.to_string()))
}

/// The text block users paste into their attendance submission, one line
/// per session in schedule order. Unset codes render as nothing after the dash.
pub fn week_summary(week: &AcademicWeek, record: Option<&WeekRecord>) -> String {
    let mut text = format!("Attendance for Week: {}\n\n", week.label);
    text.push_str("In the order of lessons in the week:\n\n");

    for day in &week.schedule {
        text.push_str(&format!("{}, {}\n", day.day, day.date));
        for session in &day.sessions {
            let code = record.and_then(|r| r.code(&session.id)).unwrap_or("");
            text.push_str(&format!(
                "{} {} - {}\n",
                session.course_code, session.session_type, code
            ));
        }
        text.push('\n');
    }

    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{DEFAULT_START_DATE, DEFAULT_TEMPLATE, generate_weeks};

    #[test]
    fn test_parse_import_accepts_store_document() {
        let store = parse_import(r#"{"w2":{"wed_1":"HELLO"}}"#).unwrap();
        assert_eq!(store.code("w2", "wed_1"), Some("HELLO"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_parse_import_rejects_non_objects() {
        for text in ["null", "[]", "\"text\"", "42", "not json"] {
            assert!(
                matches!(parse_import(text), Err(AttendError::InvalidImport(_))),
                "accepted {}",
                text
            );
        }
    }

    #[test]
    fn test_parse_import_rejects_wrong_shape() {
        assert!(parse_import(r#"{"w1": {"mon_1": 5}}"#).is_err());
    }

    #[test]
    fn test_export_then_import() {
        let store = AttendanceStore::new()
            .with_code("week_1", "mon_1", "ab12")
            .with_cleared_week("week_2");
        let json = export_json(&store).unwrap();
        assert!(json.contains("\n  \"week_1\""));
        assert_eq!(parse_import(&json).unwrap(), store);
    }

    #[test]
    fn test_backup_file_name() {
        assert_eq!(
            backup_file_name(DEFAULT_START_DATE),
            "uni_attendance_backup_2025-11-03.json"
        );
    }

    #[test]
    fn test_week_summary() {
        let weeks = generate_weeks(1, DEFAULT_START_DATE, DEFAULT_TEMPLATE);
        let store = AttendanceStore::new()
            .with_code("week_1", "mon_1", "ab12")
            .with_code("week_1", "fri_2", "zz");

        let text = week_summary(&weeks[0], store.week("week_1"));
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(
            lines[0],
            "Attendance for Week: Mon 3rd November - Fri 7th November"
        );
        assert_eq!(lines[2], "In the order of lessons in the week:");
        assert_eq!(lines[4], "Monday, 3 November 2025");
        assert_eq!(lines[5], "FIT1047 W02 - AB12");
        assert_eq!(lines[7], "Tuesday, 4 November 2025");
        assert_eq!(lines[8], "FIT1058 W02-P1 - ");
        assert!(text.ends_with("FIT1045 A08 - ZZ\n\n"));
    }
}
