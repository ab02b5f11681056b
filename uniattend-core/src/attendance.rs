//! The attendance dataset: week → session → code.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// Codes longer than this are truncated.
pub const MAX_CODE_LEN: usize = 5;

/// Uppercase `raw` and clip it to `MAX_CODE_LEN` characters.
pub fn normalize_code(raw: &str) -> String {
    raw.to_uppercase().chars().take(MAX_CODE_LEN).collect()
}

/// Codes recorded for the sessions of one week.
///
/// An empty string is the "unset" sentinel and reads the same as a missing key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeekRecord(BTreeMap<String, String>);

impl WeekRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn code(&self, session_id: &str) -> Option<&str> {
        self.0
            .get(session_id)
            .map(String::as_str)
            .filter(|code| !code.is_empty())
    }

    /// Store `raw` for the session after normalizing it.
    pub fn set(&mut self, session_id: impl Into<String>, raw: &str) {
        self.0.insert(session_id.into(), normalize_code(raw));
    }

    /// Number of sessions holding a non-empty code.
    pub fn filled(&self) -> usize {
        self.0.values().filter(|code| !code.is_empty()).count()
    }

    /// Sessions with a non-empty code, in key order.
    pub fn codes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .iter()
            .filter(|(_, code)| !code.is_empty())
            .map(|(session, code)| (session.as_str(), code.as_str()))
    }
}

/// The full dataset shared by every client.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttendanceStore(BTreeMap<String, WeekRecord>);

/// A field whose value differs between two copies of the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDivergence {
    pub week_id: String,
    pub session_id: String,
    pub local: Option<String>,
    pub remote: Option<String>,
}

impl AttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn week(&self, week_id: &str) -> Option<&WeekRecord> {
        self.0.get(week_id)
    }

    pub fn weeks(&self) -> impl Iterator<Item = (&str, &WeekRecord)> {
        self.0.iter().map(|(id, record)| (id.as_str(), record))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Look up a code. Absent keys and empty codes both yield `None`.
    pub fn code(&self, week_id: &str, session_id: &str) -> Option<&str> {
        self.week(week_id)?.code(session_id)
    }

    /// Set one field in place, creating the week record if needed.
    pub fn set_code(&mut self, week_id: &str, session_id: &str, raw: &str) {
        self.0
            .entry(week_id.to_string())
            .or_default()
            .set(session_id, raw);
    }

    /// Replace the week's record with an empty one.
    pub fn clear_week(&mut self, week_id: &str) {
        self.0.insert(week_id.to_string(), WeekRecord::new());
    }

    /// A new store that differs from `self` only at the given field.
    pub fn with_code(&self, week_id: &str, session_id: &str, raw: &str) -> Self {
        let mut next = self.clone();
        next.set_code(week_id, session_id, raw);
        next
    }

    /// A new store with the given week emptied.
    pub fn with_cleared_week(&self, week_id: &str) -> Self {
        let mut next = self.clone();
        next.clear_week(week_id);
        next
    }

    /// Compare every field present in either store.
    pub fn diff(&self, remote: &AttendanceStore) -> Vec<FieldDivergence> {
        let keys: BTreeSet<(&str, &str)> = self
            .field_keys()
            .chain(remote.field_keys())
            .collect();

        keys.into_iter()
            .filter_map(|(week_id, session_id)| {
                let local = self.code(week_id, session_id);
                let theirs = remote.code(week_id, session_id);
                (local != theirs).then(|| FieldDivergence {
                    week_id: week_id.to_string(),
                    session_id: session_id.to_string(),
                    local: local.map(String::from),
                    remote: theirs.map(String::from),
                })
            })
            .collect()
    }

    fn field_keys(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().flat_map(|(week, record)| {
            record
                .0
                .keys()
                .map(move |session| (week.as_str(), session.as_str()))
        })
    }
}

impl FromIterator<(String, WeekRecord)> for AttendanceStore {
    fn from_iter<I: IntoIterator<Item = (String, WeekRecord)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
