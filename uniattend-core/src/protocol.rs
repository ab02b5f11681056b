//! JSON protocol spoken between uniattend clients and the server over HTTP.

use serde::{Deserialize, Serialize};

use crate::error::{AttendError, AttendResult};

/// GET for the full store, POST to replace it.
pub const ATTENDANCE_PATH: &str = "/api/attendance";

/// POST a single field delta.
pub const UPDATE_PATH: &str = "/api/attendance/update";

/// Identifies one field of the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    pub week_id: String,
    pub session_id: String,
}

/// A single field mutation, as sent by the delta sync transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldUpdate {
    pub week_id: String,
    pub session_id: String,
    pub value: String,
}

impl FieldUpdate {
    pub fn new(
        week_id: impl Into<String>,
        session_id: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            week_id: week_id.into(),
            session_id: session_id.into(),
            value: value.into(),
        }
    }

    pub fn key(&self) -> FieldKey {
        FieldKey {
            week_id: self.week_id.clone(),
            session_id: self.session_id.clone(),
        }
    }
}

/// Body of `POST /api/attendance/update` as received.
///
/// Every field is optional so that missing ids can be answered with a 400
/// instead of a deserialization rejection.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub week_id: Option<String>,
    pub session_id: Option<String>,
    pub value: Option<String>,
}

impl UpdateRequest {
    /// Validate the ids. A missing value means "unset".
    pub fn into_update(self) -> AttendResult<FieldUpdate> {
        let week_id = self
            .week_id
            .filter(|id| !id.is_empty())
            .ok_or(AttendError::MissingField("weekId"))?;
        let session_id = self
            .session_id
            .filter(|id| !id.is_empty())
            .ok_or(AttendError::MissingField("sessionId"))?;

        Ok(FieldUpdate {
            week_id,
            session_id,
            value: self.value.unwrap_or_default(),
        })
    }
}

/// `{"success": true}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    pub fn ok() -> Self {
        Self { success: true }
    }
}

/// `{"error": "..."}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_update_uses_camel_case() {
        let update = FieldUpdate::new("week_1", "mon_1", "AB12");
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"weekId": "week_1", "sessionId": "mon_1", "value": "AB12"})
        );
    }

    #[test]
    fn test_update_request_requires_ids() {
        let req: UpdateRequest = serde_json::from_str(r#"{"sessionId": "mon_1"}"#).unwrap();
        assert!(matches!(
            req.into_update(),
            Err(AttendError::MissingField("weekId"))
        ));

        let req: UpdateRequest =
            serde_json::from_str(r#"{"weekId": "week_1", "sessionId": ""}"#).unwrap();
        assert!(matches!(
            req.into_update(),
            Err(AttendError::MissingField("sessionId"))
        ));
    }

    #[test]
    fn test_update_request_missing_value_is_unset() {
        let req: UpdateRequest =
            serde_json::from_str(r#"{"weekId": "week_1", "sessionId": "mon_1"}"#).unwrap();
        let update = req.into_update().unwrap();
        assert_eq!(update, FieldUpdate::new("week_1", "mon_1", ""));
    }
}
