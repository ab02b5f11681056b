//! Attendance endpoints: full read, full overwrite, single-field merge

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::{get, post},
};
use tracing::info;
use uniattend_core::AttendanceStore;
use uniattend_core::protocol::{ATTENDANCE_PATH, SuccessResponse, UPDATE_PATH, UpdateRequest};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(ATTENDANCE_PATH, get(read_all).post(overwrite_all))
        .route(UPDATE_PATH, post(merge_field))
}

/// GET /api/attendance - The full store
async fn read_all(State(state): State<AppState>) -> Json<AttendanceStore> {
    Json(state.store().read_all())
}

/// POST /api/attendance - Replace the full store
async fn overwrite_all(
    State(state): State<AppState>,
    body: Result<Json<AttendanceStore>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Json(store) = body.map_err(AppError::bad_request)?;

    state.store().overwrite_all(&store)?;
    info!(weeks = store.len(), "attendance data replaced");

    Ok(Json(SuccessResponse::ok()))
}

/// POST /api/attendance/update - Merge one field into the store
async fn merge_field(
    State(state): State<AppState>,
    body: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, AppError> {
    let Json(req) = body.map_err(AppError::bad_request)?;
    let update = req.into_update().map_err(AppError::bad_request)?;

    state.store().merge_field(&update)?;

    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::state::AppState;

    struct TestApp {
        _dir: tempfile::TempDir,
        state: AppState,
    }

    impl TestApp {
        fn new() -> Self {
            let dir = tempfile::tempdir().unwrap();
            let state = AppState::new(dir.path().join("attendance.json")).unwrap();
            Self { _dir: dir, state }
        }

        async fn request(
            &self,
            method: &str,
            uri: &str,
            body: Option<&str>,
        ) -> (StatusCode, Value) {
            let app = crate::app(self.state.clone(), None);
            let request = Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(body.map(|b| Body::from(b.to_string())).unwrap_or_else(Body::empty))
                .unwrap();

            let response = app.oneshot(request).await.unwrap();
            let status = response.status();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            (status, value)
        }

        async fn read(&self) -> Value {
            let (status, body) = self.request("GET", "/api/attendance", None).await;
            assert_eq!(status, StatusCode::OK);
            body
        }

        async fn update(&self, body: Value) -> (StatusCode, Value) {
            self.request("POST", "/api/attendance/update", Some(&body.to_string()))
                .await
        }
    }

    #[tokio::test]
    async fn test_get_without_data_returns_empty_object() {
        let app = TestApp::new();
        assert_eq!(app.read().await, json!({}));
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let app = TestApp::new();

        let (status, body) = app
            .update(json!({"weekId": "w1", "sessionId": "mon_1", "value": "ab12"}))
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
        assert_eq!(app.read().await, json!({"w1": {"mon_1": "AB12"}}));

        app.update(json!({"weekId": "w1", "sessionId": "tue_1", "value": "z"}))
            .await;
        assert_eq!(
            app.read().await,
            json!({"w1": {"mon_1": "AB12", "tue_1": "Z"}})
        );
    }

    #[tokio::test]
    async fn test_update_without_ids_is_rejected() {
        let app = TestApp::new();

        let (status, body) = app.update(json!({"sessionId": "mon_1", "value": "a"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("weekId"));

        let (status, _) = app.update(json!({"weekId": "w1", "value": "a"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = app
            .request("POST", "/api/attendance/update", Some("not json"))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        assert_eq!(app.read().await, json!({}));
    }

    #[tokio::test]
    async fn test_overwrite_discards_previous_state() {
        let app = TestApp::new();
        app.update(json!({"weekId": "w1", "sessionId": "mon_1", "value": "old"}))
            .await;

        let (status, body) = app
            .request(
                "POST",
                "/api/attendance",
                Some(r#"{"w2":{"wed_1":"HELLO"}}"#),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"success": true}));
        assert_eq!(app.read().await, json!({"w2": {"wed_1": "HELLO"}}));
    }

    #[tokio::test]
    async fn test_overwrite_with_malformed_body_leaves_store_untouched() {
        let app = TestApp::new();
        app.update(json!({"weekId": "w1", "sessionId": "mon_1", "value": "keep"}))
            .await;

        for body in ["null", "[1, 2]", r#"{"w1": {"mon_1": 7}}"#] {
            let (status, _) = app.request("POST", "/api/attendance", Some(body)).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body {}", body);
        }

        assert_eq!(app.read().await, json!({"w1": {"mon_1": "KEEP"}}));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_updates_are_all_kept() {
        let app = TestApp::new();
        let sessions = [
            "mon_1", "tue_1", "tue_2", "tue_3", "wed_1", "wed_2", "thu_1", "fri_1",
        ];

        let requests = sessions.iter().map(|session| {
            let state = app.state.clone();
            let body = json!({"weekId": "w1", "sessionId": session, "value": "ok"}).to_string();
            tokio::spawn(async move {
                let request = Request::builder()
                    .method("POST")
                    .uri("/api/attendance/update")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap();
                crate::app(state, None).oneshot(request).await.unwrap().status()
            })
        });

        for handle in requests.collect::<Vec<_>>() {
            assert_eq!(handle.await.unwrap(), StatusCode::OK);
        }

        let stored = app.read().await;
        for session in sessions {
            assert_eq!(stored["w1"][session], "OK");
        }
    }
}
