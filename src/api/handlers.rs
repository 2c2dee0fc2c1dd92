//! HTTP request handlers

use super::assets::{index_html, serve_static};
use super::types::{ErrorResponse, SetStatusRequest, SetStatusResponse, StatusResponse};
use super::AppState;
use crate::state_machine::input::{parse_local_datetime, DATETIME_FORMAT};
use crate::status::{CourtStatus, StatusChange};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};

/// Actor recorded for changes made over HTTP
pub const API_ACTOR: &str = "api";

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Landing page
        .route("/", get(serve_index))
        .route("/assets/*path", get(serve_static))
        // Status read and update
        .route("/api/status", get(get_status).post(post_status))
        .route("/api/status/:new_status", get(set_status_by_path))
        // Version
        .route("/version", get(get_version))
        .with_state(state)
}

async fn serve_index() -> Response {
    match index_html() {
        Some(content) => Html(content).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Html("<h1>404 - landing page not found</h1>".to_string()),
        )
            .into_response(),
    }
}

// ============================================================
// Status
// ============================================================

async fn get_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let today = state.now().date_naive();
    let record = state.store.snapshot(today).await;
    Json(StatusResponse::new(record, today))
}

/// Quick setter for plain open and closed
async fn set_status_by_path(
    State(state): State<AppState>,
    Path(new_status): Path<String>,
) -> Result<Json<SetStatusResponse>, AppError> {
    let change = match new_status.parse::<CourtStatus>() {
        Ok(CourtStatus::Open) => StatusChange::Open,
        Ok(CourtStatus::Closed) => StatusChange::Closed,
        _ => return Err(AppError::BadRequest("Invalid status".to_string())),
    };
    apply(&state, change).await
}

async fn post_status(
    State(state): State<AppState>,
    Json(req): Json<SetStatusRequest>,
) -> Result<Json<SetStatusResponse>, AppError> {
    let change = match (req.status, req.until) {
        (CourtStatus::Open, None) => StatusChange::Open,
        (CourtStatus::Closed, None) => StatusChange::Closed,
        (CourtStatus::ClosedUntil, Some(until)) => {
            let until = parse_local_datetime(&until, &state.timezone)
                .map_err(|e| AppError::BadRequest(format!("Invalid until: {e}")))?;
            if until <= state.now() {
                return Err(AppError::BadRequest(
                    "until must be in the future".to_string(),
                ));
            }
            StatusChange::ClosedUntil(until)
        }
        (CourtStatus::ClosedUntil, None) => {
            return Err(AppError::BadRequest(format!(
                "closed_until requires until ({DATETIME_FORMAT})"
            )));
        }
        (_, Some(_)) => {
            return Err(AppError::BadRequest(
                "until is only valid with closed_until".to_string(),
            ));
        }
    };
    apply(&state, change).await
}

async fn apply(state: &AppState, change: StatusChange) -> Result<Json<SetStatusResponse>, AppError> {
    let now = state.now();
    state.store.set_status(change, API_ACTOR, true, now).await;

    let today = now.date_naive();
    let record = state.store.snapshot(today).await;
    Ok(Json(SetStatusResponse {
        success: true,
        status: StatusResponse::new(record, today),
    }))
}

async fn get_version() -> &'static str {
    concat!("court-status ", env!("CARGO_PKG_VERSION"))
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        tracing::debug!(status = %status, error = %message, "Request rejected");
        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::status::{Hours, StatusRecord, StatusStore, WeatherReport};
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use chrono::{DateTime, TimeZone};
    use chrono_tz::{America::New_York, Tz};
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn now() -> DateTime<Tz> {
        New_York.with_ymd_and_hms(2025, 8, 18, 11, 53, 4).unwrap()
    }

    fn test_state() -> AppState {
        let store = Arc::new(StatusStore::new(StatusRecord::initial(
            Hours::new(6, 20).unwrap(),
            now(),
        )));
        AppState::new(store, Arc::new(FixedClock::new(now())), New_York)
    }

    async fn call(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(body: &Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/status")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn status_is_flat_json() {
        let state = test_state();
        state
            .store
            .set_weather(WeatherReport {
                temperature: Some(75),
                precipitation: Some(0.4),
                conditions: "Light rain".to_string(),
            })
            .await;

        let (code, body) = call(&state, get("/api/status")).await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["status"], "open");
        assert_eq!(body["temperature"], 75);
        assert_eq!(body["precipitation"], 0.4);
        assert_eq!(body["conditions"], "Light rain");
        assert_eq!(body["updated_by"], "system");
        assert_eq!(body["manual_override"], false);
        assert_eq!(body["hours"], json!({"open": 6, "close": 20}));
        assert_eq!(body["effective_hours"], json!({"open": 6, "close": 20}));
        assert_eq!(body["closed_until"], Value::Null);
        assert_eq!(body["last_updated"], "2025-08-18T11:53:04-04:00");
    }

    #[tokio::test]
    async fn unavailable_weather_reads_as_na() {
        let state = test_state();
        state.store.set_weather(WeatherReport::unavailable()).await;

        let (_, body) = call(&state, get("/api/status")).await;

        assert_eq!(body["temperature"], "N/A");
        assert_eq!(body["precipitation"], "N/A");
        assert_eq!(body["conditions"], WeatherReport::UNAVAILABLE);
    }

    #[tokio::test]
    async fn path_setter_accepts_open_and_closed() {
        let state = test_state();

        let (code, body) = call(&state, get("/api/status/closed")).await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["status"]["status"], "closed");
        assert_eq!(body["status"]["updated_by"], API_ACTOR);
        assert_eq!(body["status"]["manual_override"], true);
    }

    #[tokio::test]
    async fn path_setter_rejects_other_values() {
        let state = test_state();

        for bad in ["closed_until", "maybe", "OPEN"] {
            let (code, body) = call(&state, get(&format!("/api/status/{bad}"))).await;
            assert_eq!(code, StatusCode::BAD_REQUEST, "{bad}");
            assert_eq!(body, json!({"error": "Invalid status"}));
        }
        let (_, body) = call(&state, get("/api/status")).await;
        assert_eq!(body["status"], "open");
        assert_eq!(body["updated_by"], "system");
    }

    #[tokio::test]
    async fn post_closed_until_stores_local_time() {
        let state = test_state();

        let (code, body) = call(
            &state,
            post_json(&json!({"status": "closed_until", "until": "2025-08-18 15:30"})),
        )
        .await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["status"]["status"], "closed_until");
        assert_eq!(body["status"]["closed_until"], "2025-08-18T15:30:00-04:00");
    }

    #[tokio::test]
    async fn post_closed_until_requires_future_time() {
        let state = test_state();

        let (code, _) = call(
            &state,
            post_json(&json!({"status": "closed_until", "until": "2025-08-18 08:00"})),
        )
        .await;
        assert_eq!(code, StatusCode::BAD_REQUEST);

        let (code, _) = call(&state, post_json(&json!({"status": "closed_until"}))).await;
        assert_eq!(code, StatusCode::BAD_REQUEST);

        let (code, _) = call(
            &state,
            post_json(&json!({"status": "closed_until", "until": "tomorrow"})),
        )
        .await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn post_open_clears_reopen_time() {
        let state = test_state();
        call(
            &state,
            post_json(&json!({"status": "closed_until", "until": "2025-08-19 06:00"})),
        )
        .await;

        let (code, body) = call(&state, post_json(&json!({"status": "open"}))).await;

        assert_eq!(code, StatusCode::OK);
        assert_eq!(body["status"]["status"], "open");
        assert_eq!(body["status"]["closed_until"], Value::Null);
    }

    #[tokio::test]
    async fn until_without_closed_until_is_rejected() {
        let state = test_state();
        let (code, _) = call(
            &state,
            post_json(&json!({"status": "closed", "until": "2025-08-19 06:00"})),
        )
        .await;
        assert_eq!(code, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn landing_page_is_served() {
        let response = create_router(test_state()).oneshot(get("/")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8_lossy(&bytes).contains("/api/status"));

        let response = create_router(test_state())
            .oneshot(get("/assets/style.css"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }
}
