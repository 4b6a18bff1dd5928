// HTTP request handlers
use crate::application::store::StoreError;
use crate::domain::reading::{InvalidReading, Reading};
use crate::presentation::app_state::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Deserialize)]
pub struct IngestRequest {
    pub user_id: String,
    pub measurement: String,
    pub field1: f64,
}

#[derive(Deserialize)]
pub struct UserRequest {
    pub user_id: String,
}

#[derive(Serialize)]
pub struct StatusBody {
    pub status: &'static str,
}

#[derive(Serialize)]
pub struct TaskBody {
    pub status: &'static str,
    pub task: String,
    pub every: String,
}

/// Errors a handler can surface to the caller.
pub enum ApiError {
    BadRequest(String),
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::Store(err)
    }
}

impl From<InvalidReading> for ApiError {
    fn from(err: InvalidReading) -> Self {
        ApiError::BadRequest(err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Store(StoreError::Unauthorized) => (
                StatusCode::UNAUTHORIZED,
                "error: insufficient permission to write into bucket".to_string(),
            ),
            ApiError::Store(StoreError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                "error: Bucket name does not exist.".to_string(),
            ),
            ApiError::Store(StoreError::Transient(_)) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "error: time-series database unavailable, retry later".to_string(),
            ),
            ApiError::Store(StoreError::Unknown(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "error: internal failure".to_string(),
            ),
        };
        (status, message).into_response()
    }
}

fn require_user_id(raw: &str) -> Result<&str, ApiError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ApiError::BadRequest("user_id must not be empty".into()));
    }
    Ok(trimmed)
}

/// Welcome endpoint
pub async fn welcome() -> &'static str {
    "Welcome to the telemetry gateway. POST readings to /ingest."
}

/// Write one reading into the source bucket
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(body): Json<IngestRequest>,
) -> Result<Json<StatusBody>, ApiError> {
    let reading = Reading::new(body.user_id, body.measurement, body.field1)?;
    state.ingest_service.ingest(reading).await.map_err(|err| {
        tracing::error!(%err, "ingest failed");
        ApiError::from(err)
    })?;
    Ok(Json(StatusBody { status: "success" }))
}

/// Run the fixed 24h downsample query for a user. Rows are logged, never
/// returned, and the caller always sees success, even when the query fails.
pub async fn query_downsampled(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UserRequest>,
) -> Result<Json<StatusBody>, ApiError> {
    let user_id = require_user_id(&body.user_id)?;
    match state.query_service.latest_downsampled(user_id).await {
        Ok(rows) => tracing::debug!(rows, "downsample query returned"),
        Err(err) => tracing::error!(%err, "downsample query failed"),
    }
    Ok(Json(StatusBody { status: "success" }))
}

/// Register the 5-minute downsampling task for a user
pub async fn setup_downsample_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UserRequest>,
) -> Result<(StatusCode, Json<TaskBody>), ApiError> {
    let user_id = require_user_id(&body.user_id)?;
    let registered = state
        .task_service
        .register_downsample_task(user_id)
        .await
        .map_err(|err| {
            tracing::error!(%err, "downsample task setup failed");
            ApiError::from(err)
        })?;
    Ok((
        StatusCode::CREATED,
        Json(TaskBody {
            status: "created",
            task: registered.name,
            every: registered.every,
        }),
    ))
}

/// Reset the user's alert bucket and register the 1-minute alert task
pub async fn setup_alert_task(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UserRequest>,
) -> Result<(StatusCode, Json<TaskBody>), ApiError> {
    let user_id = require_user_id(&body.user_id)?;
    let registered = state
        .task_service
        .register_zero_alert_task(user_id)
        .await
        .map_err(|err| {
            tracing::error!(%err, "alert task setup failed");
            ApiError::from(err)
        })?;
    Ok((
        StatusCode::CREATED,
        Json(TaskBody {
            status: "created",
            task: registered.name,
            every: registered.every,
        }),
    ))
}
