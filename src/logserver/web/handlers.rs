use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, info, warn};

use crate::logcommon::{AppError, LogCriteria, LogRecord};
use crate::logquery::{run_query, validate_log_entry};
use super::server::AppState;

/// Error body returned by every failing endpoint: `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    /// Map an application error; server-side failures get the generic `context` text
    fn from_app_error(err: AppError, context: &str) -> Self {
        if err.is_client_error() {
            return Self::bad_request(match err {
                AppError::Validation(reason) => reason.to_string(),
                other => other.to_string(),
            });
        }

        error!(error = %err, error_type = err.get_error_type_summary(), "{}", context);
        Self::internal(context)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { error: &self.message })).into_response()
    }
}

/// Health response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

/// POST /logs - ingest a single log entry
pub async fn ingest_log_handler(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<LogRecord>), ApiError> {
    const CONTEXT: &str = "Internal server error during log ingestion";

    // An empty body behaves like `{}` so the missing-field message names `level`
    let candidate: Value = if body.iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?
    };

    let record = match validate_log_entry(&candidate) {
        Ok(record) => record,
        Err(reason) => {
            warn!(field = reason.field(), %reason, "Rejected log entry");
            return Err(ApiError::from_app_error(reason.into(), CONTEXT));
        }
    };

    state
        .store
        .append(record.clone())
        .map_err(|e| ApiError::from_app_error(e, CONTEXT))?;

    info!(
        level = %record.level,
        resource_id = %record.resource_id,
        trace_id = %record.trace_id,
        "Log entry ingested"
    );

    Ok((StatusCode::CREATED, Json(record)))
}

/// GET /logs - filtered records, most recent first
pub async fn query_logs_handler(
    State(state): State<Arc<AppState>>,
    criteria: Result<Query<LogCriteria>, QueryRejection>,
) -> Result<Json<Vec<LogRecord>>, ApiError> {
    const CONTEXT: &str = "Internal server error during log retrieval";

    let Query(criteria) = criteria.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let records = state
        .store
        .read_all()
        .map_err(|e| ApiError::from_app_error(e, CONTEXT))?;
    let total = records.len();

    let result = run_query(records, &criteria);
    info!(total, matched = result.len(), filtered = !criteria.is_empty(), "Logs queried");

    Ok(Json(result))
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

/// GET / - the log browser page, read at request time so edits show up without a restart
pub async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let index_path = state.static_dir.join("index.html");
    match tokio::fs::read_to_string(&index_path).await {
        Ok(content) => Html(content).into_response(),
        Err(e) => {
            error!("Could not read {}: {}", index_path.display(), e);
            (
                StatusCode::NOT_FOUND,
                Html("<html><body><h1>Error: Could not load index.html</h1></body></html>".to_string()),
            )
                .into_response()
        }
    }
}
