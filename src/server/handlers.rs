//! Request handlers.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde_json::{Value, json};

use super::AppState;
use crate::constants::ARTIFACT_CONTENT_TYPE;
use crate::core::ReportError;

/// `POST /generate`: fields in, PDF attachment out.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ReportError> {
    let Json(body) = payload.map_err(|rejection| reject(rejection.body_text()))?;
    let Value::Object(fields) = body else {
        return Err(reject("expected a JSON object of fields".to_string()));
    };

    let artifact = state.service.generate(&fields).await?;
    let size = artifact.size();
    let stream = artifact.into_stream().await?;

    tracing::debug!(target: "server", "Streaming {} bytes", size);
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(ARTIFACT_CONTENT_TYPE)),
            (header::CONTENT_DISPOSITION, state.content_disposition.clone()),
            (header::CONTENT_LENGTH, HeaderValue::from(size)),
        ],
        Body::from_stream(stream),
    )
        .into_response())
}

/// `GET /health`
pub async fn health() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

fn reject(reason: String) -> ReportError {
    tracing::warn!(target: "server", "Rejected request body: {}", reason);
    ReportError::InvalidRequest {
        reason,
    }
}

impl IntoResponse for ReportError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(json!({"error": self.to_string()}))).into_response()
    }
}
