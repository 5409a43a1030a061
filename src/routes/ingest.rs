use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde_json::{json, Value};

use crate::db;
use crate::error::AppError;
use crate::state::SharedState;

const NO_DATA: &str = "No data provided";

pub async fn collect(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<Value>, AppError> {
    let body = body.map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Payload too large".to_string())
        } else {
            AppError::Internal(format!("Failed to read request body: {}", rejection.body_text()))
        }
    })?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    let payload = parse_payload(content_type, &body)?;

    let submission = db::submissions::create(&state.pool, &payload).await?;
    tracing::info!(id = submission.id, "Submission stored");

    Ok(Json(json!({
        "message": "Data collected successfully",
        "id": submission.id,
    })))
}

/// Decode the request body and re-serialize it as compact JSON text.
///
/// Only a non-empty JSON object is accepted. A body sent without a JSON
/// content type is treated the same as no body at all. A body that claims
/// JSON but cannot be decoded is a server-side failure.
pub fn parse_payload(content_type: Option<&str>, body: &[u8]) -> Result<String, AppError> {
    if !content_type.is_some_and(is_json) || body.iter().all(u8::is_ascii_whitespace) {
        return Err(AppError::BadRequest(NO_DATA.to_string()));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| AppError::Internal(format!("Failed to decode request body: {e}")))?;

    match &value {
        Value::Object(map) if !map.is_empty() => serde_json::to_string(&value)
            .map_err(|e| AppError::Internal(format!("Failed to serialize payload: {e}"))),
        _ => Err(AppError::BadRequest(NO_DATA.to_string())),
    }
}

fn is_json(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    mime == "application/json" || mime.ends_with("+json")
}
