use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument};

use crate::aggregate::GradingResult;
use crate::constants::MAX_BATCH_SIZE;
use crate::request::{FieldError, FieldIssue, ValidationError, payload_from_json};

use super::error::GatewayError;
use super::state::GatewayState;
use super::AUTOGRADE_METHOD_HEADER;

#[derive(Debug, Deserialize)]
pub struct BatchRequest {
    pub requests: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BatchResponse {
    pub results: Vec<GradingResult>,
}

#[instrument(skip(state, body))]
pub async fn grade_handler(
    State(state): State<GatewayState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(value) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    let Value::Object(object) = value else {
        return Err(GatewayError::InvalidRequest(
            "request body must be a JSON object".to_string(),
        ));
    };
    let payload = payload_from_json(&object)?;

    let result = state.engine.grade_payload(payload).await?;
    Ok(make_response(&result))
}

#[instrument(skip(state, body), fields(batch_size = tracing::field::Empty))]
pub async fn grade_batch_handler(
    State(state): State<GatewayState>,
    body: Result<Json<BatchRequest>, JsonRejection>,
) -> Result<Response, GatewayError> {
    let Json(batch) = body.map_err(|e| GatewayError::InvalidRequest(e.body_text()))?;
    tracing::Span::current().record("batch_size", batch.requests.len());

    if batch.requests.len() > MAX_BATCH_SIZE {
        return Err(GatewayError::BatchTooLarge {
            size: batch.requests.len(),
            max: MAX_BATCH_SIZE,
        });
    }

    let mut payloads = Vec::with_capacity(batch.requests.len());
    let mut problems = Vec::new();
    for (i, value) in batch.requests.into_iter().enumerate() {
        let prefix = format!("requests[{}]", i);
        match value {
            Value::Object(object) => match payload_from_json(&object) {
                Ok(payload) => payloads.push(payload),
                Err(err) => problems.extend(err.with_prefix(&prefix).fields),
            },
            _ => problems.push(FieldError::new(
                prefix,
                FieldIssue::InvalidType {
                    expected: "a JSON object",
                },
            )),
        }
    }
    if !problems.is_empty() {
        return Err(ValidationError::new(problems).into());
    }

    let results = state.engine.grade_payloads(payloads).await?;
    debug!(graded = results.len(), "Batch graded");

    Ok((StatusCode::OK, Json(BatchResponse { results })).into_response())
}

/// 200 response carrying the result and its method header.
pub fn make_response(result: &GradingResult) -> Response {
    let mut headers = HeaderMap::new();
    headers.insert(
        AUTOGRADE_METHOD_HEADER,
        HeaderValue::from_static(result.method.as_str()),
    );
    (StatusCode::OK, headers, Json(result)).into_response()
}
