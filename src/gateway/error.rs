use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::request::{FieldErrorBody, ValidationError};

use super::AUTOGRADE_STATUS_HEADER;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Body is not JSON or does not match the request schema.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Body parsed but one or more fields are invalid.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("batch too large: {size} requests (max {max})")]
    BatchTooLarge { size: usize, max: usize },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldErrorBody>,
}

impl GatewayError {
    fn status_label(&self) -> &'static str {
        match self {
            GatewayError::InvalidRequest(_) => "invalid_request",
            GatewayError::Validation(_) => "validation_error",
            GatewayError::BatchTooLarge { .. } => "batch_too_large",
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = match &self {
            GatewayError::InvalidRequest(_) | GatewayError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            GatewayError::BatchTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
        };

        let fields = match &self {
            GatewayError::Validation(err) => err.bodies(),
            _ => Vec::new(),
        };

        let mut headers = HeaderMap::new();
        headers.insert(
            AUTOGRADE_STATUS_HEADER,
            HeaderValue::from_static(self.status_label()),
        );

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: status.as_u16(),
            fields,
        });

        (status, headers, body).into_response()
    }
}
