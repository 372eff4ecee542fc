use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::Value;

use npe_bedrock::error::GenerationError;
use npe_core::sanitize::Deficiency;

/// Unified API error type for all route handlers.
#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// The generation service failed or timed out.
    Upstream {
        status: Option<u16>,
        message: String,
    },
    /// The model's reply held no usable JSON object.
    Unparseable { raw: String },
    /// The reply parsed but broke its output contract.
    Incomplete {
        raw: String,
        partial: Value,
        deficiencies: Vec<Deficiency>,
    },
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    /// Status code reported by the generation service, if it answered.
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    partial: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    deficiencies: Vec<Deficiency>,
}

impl ErrorBody {
    fn message(error: String) -> Self {
        Self {
            error,
            status: None,
            detail: None,
            raw: None,
            partial: None,
            deficiencies: Vec::new(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorBody::message(msg)),
            ApiError::Upstream { status, message } => {
                tracing::warn!(upstream_status = status, "generation service error: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorBody {
                        status,
                        detail: Some(message),
                        ..ErrorBody::message("generation service call failed".to_string())
                    },
                )
            }
            ApiError::Unparseable { raw } => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    raw: Some(raw),
                    ..ErrorBody::message("model did not return valid JSON".to_string())
                },
            ),
            ApiError::Incomplete {
                raw,
                partial,
                deficiencies,
            } => (
                StatusCode::BAD_GATEWAY,
                ErrorBody {
                    raw: Some(raw),
                    partial: Some(partial),
                    deficiencies,
                    ..ErrorBody::message(
                        "model response did not comply with required structure/options"
                            .to_string(),
                    )
                },
            ),
            ApiError::Internal(msg) => {
                tracing::error!("internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::message("internal server error".to_string()),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<GenerationError> for ApiError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::InvalidInput(msg) => ApiError::BadRequest(msg),
            GenerationError::Transport { status, message } => ApiError::Upstream { status, message },
            GenerationError::Unparseable { raw } => ApiError::Unparseable { raw },
            GenerationError::Incomplete { raw, partial } => ApiError::Incomplete {
                raw,
                deficiencies: partial.deficiencies(),
                partial: partial.to_value(),
            },
            GenerationError::Config(msg) => ApiError::Internal(msg),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        ApiError::BadRequest(e.body_text())
    }
}
