use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use serde_json::Value;

use npe_core::models::request::CaseRequest;

use crate::error::ApiError;
use crate::state::AppState;

/// Generate one practice case. The answer key is only included when the
/// request sets `revealKey`.
pub async fn generate_case(
    State(state): State<AppState>,
    payload: Result<Json<CaseRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;
    let case = npe_bedrock::pipeline::generate_case(&state.generator, &state.registry, &req).await?;

    tracing::info!(
        request_id = %case.meta.request_id,
        reveal_key = case.meta.reveal_key,
        "case generated"
    );

    Ok(Json(case.to_response()))
}
