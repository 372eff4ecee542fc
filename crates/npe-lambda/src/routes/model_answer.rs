use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

use npe_bedrock::pipeline::generate_model_answer;
use npe_core::models::request::ModelAnswerRequest;
use npe_core::sanitize::ValidatedAnswer;

use crate::error::ApiError;
use crate::state::AppState;

/// Write a validated Steps 1–7 model answer for the submitted vignette.
pub async fn model_answer(
    State(state): State<AppState>,
    payload: Result<Json<ModelAnswerRequest>, JsonRejection>,
) -> Result<Json<ValidatedAnswer>, ApiError> {
    let Json(req) = payload?;
    let answer = generate_model_answer(&state.generator, &state.registry, &req).await?;
    Ok(Json(answer))
}
