use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::GameError, extractors::AppJson, models::SubmitAnswerRequest, services::AppState,
};

pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    AppJson(req): AppJson<SubmitAnswerRequest>,
) -> Result<impl IntoResponse, GameError> {
    req.validate()?;
    let answer = req
        .into_new_answer()
        .ok_or_else(|| GameError::MalformedBody("Answer is incomplete".to_string()))?;

    // Unknown and blacklisted words are rejected before anything is written
    state.vocabulary().playable_word(&answer.word_id).await?;

    let event = state.ledger().record(answer).await?;
    Ok((StatusCode::CREATED, Json(event)))
}
