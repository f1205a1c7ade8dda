use axum::{
    extract::{Path, State},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::GameError,
    extractors::AppQuery,
    models::{DistractorQuery, WordsQuery},
    services::{alphabet::letter_table, AppState},
};

pub async fn list_words(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<WordsQuery>,
) -> Result<impl IntoResponse, GameError> {
    query.validate()?;

    let words = match query.session_id.as_deref() {
        Some(session_id) => state.availability().available_words(session_id).await?,
        None => state.vocabulary().playable_words().await?,
    };

    Ok(Json(words))
}

pub async fn get_word(
    State(state): State<Arc<AppState>>,
    Path(word_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let word = state.vocabulary().playable_word(&word_id).await?;
    Ok(Json(word))
}

pub async fn get_distractors(
    State(state): State<Arc<AppState>>,
    Path(word_id): Path<String>,
    AppQuery(query): AppQuery<DistractorQuery>,
) -> Result<impl IntoResponse, GameError> {
    let words = state
        .puzzles()
        .distractors(&word_id, query.requested_count())
        .await?;
    Ok(Json(words))
}

pub async fn get_letter_options(
    State(state): State<Arc<AppState>>,
    Path(word_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let payload = state.puzzles().missing_letter(&word_id).await?;
    Ok(Json(payload))
}

pub async fn get_extra_letter(
    State(state): State<Arc<AppState>>,
    Path(word_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let payload = state.puzzles().extra_letter(&word_id).await?;
    Ok(Json(payload))
}

pub async fn get_spell_letters(
    State(state): State<Arc<AppState>>,
    Path(word_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let payload = state.puzzles().spell_letters(&word_id).await?;
    Ok(Json(payload))
}

pub async fn get_mix(
    State(state): State<Arc<AppState>>,
    Path(word_id): Path<String>,
) -> Result<impl IntoResponse, GameError> {
    let puzzle = state.puzzles().mix(&word_id).await?;
    Ok(Json(puzzle))
}

/// Alphabet with transliterated sounds, for the letter-learning screen.
pub async fn list_letters(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(letter_table(state.generator.alphabet()))
}
