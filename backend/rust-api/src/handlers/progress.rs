use axum::{extract::State, response::IntoResponse, Json};
use std::sync::Arc;
use validator::Validate;

use crate::{
    error::GameError, extractors::AppQuery, models::SessionQuery, services::AppState,
};

pub async fn get_today(
    State(state): State<Arc<AppState>>,
    AppQuery(query): AppQuery<SessionQuery>,
) -> Result<impl IntoResponse, GameError> {
    query.validate()?;
    let session_id = query.session_id.unwrap_or_default();

    let progress = state.progress().daily_progress(&session_id).await?;
    Ok(Json(progress))
}
