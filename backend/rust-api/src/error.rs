use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use validator::ValidationErrors;

use crate::services::puzzle_generator::GenerationError;
use crate::storage::StorageError;

/// Everything a request against the game core can fail with.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error("{0}")]
    NotFound(String),

    #[error("request validation failed")]
    Validation(#[from] ValidationErrors),

    #[error("{0}")]
    MalformedBody(String),

    #[error("{0}")]
    MalformedQuery(String),

    #[error("{0}")]
    NotEnoughData(String),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl GameError {
    pub fn word_not_found(word_id: &str) -> Self {
        GameError::NotFound(format!("Word {} not found", word_id))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            GameError::NotFound(_) => StatusCode::NOT_FOUND,
            GameError::Validation(_)
            | GameError::MalformedBody(_)
            | GameError::MalformedQuery(_) => StatusCode::BAD_REQUEST,
            GameError::NotEnoughData(_) | GameError::Generation(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            GameError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            GameError::NotFound(_) => "NOT_FOUND",
            GameError::Validation(_) => "VALIDATION_ERROR",
            GameError::MalformedBody(_) => "MALFORMED_BODY",
            GameError::MalformedQuery(_) => "MALFORMED_QUERY",
            GameError::NotEnoughData(_) => "NOT_ENOUGH_DATA",
            GameError::Generation(_) => "GENERATION_FAILED",
            GameError::Storage(_) => "STORAGE_UNAVAILABLE",
        }
    }
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = self.status();

        match &self {
            GameError::Storage(e) => tracing::error!("Storage failure: {}", e),
            GameError::Generation(e) => {
                tracing::error!("Puzzle generation invariant violated: {}", e)
            }
            _ => tracing::debug!("Request rejected: {}", self),
        }

        let mut body = json!({
            "status": status.as_u16(),
            "code": self.code(),
            "message": self.to_string(),
        });
        if let GameError::Validation(errors) = &self {
            body["errors"] = serde_json::to_value(errors).unwrap_or_default();
        }

        (status, Json(body)).into_response()
    }
}
