use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use crate::metrics::record_answer;
use crate::models::{AnswerEvent, NewAnswer};
use crate::storage::{AnswerStore, StorageError};

/// Append-only record of learner answers.
#[derive(Clone)]
pub struct AnswerLedger {
    store: Arc<dyn AnswerStore>,
}

impl AnswerLedger {
    pub fn new(store: Arc<dyn AnswerStore>) -> Self {
        Self { store }
    }

    pub async fn record(&self, answer: NewAnswer) -> Result<AnswerEvent, StorageError> {
        self.record_at(answer, Utc::now()).await
    }

    pub async fn record_at(
        &self,
        answer: NewAnswer,
        answered_at: DateTime<Utc>,
    ) -> Result<AnswerEvent, StorageError> {
        let event = AnswerEvent {
            id: Uuid::new_v4().to_string(),
            word_id: answer.word_id,
            session_id: answer.session_id,
            is_correct: answer.is_correct,
            answered_at,
        };

        self.store.append(&event).await?;
        record_answer(event.is_correct);

        tracing::info!(
            "Answer recorded: session={}, word={}, correct={}",
            event.session_id,
            event.word_id,
            event.is_correct
        );
        Ok(event)
    }

    pub async fn correct_word_ids_since(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
    ) -> Result<HashSet<String>, StorageError> {
        self.store.correct_word_ids_since(session_id, since).await
    }

    pub async fn count_correct_since(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        self.store.count_correct_since(session_id, since).await
    }
}
