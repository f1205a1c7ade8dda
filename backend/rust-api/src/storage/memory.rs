use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{AnswerStore, StorageError, WordStore};
use crate::models::{AnswerEvent, Word, WordSeed};

/// Process-local store. Contents are lost on restart.
#[derive(Debug, Default)]
pub struct MemoryStore {
    words: RwLock<Vec<Word>>,
    answers: RwLock<Vec<AnswerEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of ledger rows, for assertions in tests.
    pub async fn answer_count(&self) -> usize {
        self.answers.read().await.len()
    }
}

#[async_trait]
impl WordStore for MemoryStore {
    async fn all_words(&self) -> Result<Vec<Word>, StorageError> {
        Ok(self.words.read().await.clone())
    }

    async fn find_word(&self, id: &str) -> Result<Option<Word>, StorageError> {
        Ok(self.words.read().await.iter().find(|w| w.id == id).cloned())
    }

    async fn seed_words(&self, seeds: &[WordSeed]) -> Result<usize, StorageError> {
        let mut words = self.words.write().await;
        let mut inserted = 0;

        for seed in seeds {
            if words.iter().any(|w| w.text == seed.word) {
                continue;
            }
            words.push(Word {
                id: Uuid::new_v4().to_string(),
                text: seed.word.clone(),
                image_tag: seed.image.clone(),
                audio_tag: seed.audio.clone(),
            });
            inserted += 1;
        }

        Ok(inserted)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

#[async_trait]
impl AnswerStore for MemoryStore {
    async fn append(&self, event: &AnswerEvent) -> Result<(), StorageError> {
        self.answers.write().await.push(event.clone());
        Ok(())
    }

    async fn correct_word_ids_since(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
    ) -> Result<HashSet<String>, StorageError> {
        Ok(self
            .answers
            .read()
            .await
            .iter()
            .filter(|a| a.session_id == session_id && a.is_correct && a.answered_at >= since)
            .map(|a| a.word_id.clone())
            .collect())
    }

    async fn count_correct_since(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        Ok(self
            .answers
            .read()
            .await
            .iter()
            .filter(|a| a.session_id == session_id && a.is_correct && a.answered_at >= since)
            .count() as u64)
    }
}
