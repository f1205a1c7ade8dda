use chrono::{DateTime, Utc};
use std::collections::HashSet;

use super::answer_ledger::AnswerLedger;
use super::vocabulary::VocabularyService;
use crate::metrics::AVAILABILITY_FALLBACKS_TOTAL;
use crate::models::Word;
use crate::storage::StorageError;
use crate::utils::time::months_before;

/// Drops mastered words. An exhausted vocabulary is served again in full.
pub fn exclude_mastered(words: Vec<Word>, mastered: &HashSet<String>) -> (Vec<Word>, bool) {
    if mastered.is_empty() {
        return (words, false);
    }

    let remaining: Vec<Word> = words
        .iter()
        .filter(|w| !mastered.contains(&w.id))
        .cloned()
        .collect();

    if remaining.is_empty() {
        (words, true)
    } else {
        (remaining, false)
    }
}

pub struct AvailabilityService {
    vocabulary: VocabularyService,
    ledger: AnswerLedger,
    window_months: u32,
}

impl AvailabilityService {
    pub fn new(vocabulary: VocabularyService, ledger: AnswerLedger, window_months: u32) -> Self {
        Self {
            vocabulary,
            ledger,
            window_months,
        }
    }

    pub async fn available_words(&self, session_id: &str) -> Result<Vec<Word>, StorageError> {
        self.available_words_at(session_id, Utc::now()).await
    }

    pub async fn available_words_at(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<Word>, StorageError> {
        let cutoff = months_before(now, self.window_months);
        let mastered = self.ledger.correct_word_ids_since(session_id, cutoff).await?;
        let words = self.vocabulary.playable_words().await?;

        let (available, fell_back) = exclude_mastered(words, &mastered);
        if fell_back {
            AVAILABILITY_FALLBACKS_TOTAL.inc();
            tracing::info!(
                "Session {} answered every word since {}, serving the full vocabulary",
                session_id,
                cutoff
            );
        } else {
            tracing::debug!(
                "Session {}: {} words available, {} mastered",
                session_id,
                available.len(),
                mastered.len()
            );
        }

        Ok(available)
    }
}
