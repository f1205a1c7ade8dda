use chrono::{DateTime, FixedOffset, Utc};

use super::answer_ledger::AnswerLedger;
use crate::models::DailyProgress;
use crate::storage::StorageError;
use crate::utils::time::start_of_day;

pub struct ProgressService {
    ledger: AnswerLedger,
    day_offset: FixedOffset,
    daily_goal: u32,
}

impl ProgressService {
    pub fn new(ledger: AnswerLedger, day_offset: FixedOffset, daily_goal: u32) -> Self {
        Self {
            ledger,
            day_offset,
            daily_goal,
        }
    }

    pub async fn daily_progress(&self, session_id: &str) -> Result<DailyProgress, StorageError> {
        self.daily_progress_at(session_id, Utc::now()).await
    }

    /// Correct answers since local midnight of the day containing `now`.
    pub async fn daily_progress_at(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<DailyProgress, StorageError> {
        let cutoff = start_of_day(now, self.day_offset);
        let count = self.ledger.count_correct_since(session_id, cutoff).await?;

        tracing::debug!(
            "Session {} has {} correct answers since {}",
            session_id,
            count,
            cutoff
        );
        Ok(DailyProgress::new(count, self.daily_goal))
    }
}
