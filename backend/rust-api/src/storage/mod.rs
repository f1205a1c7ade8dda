//! Persistence seams for the vocabulary and the answer ledger.
//!
//! The game core only talks to these traits. `MongoStore` is the production
//! backend; `MemoryStore` serves tests and the `memory` storage backend.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::future::Future;
use std::time::Duration;

use crate::models::{AnswerEvent, Word, WordSeed};

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("store operation '{operation}' timed out after {after:?}")]
    Timeout {
        operation: &'static str,
        after: Duration,
    },

    #[error("store backend error: {0}")]
    Backend(String),

    #[error("malformed stored record: {0}")]
    Corrupt(String),
}

impl From<mongodb::error::Error> for StorageError {
    fn from(e: mongodb::error::Error) -> Self {
        StorageError::Backend(e.to_string())
    }
}

/// Read side of the vocabulary, plus the one-time seed.
#[async_trait]
pub trait WordStore: Send + Sync {
    /// All words in seed order.
    async fn all_words(&self) -> Result<Vec<Word>, StorageError>;

    async fn find_word(&self, id: &str) -> Result<Option<Word>, StorageError>;

    /// Inserts seeds whose text is not stored yet. Returns the number inserted.
    async fn seed_words(&self, seeds: &[WordSeed]) -> Result<usize, StorageError>;

    async fn ping(&self) -> Result<(), StorageError>;
}

/// Append-only answer ledger.
#[async_trait]
pub trait AnswerStore: Send + Sync {
    async fn append(&self, event: &AnswerEvent) -> Result<(), StorageError>;

    /// Distinct word ids answered correctly by the session at or after `since`.
    async fn correct_word_ids_since(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
    ) -> Result<HashSet<String>, StorageError>;

    async fn count_correct_since(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StorageError>;
}

/// Bounds a store call; an elapsed deadline fails the call with no partial effect.
pub async fn with_timeout<F, T>(
    operation: &'static str,
    after: Duration,
    future: F,
) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, StorageError>>,
{
    match tokio::time::timeout(after, future).await {
        Ok(result) => result,
        Err(_) => Err(StorageError::Timeout { operation, after }),
    }
}
