use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Bson, DateTime as BsonDateTime},
    options::IndexOptions,
    Client, Collection, Database, IndexModel,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;
use uuid::Uuid;

use super::{with_timeout, AnswerStore, StorageError, WordStore};
use crate::metrics::track_db_operation;
use crate::models::{AnswerEvent, Word, WordSeed};
use crate::utils::time::chrono_to_bson;

const WORDS_COLLECTION: &str = "words";
const ANSWERS_COLLECTION: &str = "user_answers";

/// Word as stored in the "words" collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct WordDocument {
    #[serde(rename = "_id")]
    id: String,
    word: String,
    image: String,
    audio: String,
    /// Seed order, used for stable listing
    position: i32,
}

impl From<WordDocument> for Word {
    fn from(doc: WordDocument) -> Self {
        Word {
            id: doc.id,
            text: doc.word,
            image_tag: doc.image,
            audio_tag: doc.audio,
        }
    }
}

/// Answer row in the "user_answers" collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AnswerDocument {
    #[serde(rename = "_id")]
    id: String,
    word_id: String,
    session_id: String,
    is_correct: bool,
    answered_at: BsonDateTime,
}

impl From<&AnswerEvent> for AnswerDocument {
    fn from(event: &AnswerEvent) -> Self {
        AnswerDocument {
            id: event.id.clone(),
            word_id: event.word_id.clone(),
            session_id: event.session_id.clone(),
            is_correct: event.is_correct,
            answered_at: chrono_to_bson(event.answered_at),
        }
    }
}

pub struct MongoStore {
    db: Database,
    timeout: Duration,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::with_uri_str(uri).await?;
        let store = Self {
            db: client.database(database),
            timeout,
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), StorageError> {
        let words_index = IndexModel::builder()
            .keys(doc! { "word": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.words().create_index(words_index).await?;

        let answers_index = IndexModel::builder()
            .keys(doc! { "session_id": 1, "is_correct": 1, "answered_at": 1 })
            .build();
        self.answers().create_index(answers_index).await?;

        tracing::info!("MongoDB indexes ensured");
        Ok(())
    }

    fn words(&self) -> Collection<WordDocument> {
        self.db.collection(WORDS_COLLECTION)
    }

    fn answers(&self) -> Collection<AnswerDocument> {
        self.db.collection(ANSWERS_COLLECTION)
    }
}

#[async_trait]
impl WordStore for MongoStore {
    async fn all_words(&self) -> Result<Vec<Word>, StorageError> {
        let query = async {
            let cursor = self
                .words()
                .find(doc! {})
                .sort(doc! { "position": 1 })
                .await?;
            let docs: Vec<WordDocument> = cursor.try_collect().await?;
            Ok::<_, StorageError>(docs.into_iter().map(Word::from).collect())
        };
        track_db_operation(
            "find",
            WORDS_COLLECTION,
            with_timeout("find_words", self.timeout, query),
        )
        .await
    }

    async fn find_word(&self, id: &str) -> Result<Option<Word>, StorageError> {
        let query = async {
            let doc = self.words().find_one(doc! { "_id": id }).await?;
            Ok::<_, StorageError>(doc.map(Word::from))
        };
        track_db_operation(
            "find_one",
            WORDS_COLLECTION,
            with_timeout("find_word", self.timeout, query),
        )
        .await
    }

    async fn seed_words(&self, seeds: &[WordSeed]) -> Result<usize, StorageError> {
        let mut inserted = 0;

        for (position, seed) in seeds.iter().enumerate() {
            let upsert = async {
                let result = self
                    .words()
                    .update_one(
                        doc! { "word": seed.word.as_str() },
                        doc! { "$setOnInsert": {
                            "_id": Uuid::new_v4().to_string(),
                            "image": seed.image.as_str(),
                            "audio": seed.audio.as_str(),
                            "position": (position as i32),
                        } },
                    )
                    .upsert(true)
                    .await?;
                Ok::<_, StorageError>(result.upserted_id.is_some())
            };

            if with_timeout("seed_word", self.timeout, upsert).await? {
                inserted += 1;
            }
        }

        Ok(inserted)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        let ping = async {
            self.db.run_command(doc! { "ping": 1 }).await?;
            Ok::<_, StorageError>(())
        };
        with_timeout("ping", self.timeout, ping).await
    }
}

#[async_trait]
impl AnswerStore for MongoStore {
    async fn append(&self, event: &AnswerEvent) -> Result<(), StorageError> {
        let document = AnswerDocument::from(event);
        let insert = async {
            self.answers().insert_one(&document).await?;
            Ok::<_, StorageError>(())
        };
        track_db_operation(
            "insert_one",
            ANSWERS_COLLECTION,
            with_timeout("append_answer", self.timeout, insert),
        )
        .await
    }

    async fn correct_word_ids_since(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
    ) -> Result<HashSet<String>, StorageError> {
        let filter = doc! {
            "session_id": session_id,
            "is_correct": true,
            "answered_at": { "$gte": chrono_to_bson(since) },
        };
        let query = async {
            let values = self.answers().distinct("word_id", filter).await?;
            values
                .into_iter()
                .map(|value| match value {
                    Bson::String(id) => Ok(id),
                    other => Err(StorageError::Corrupt(format!(
                        "word_id is not a string: {}",
                        other
                    ))),
                })
                .collect::<Result<HashSet<String>, StorageError>>()
        };
        track_db_operation(
            "distinct",
            ANSWERS_COLLECTION,
            with_timeout("correct_word_ids", self.timeout, query),
        )
        .await
    }

    async fn count_correct_since(
        &self,
        session_id: &str,
        since: DateTime<Utc>,
    ) -> Result<u64, StorageError> {
        let filter = doc! {
            "session_id": session_id,
            "is_correct": true,
            "answered_at": { "$gte": chrono_to_bson(since) },
        };
        let query = async {
            let count = self.answers().count_documents(filter).await?;
            Ok::<_, StorageError>(count)
        };
        track_db_operation(
            "count_documents",
            ANSWERS_COLLECTION,
            with_timeout("count_correct", self.timeout, query),
        )
        .await
    }
}
