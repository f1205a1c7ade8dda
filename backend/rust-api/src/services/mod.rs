use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex};

use crate::config::{Config, StorageBackend};
use crate::storage::{AnswerStore, MemoryStore, MongoStore, WordStore};

pub mod alphabet;
pub mod answer_ledger;
pub mod availability_service;
pub mod blacklist;
pub mod progress_service;
pub mod puzzle_generator;
pub mod puzzle_service;
pub mod vocabulary;

use answer_ledger::AnswerLedger;
use availability_service::AvailabilityService;
use blacklist::Blacklist;
use progress_service::ProgressService;
use puzzle_generator::PuzzleGenerator;
use puzzle_service::PuzzleService;
use vocabulary::VocabularyService;

pub struct AppState {
    pub config: Config,
    pub words: Arc<dyn WordStore>,
    pub answers: Arc<dyn AnswerStore>,
    pub blacklist: Arc<Blacklist>,
    pub generator: Arc<PuzzleGenerator>,
    pub rng: Arc<Mutex<StdRng>>,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        match config.storage_backend {
            StorageBackend::Mongo => {
                tracing::info!("Connecting to MongoDB database {}", config.mongo_database);
                let store = Arc::new(
                    MongoStore::connect(
                        &config.mongo_uri,
                        &config.mongo_database,
                        config.store_timeout,
                    )
                    .await?,
                );
                tracing::info!("MongoDB connection established");
                Ok(Self::with_stores(config, store.clone(), store))
            }
            StorageBackend::Memory => {
                tracing::warn!("Using in-memory storage, answers are lost on restart");
                let store = Arc::new(MemoryStore::new());
                Ok(Self::with_stores(config, store.clone(), store))
            }
        }
    }

    pub fn with_stores(
        config: Config,
        words: Arc<dyn WordStore>,
        answers: Arc<dyn AnswerStore>,
    ) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => {
                tracing::info!("Puzzle randomness seeded with {}", seed);
                StdRng::seed_from_u64(seed)
            }
            None => StdRng::from_os_rng(),
        };

        tracing::info!("Game rules version {} loaded", config.rules.version);

        Self {
            blacklist: Arc::new(Blacklist::from_rules(&config.rules)),
            generator: Arc::new(PuzzleGenerator::from_rules(&config.rules)),
            rng: Arc::new(Mutex::new(rng)),
            config,
            words,
            answers,
        }
    }

    pub fn vocabulary(&self) -> VocabularyService {
        VocabularyService::new(self.words.clone(), self.blacklist.clone())
    }

    pub fn ledger(&self) -> AnswerLedger {
        AnswerLedger::new(self.answers.clone())
    }

    pub fn availability(&self) -> AvailabilityService {
        AvailabilityService::new(
            self.vocabulary(),
            self.ledger(),
            self.config.rules.exclusion_window_months,
        )
    }

    pub fn progress(&self) -> ProgressService {
        ProgressService::new(
            self.ledger(),
            self.config.rules.day_offset(),
            self.config.rules.daily_goal,
        )
    }

    pub fn puzzles(&self) -> PuzzleService {
        PuzzleService::new(
            self.vocabulary(),
            self.generator.clone(),
            self.rng.clone(),
            self.config.rules.default_distractor_count,
            self.config.rules.max_distractor_count,
        )
    }
}
