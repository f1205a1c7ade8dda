use anyhow::{Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use tokio::fs;

use super::blacklist::Blacklist;
use super::puzzle_generator::PuzzleGenerator;
use crate::error::GameError;
use crate::models::{Word, WordSeed};
use crate::storage::{StorageError, WordStore};

lazy_static! {
    static ref IMAGE_TAG: Regex = Regex::new(r"^[a-z][a-z0-9_-]*$").unwrap();
}

/// Curated starter vocabulary used when no seed file is configured.
pub fn default_seeds() -> Vec<WordSeed> {
    vec![
        WordSeed::new("СЛОН", "elephant", "slon.mp3"),
        WordSeed::new("КОТ", "cat", "kot.mp3"),
        WordSeed::new("ДОМ", "house", "dom.mp3"),
        WordSeed::new("МЯЧ", "ball", "myach.mp3"),
        WordSeed::new("ЛИСА", "fox", "lisa.mp3"),
        WordSeed::new("СТОЛ", "table", "stol.mp3"),
        WordSeed::new("РЫБА", "fish", "ryba.mp3"),
        WordSeed::new("СОБАКА", "dog", "sobaka.mp3"),
        WordSeed::new("ЦВЕТОК", "flower", "tsvetok.mp3"),
        WordSeed::new("МАШИНА", "car", "mashina.mp3"),
        WordSeed::new("ВОЛК", "wolf", "volk.mp3"),
        WordSeed::new("ЛУНА", "moon", "luna.mp3"),
        WordSeed::new("КНИГА", "book", "kniga.mp3"),
        WordSeed::new("ХЛЕБ", "bread", "hleb.mp3"),
        WordSeed::new("МОЛОКО", "milk", "moloko.mp3"),
        WordSeed::new("АВТОБУС", "bus", "avtobus.mp3"),
    ]
}

/// Checks one seed entry against the alphabet. Returns the normalised seed.
pub fn normalize_seed(seed: &WordSeed, alphabet: &[char]) -> Result<WordSeed, String> {
    let word = seed.word.trim().to_uppercase();
    if word.is_empty() {
        return Err("word is empty".to_string());
    }
    if let Some(bad) = word.chars().find(|c| !alphabet.contains(c)) {
        return Err(format!("'{}' contains '{}' outside the alphabet", word, bad));
    }
    if !IMAGE_TAG.is_match(&seed.image) {
        return Err(format!("'{}' has invalid image tag '{}'", word, seed.image));
    }
    if seed.audio.trim().is_empty() {
        return Err(format!("'{}' has no audio reference", word));
    }

    Ok(WordSeed {
        word,
        image: seed.image.clone(),
        audio: seed.audio.trim().to_string(),
    })
}

async fn load_seeds(seed_file: Option<&str>) -> Result<Vec<WordSeed>> {
    let path = match seed_file {
        Some(path) => Path::new(path),
        None => {
            tracing::debug!("No vocabulary seed file configured, using built-in list");
            return Ok(default_seeds());
        }
    };

    if !path.exists() {
        tracing::warn!(
            "Vocabulary seed file {} not found, using built-in list",
            path.display()
        );
        return Ok(default_seeds());
    }

    let contents = fs::read_to_string(path)
        .await
        .context("Failed to read vocabulary seed file")?;
    serde_json::from_str(&contents).context("Failed to deserialize vocabulary seed file")
}

/// Seeds the vocabulary once. Entries already stored are left untouched.
pub async fn bootstrap(
    store: &dyn WordStore,
    seed_file: Option<&str>,
    generator: &PuzzleGenerator,
) -> Result<usize> {
    let seeds = load_seeds(seed_file).await?;

    let mut valid = Vec::with_capacity(seeds.len());
    for seed in &seeds {
        match normalize_seed(seed, generator.alphabet()) {
            Ok(seed) => valid.push(seed),
            Err(reason) => tracing::warn!("Skipping vocabulary entry: {}", reason),
        }
    }

    for seed in &valid {
        let candidate = Word {
            id: String::new(),
            text: seed.word.clone(),
            image_tag: seed.image.clone(),
            audio_tag: seed.audio.clone(),
        };
        if !generator.supports_all_modes(&candidate) {
            tracing::error!(
                "Vocabulary entry '{}' cannot be played in every mode with the current rules",
                seed.word
            );
        }
    }

    let inserted = store
        .seed_words(&valid)
        .await
        .context("Failed to seed vocabulary")?;
    tracing::info!(
        "Vocabulary seeded: {} new of {} entries",
        inserted,
        valid.len()
    );

    Ok(inserted)
}

/// Read access to the words a learner may see.
#[derive(Clone)]
pub struct VocabularyService {
    words: Arc<dyn WordStore>,
    blacklist: Arc<Blacklist>,
}

impl VocabularyService {
    pub fn new(words: Arc<dyn WordStore>, blacklist: Arc<Blacklist>) -> Self {
        Self { words, blacklist }
    }

    /// Every word that passes the blacklist, in seed order.
    pub async fn playable_words(&self) -> Result<Vec<Word>, StorageError> {
        let words = self.words.all_words().await?;
        Ok(self.blacklist.filter(words))
    }

    /// A single playable word. Blacklisted words are reported as missing.
    pub async fn playable_word(&self, id: &str) -> Result<Word, GameError> {
        match self.words.find_word(id).await? {
            Some(word) if self.blacklist.allows(&word) => Ok(word),
            Some(_) => {
                tracing::debug!("Word {} is blacklisted", id);
                Err(GameError::word_not_found(id))
            }
            None => Err(GameError::word_not_found(id)),
        }
    }
}
