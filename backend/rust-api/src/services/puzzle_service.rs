use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::{Arc, Mutex, PoisonError};

use super::puzzle_generator::{pick_distractors, GenerationError, PuzzleGenerator};
use super::vocabulary::VocabularyService;
use crate::error::GameError;
use crate::metrics::{record_puzzle, DISTRACTOR_SHORTFALLS_TOTAL};
use crate::models::{
    ExtraLetterPayload, GameType, MissingLetterPayload, MixPuzzle, SpellLettersPayload, Word,
};

/// Resolves words and runs the generator under the shared random source.
pub struct PuzzleService {
    vocabulary: VocabularyService,
    generator: Arc<PuzzleGenerator>,
    rng: Arc<Mutex<StdRng>>,
    default_distractors: usize,
    max_distractors: usize,
}

impl PuzzleService {
    pub fn new(
        vocabulary: VocabularyService,
        generator: Arc<PuzzleGenerator>,
        rng: Arc<Mutex<StdRng>>,
        default_distractors: usize,
        max_distractors: usize,
    ) -> Self {
        Self {
            vocabulary,
            generator,
            rng,
            default_distractors,
            max_distractors,
        }
    }

    // The lock is only ever taken in synchronous code, never across an await.
    fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut rng)
    }

    fn finish<T>(
        game_type: GameType,
        word: &Word,
        result: Result<T, GenerationError>,
    ) -> Result<T, GameError> {
        record_puzzle(game_type.as_str(), result.is_ok());
        match &result {
            Ok(_) => tracing::debug!("Generated {} puzzle for '{}'", game_type.as_str(), word.text),
            Err(e) => tracing::warn!("Failed to generate {} puzzle: {}", game_type.as_str(), e),
        }
        result.map_err(GameError::from)
    }

    pub async fn missing_letter(&self, word_id: &str) -> Result<MissingLetterPayload, GameError> {
        let word = self.vocabulary.playable_word(word_id).await?;
        let result = self.with_rng(|rng| self.generator.missing_letter(&word, rng));
        Self::finish(GameType::MissingLetter, &word, result)
    }

    pub async fn extra_letter(&self, word_id: &str) -> Result<ExtraLetterPayload, GameError> {
        let word = self.vocabulary.playable_word(word_id).await?;
        let result = self.with_rng(|rng| self.generator.extra_letter(&word, rng));
        Self::finish(GameType::ExtraLetter, &word, result)
    }

    pub async fn spell_letters(&self, word_id: &str) -> Result<SpellLettersPayload, GameError> {
        let word = self.vocabulary.playable_word(word_id).await?;
        let result = self.with_rng(|rng| self.generator.spell_letters(&word, rng));
        Self::finish(GameType::SpellWord, &word, result)
    }

    /// Absent or zero means the default; anything above the cap is clamped.
    pub fn effective_count(&self, requested: Option<usize>) -> usize {
        match requested {
            None | Some(0) => self.default_distractors,
            Some(n) => n.min(self.max_distractors),
        }
    }

    /// Wrong answers for the picture-match puzzle.
    pub async fn distractors(
        &self,
        word_id: &str,
        requested: Option<usize>,
    ) -> Result<Vec<Word>, GameError> {
        let target = self.vocabulary.playable_word(word_id).await?;
        let candidates = self.vocabulary.playable_words().await?;
        let count = self.effective_count(requested);

        let picked = self.with_rng(|rng| pick_distractors(candidates, &target.id, count, rng));
        self.check_distractors(&target, picked, count)
    }

    fn check_distractors(
        &self,
        target: &Word,
        picked: Vec<Word>,
        count: usize,
    ) -> Result<Vec<Word>, GameError> {
        if picked.is_empty() {
            record_puzzle(GameType::PictureMatch.as_str(), false);
            return Err(GameError::NotEnoughData(format!(
                "No distractors available for word {}",
                target.id
            )));
        }
        if picked.len() < count {
            DISTRACTOR_SHORTFALLS_TOTAL.inc();
            tracing::warn!(
                "Only {} of {} distractors available for '{}'",
                picked.len(),
                count,
                target.text
            );
        }
        record_puzzle(GameType::PictureMatch.as_str(), true);
        Ok(picked)
    }

    /// One puzzle of a randomly chosen type; types the word cannot support are skipped.
    pub async fn mix(&self, word_id: &str) -> Result<MixPuzzle, GameError> {
        let word = self.vocabulary.playable_word(word_id).await?;
        let candidates = self.vocabulary.playable_words().await?;
        let count = self.default_distractors;

        let mut first_error = None;
        let mut order = GameType::ALL.to_vec();
        self.with_rng(|rng| order.shuffle(rng));

        for game_type in order {
            let outcome = match game_type {
                GameType::PictureMatch => {
                    let picked = self.with_rng(|rng| {
                        pick_distractors(candidates.clone(), &word.id, count, rng)
                    });
                    self.check_distractors(&word, picked, count)
                        .map(|distractors| MixPuzzle::PictureMatch { distractors })
                }
                GameType::MissingLetter => {
                    let result = self.with_rng(|rng| self.generator.missing_letter(&word, rng));
                    Self::finish(game_type, &word, result).map(MixPuzzle::MissingLetter)
                }
                GameType::ExtraLetter => {
                    let result = self.with_rng(|rng| self.generator.extra_letter(&word, rng));
                    Self::finish(game_type, &word, result).map(MixPuzzle::ExtraLetter)
                }
                GameType::SpellWord => {
                    let result = self.with_rng(|rng| self.generator.spell_letters(&word, rng));
                    Self::finish(game_type, &word, result).map(MixPuzzle::SpellWord)
                }
            };

            match outcome {
                Ok(puzzle) => {
                    tracing::debug!(
                        "Mix served {} for '{}'",
                        puzzle.game_type().as_str(),
                        word.text
                    );
                    return Ok(puzzle);
                }
                Err(e) => {
                    first_error.get_or_insert(e);
                }
            }
        }

        Err(first_error.unwrap_or_else(|| {
            GameError::NotEnoughData(format!("No puzzle type fits word {}", word.id))
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameRules;
    use crate::models::WordSeed;
    use crate::services::blacklist::Blacklist;
    use crate::services::vocabulary::bootstrap;
    use crate::storage::{MemoryStore, WordStore};
    use rand::SeedableRng;

    async fn service_with(seeds: Option<Vec<WordSeed>>) -> (Arc<MemoryStore>, PuzzleService) {
        let generator = PuzzleGenerator::from_rules(&GameRules::default());
        service_for(generator, seeds, 7).await
    }

    async fn service_for(
        generator: PuzzleGenerator,
        seeds: Option<Vec<WordSeed>>,
        rng_seed: u64,
    ) -> (Arc<MemoryStore>, PuzzleService) {
        let rules = GameRules::default();
        let generator = Arc::new(generator);
        let store = Arc::new(MemoryStore::new());
        match seeds {
            Some(seeds) => {
                store.seed_words(&seeds).await.unwrap();
            }
            None => {
                bootstrap(store.as_ref(), None, &generator).await.unwrap();
            }
        }

        let vocabulary =
            VocabularyService::new(store.clone(), Arc::new(Blacklist::from_rules(&rules)));
        let service = PuzzleService::new(
            vocabulary,
            generator,
            Arc::new(Mutex::new(StdRng::seed_from_u64(rng_seed))),
            rules.default_distractor_count,
            rules.max_distractor_count,
        );
        (store, service)
    }

    async fn id_of(store: &MemoryStore, text: &str) -> String {
        store
            .all_words()
            .await
            .unwrap()
            .into_iter()
            .find(|w| w.text == text)
            .map(|w| w.id)
            .unwrap()
    }

    #[tokio::test]
    async fn effective_count_defaults_and_caps() {
        let (_store, service) = service_with(None).await;
        assert_eq!(service.effective_count(None), 3);
        assert_eq!(service.effective_count(Some(0)), 3);
        assert_eq!(service.effective_count(Some(5)), 5);
        assert_eq!(service.effective_count(Some(500)), 8);
    }

    #[tokio::test]
    async fn distractors_exclude_target_and_blacklist() {
        let (store, service) = service_with(None).await;
        let cat = id_of(&store, "КОТ").await;

        for _ in 0..20 {
            let picked = service.distractors(&cat, Some(8)).await.unwrap();
            assert_eq!(picked.len(), 8);
            assert!(picked.iter().all(|w| w.id != cat));
            assert!(picked.iter().all(|w| w.text != "ЦВЕТОК"));

            let mut ids: Vec<&str> = picked.iter().map(|w| w.id.as_str()).collect();
            ids.sort();
            ids.dedup();
            assert_eq!(ids.len(), 8);
        }
    }

    #[tokio::test]
    async fn distractor_shortfall_is_degraded_not_an_error() {
        let seeds = vec![
            WordSeed::new("КОТ", "cat", "kot.mp3"),
            WordSeed::new("ДОМ", "house", "dom.mp3"),
        ];
        let (store, service) = service_with(Some(seeds)).await;
        let cat = id_of(&store, "КОТ").await;

        let picked = service.distractors(&cat, None).await.unwrap();
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].text, "ДОМ");
    }

    #[tokio::test]
    async fn lone_word_has_no_distractors() {
        let seeds = vec![WordSeed::new("КОТ", "cat", "kot.mp3")];
        let (store, service) = service_with(Some(seeds)).await;
        let cat = id_of(&store, "КОТ").await;

        assert!(matches!(
            service.distractors(&cat, None).await,
            Err(GameError::NotEnoughData(_))
        ));
    }

    #[tokio::test]
    async fn unknown_and_blacklisted_words_are_not_found() {
        let (store, service) = service_with(None).await;
        let flower = id_of(&store, "ЦВЕТОК").await;

        assert!(matches!(
            service.missing_letter("no-such-word").await,
            Err(GameError::NotFound(_))
        ));
        assert!(matches!(
            service.spell_letters(&flower).await,
            Err(GameError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn short_word_fails_generation() {
        let seeds = vec![WordSeed::new("ЁЖ", "hedgehog", "yozh.mp3")];
        let (store, service) = service_with(Some(seeds)).await;
        let id = id_of(&store, "ЁЖ").await;

        // Blacklisted letter Ё hides the word entirely
        assert!(matches!(
            service.missing_letter(&id).await,
            Err(GameError::NotFound(_))
        ));

        let seeds = vec![WordSeed::new("УЖ", "snake", "uzh.mp3")];
        let (store, service) = service_with(Some(seeds)).await;
        let id = id_of(&store, "УЖ").await;
        assert!(matches!(
            service.missing_letter(&id).await,
            Err(GameError::Generation(GenerationError::WordTooShort { .. }))
        ));
        assert!(service.extra_letter(&id).await.is_ok());
    }

    #[tokio::test]
    async fn mix_produces_a_valid_puzzle() {
        let (store, service) = service_with(None).await;
        let dog = id_of(&store, "СОБАКА").await;

        for _ in 0..20 {
            match service.mix(&dog).await.unwrap() {
                MixPuzzle::PictureMatch { distractors } => {
                    assert_eq!(distractors.len(), 3);
                    assert!(distractors.iter().all(|w| w.id != dog));
                }
                MixPuzzle::MissingLetter(p) => {
                    assert!(p.missing_letter_index >= 1 && p.missing_letter_index <= 4);
                }
                MixPuzzle::ExtraLetter(p) => {
                    assert_eq!(p.word_with_extra_letter.chars().count(), 7);
                }
                MixPuzzle::SpellWord(p) => {
                    assert_eq!(p.available_letters.len(), 10);
                }
            }
        }
    }

    #[tokio::test]
    async fn mix_skips_modes_the_word_cannot_support() {
        let seeds = vec![WordSeed::new("УЖ", "snake", "uzh.mp3")];
        let (store, service) = service_with(Some(seeds)).await;
        let id = id_of(&store, "УЖ").await;

        for _ in 0..20 {
            let puzzle = service.mix(&id).await.unwrap();
            assert!(matches!(
                puzzle,
                MixPuzzle::ExtraLetter(_) | MixPuzzle::SpellWord(_)
            ));
        }
    }

    #[tokio::test]
    async fn mix_reports_the_first_failure_in_play_order() {
        // Two-letter alphabet: no mode can be built for a lone one-letter word
        let generator = PuzzleGenerator::new(vec!['Я', 'А'], [], 4, 10);

        for seed in 0..16 {
            let seeds = vec![WordSeed::new("Я", "me", "ya.mp3")];
            let (store, service) = service_for(generator.clone(), Some(seeds), seed).await;
            let id = id_of(&store, "Я").await;

            let mut order = GameType::ALL.to_vec();
            order.shuffle(&mut StdRng::seed_from_u64(seed));

            let err = service.mix(&id).await.expect_err("no mode fits");
            match order[0] {
                GameType::PictureMatch => assert!(matches!(err, GameError::NotEnoughData(_))),
                GameType::MissingLetter => assert!(matches!(
                    err,
                    GameError::Generation(GenerationError::WordTooShort { min_len: 3, .. })
                )),
                GameType::ExtraLetter => assert!(matches!(
                    err,
                    GameError::Generation(GenerationError::WordTooShort { min_len: 2, .. })
                )),
                GameType::SpellWord => assert!(matches!(
                    err,
                    GameError::Generation(GenerationError::NotEnoughDecoys { .. })
                )),
            }
        }
    }
}
