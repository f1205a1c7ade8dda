//! Pure puzzle derivation.
//!
//! Every generator takes the word and an explicit random source, so a seeded
//! `StdRng` reproduces the same payload for the same word and mode. Decoy letters
//! are drawn only from alphabet letters that do not occur in the word, which
//! keeps each puzzle to a single valid solution.

use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::HashSet;

use super::alphabet::parse_alphabet;
use crate::config::GameRules;
use crate::models::{ExtraLetterPayload, MissingLetterPayload, SpellLettersPayload, Word};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    #[error("word '{word}' is too short for this puzzle (needs at least {min_len} letters)")]
    WordTooShort { word: String, min_len: usize },

    #[error("word '{word}' leaves {available} decoy letters, {needed} needed")]
    NotEnoughDecoys {
        word: String,
        needed: usize,
        available: usize,
    },
}

#[derive(Debug, Clone)]
pub struct PuzzleGenerator {
    alphabet: Vec<char>,
    /// Alphabet letters that may never be offered as decoys
    banned_decoys: HashSet<char>,
    option_count: usize,
    bag_size: usize,
}

impl PuzzleGenerator {
    pub fn new(
        alphabet: Vec<char>,
        banned_decoys: impl IntoIterator<Item = char>,
        option_count: usize,
        bag_size: usize,
    ) -> Self {
        Self {
            alphabet,
            banned_decoys: banned_decoys.into_iter().collect(),
            option_count,
            bag_size,
        }
    }

    pub fn from_rules(rules: &GameRules) -> Self {
        Self::new(
            parse_alphabet(&rules.alphabet),
            parse_alphabet(&rules.blacklisted_letters),
            rules.missing_letter_options,
            rules.spell_bag_size,
        )
    }

    pub fn alphabet(&self) -> &[char] {
        &self.alphabet
    }

    /// Letters usable as decoys for a word, in alphabet order.
    pub fn decoy_pool(&self, letters: &[char]) -> Vec<char> {
        self.alphabet
            .iter()
            .copied()
            .filter(|c| !letters.contains(c) && !self.banned_decoys.contains(c))
            .collect()
    }

    /// True when every puzzle mode can be generated for the word.
    pub fn supports_all_modes(&self, word: &Word) -> bool {
        let letters = word.letters();
        let pool = self.decoy_pool(&letters).len();
        letters.len() >= 3
            && pool >= self.option_count.saturating_sub(1)
            && pool >= self.bag_size.saturating_sub(letters.len())
    }

    fn draw_decoys(
        &self,
        word: &Word,
        letters: &[char],
        count: usize,
        rng: &mut impl Rng,
    ) -> Result<Vec<char>, GenerationError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let mut pool = self.decoy_pool(letters);
        if pool.len() < count {
            return Err(GenerationError::NotEnoughDecoys {
                word: word.text.clone(),
                needed: count,
                available: pool.len(),
            });
        }

        pool.shuffle(rng);
        pool.truncate(count);
        Ok(pool)
    }

    /// Hides one interior letter and offers it among decoys.
    pub fn missing_letter(
        &self,
        word: &Word,
        rng: &mut impl Rng,
    ) -> Result<MissingLetterPayload, GenerationError> {
        let letters = word.letters();
        if letters.len() < 3 {
            return Err(GenerationError::WordTooShort {
                word: word.text.clone(),
                min_len: 3,
            });
        }

        let missing_letter_index = rng.random_range(1..=letters.len() - 2);
        let correct_letter = letters[missing_letter_index];

        let mut letter_options = self.draw_decoys(
            word,
            &letters,
            self.option_count.saturating_sub(1),
            rng,
        )?;
        letter_options.push(correct_letter);
        letter_options.shuffle(rng);

        Ok(MissingLetterPayload {
            letter_options,
            missing_letter_index,
            correct_letter,
        })
    }

    /// Splices one decoy letter into the word, never in front of it.
    pub fn extra_letter(
        &self,
        word: &Word,
        rng: &mut impl Rng,
    ) -> Result<ExtraLetterPayload, GenerationError> {
        let mut letters = word.letters();
        if letters.len() < 2 {
            return Err(GenerationError::WordTooShort {
                word: word.text.clone(),
                min_len: 2,
            });
        }

        let extra_letter_index = rng.random_range(1..=letters.len() - 1);
        let extra_letter = self.draw_decoys(word, &letters, 1, rng)?[0];
        letters.insert(extra_letter_index, extra_letter);

        Ok(ExtraLetterPayload {
            word_with_extra_letter: letters.into_iter().collect(),
            extra_letter_index,
            extra_letter,
        })
    }

    /// Every letter of the word plus decoys up to the bag size, shuffled.
    pub fn spell_letters(
        &self,
        word: &Word,
        rng: &mut impl Rng,
    ) -> Result<SpellLettersPayload, GenerationError> {
        let letters = word.letters();
        if letters.is_empty() {
            return Err(GenerationError::WordTooShort {
                word: word.text.clone(),
                min_len: 1,
            });
        }

        let need = self.bag_size.saturating_sub(letters.len());
        let decoys = self.draw_decoys(word, &letters, need, rng)?;

        let mut available_letters = letters;
        available_letters.extend(decoys);
        available_letters.shuffle(rng);

        Ok(SpellLettersPayload { available_letters })
    }
}

/// Uniform sample of up to `count` words other than `exclude_id`, without replacement.
pub fn pick_distractors(
    candidates: Vec<Word>,
    exclude_id: &str,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<Word> {
    let mut pool: Vec<Word> = candidates
        .into_iter()
        .filter(|w| w.id != exclude_id)
        .collect();
    pool.shuffle(rng);
    pool.truncate(count);
    pool
}
