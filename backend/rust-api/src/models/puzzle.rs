use serde::Serialize;

use super::word::Word;

/// Game modes a single word can be played in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GameType {
    PictureMatch,
    MissingLetter,
    ExtraLetter,
    SpellWord,
}

impl GameType {
    pub const ALL: [GameType; 4] = [
        GameType::PictureMatch,
        GameType::MissingLetter,
        GameType::ExtraLetter,
        GameType::SpellWord,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            GameType::PictureMatch => "picture-match",
            GameType::MissingLetter => "missing-letter",
            GameType::ExtraLetter => "extra-letter",
            GameType::SpellWord => "spell-word",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingLetterPayload {
    pub letter_options: Vec<char>,
    pub missing_letter_index: usize,
    pub correct_letter: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtraLetterPayload {
    pub word_with_extra_letter: String,
    pub extra_letter_index: usize,
    pub extra_letter: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpellLettersPayload {
    pub available_letters: Vec<char>,
}

/// A randomly chosen mode together with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "gameType", rename_all = "kebab-case")]
pub enum MixPuzzle {
    PictureMatch { distractors: Vec<Word> },
    MissingLetter(MissingLetterPayload),
    ExtraLetter(ExtraLetterPayload),
    SpellWord(SpellLettersPayload),
}

impl MixPuzzle {
    pub fn game_type(&self) -> GameType {
        match self {
            MixPuzzle::PictureMatch { .. } => GameType::PictureMatch,
            MixPuzzle::MissingLetter(_) => GameType::MissingLetter,
            MixPuzzle::ExtraLetter(_) => GameType::ExtraLetter,
            MixPuzzle::SpellWord(_) => GameType::SpellWord,
        }
    }
}
