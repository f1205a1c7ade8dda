use serde::{Deserialize, Serialize};

/// A vocabulary unit the learner reads, spells or matches to a picture.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: String,

    /// Uppercase letters of the target alphabet, e.g. "КОТ"
    #[serde(rename = "word")]
    pub text: String,

    /// Picture category key, resolved to a glyph by the client
    #[serde(rename = "image")]
    pub image_tag: String,

    /// Pronunciation clip reference
    #[serde(rename = "audio")]
    pub audio_tag: String,
}

impl Word {
    pub fn letters(&self) -> Vec<char> {
        self.text.chars().collect()
    }
}

/// Seed entry for the vocabulary; ids are assigned on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordSeed {
    pub word: String,
    pub image: String,
    pub audio: String,
}

impl WordSeed {
    pub fn new(word: &str, image: &str, audio: &str) -> Self {
        Self {
            word: word.to_string(),
            image: image.to_string(),
            audio: audio.to_string(),
        }
    }
}

/// One alphabet letter with the slug of its pronunciation clip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LetterInfo {
    pub letter: char,
    pub sound: &'static str,
}
