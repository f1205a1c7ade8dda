pub mod answer;
pub mod progress;
pub mod puzzle;
pub mod query;
pub mod word;

pub use answer::{AnswerEvent, NewAnswer, SubmitAnswerRequest};
pub use progress::DailyProgress;
pub use puzzle::{
    ExtraLetterPayload, GameType, MissingLetterPayload, MixPuzzle, SpellLettersPayload,
};
pub use query::{DistractorQuery, SessionQuery, WordsQuery};
pub use word::{LetterInfo, Word, WordSeed};
