use std::collections::HashSet;

use crate::config::GameRules;
use crate::models::Word;

/// Words and letters too advanced for beginners. Built once from the rules table.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    words: HashSet<String>,
    letters: HashSet<char>,
}

impl Blacklist {
    pub fn new<W, L>(words: W, letters: L) -> Self
    where
        W: IntoIterator,
        W::Item: AsRef<str>,
        L: IntoIterator<Item = char>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_uppercase())
                .filter(|w| !w.is_empty())
                .collect(),
            letters: letters.into_iter().flat_map(char::to_uppercase).collect(),
        }
    }

    pub fn from_rules(rules: &GameRules) -> Self {
        Self::new(&rules.blacklisted_words, rules.blacklisted_letters.chars())
    }

    pub fn allows(&self, word: &Word) -> bool {
        !self.words.contains(&word.text) && !word.text.chars().any(|c| self.letters.contains(&c))
    }

    pub fn filter(&self, words: Vec<Word>) -> Vec<Word> {
        words.into_iter().filter(|w| self.allows(w)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str) -> Word {
        Word {
            id: format!("id-{}", text),
            text: text.to_string(),
            image_tag: "img".to_string(),
            audio_tag: "audio".to_string(),
        }
    }

    #[test]
    fn filters_exact_words_and_letters() {
        let blacklist = Blacklist::new(["цветок"], "ьЙ".chars());
        let words = vec![word("КОТ"), word("ЦВЕТОК"), word("КОНЬ"), word("ЧАЙ"), word("ДОМ")];

        let kept: Vec<String> = blacklist
            .filter(words)
            .into_iter()
            .map(|w| w.text)
            .collect();
        assert_eq!(kept, vec!["КОТ", "ДОМ"]);
    }

    #[test]
    fn exact_match_does_not_catch_longer_words() {
        let blacklist = Blacklist::new(["КОТ"], std::iter::empty());
        assert!(!blacklist.allows(&word("КОТ")));
        assert!(blacklist.allows(&word("КОТИК")));
    }

    #[test]
    fn empty_blacklist_keeps_everything() {
        let blacklist = Blacklist::default();
        assert_eq!(blacklist.filter(vec![word("ЁЖ"), word("ЩИ")]).len(), 2);
    }

    #[test]
    fn default_rules_hide_configured_entries() {
        let blacklist = Blacklist::from_rules(&GameRules::default());
        assert!(!blacklist.allows(&word("ЦВЕТОК")));
        assert!(!blacklist.allows(&word("ЁЖИК")));
        assert!(blacklist.allows(&word("СОБАКА")));
        assert!(!blacklist.allows(&word("ПОДЪЕЗД")));
    }
}
