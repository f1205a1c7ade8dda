use crate::models::LetterInfo;

/// Pronunciation clip slugs for the Russian alphabet.
const LETTER_SOUNDS: [(char, &str); 33] = [
    ('А', "a"),
    ('Б', "b"),
    ('В', "v"),
    ('Г', "g"),
    ('Д', "d"),
    ('Е', "e"),
    ('Ё', "yo"),
    ('Ж', "zh"),
    ('З', "z"),
    ('И', "i"),
    ('Й', "y"),
    ('К', "k"),
    ('Л', "l"),
    ('М', "m"),
    ('Н', "n"),
    ('О', "o"),
    ('П', "p"),
    ('Р', "r"),
    ('С', "s"),
    ('Т', "t"),
    ('У', "u"),
    ('Ф', "f"),
    ('Х', "h"),
    ('Ц', "ts"),
    ('Ч', "ch"),
    ('Ш', "sh"),
    ('Щ', "sch"),
    ('Ъ', "hard"),
    ('Ы', "y"),
    ('Ь', "soft"),
    ('Э', "e"),
    ('Ю', "yu"),
    ('Я', "ya"),
];

pub fn letter_sound(letter: char) -> Option<&'static str> {
    LETTER_SOUNDS
        .iter()
        .find(|(l, _)| *l == letter)
        .map(|(_, sound)| *sound)
}

/// Uppercased, de-duplicated letters in configuration order.
pub fn parse_alphabet(alphabet: &str) -> Vec<char> {
    let mut letters = Vec::new();
    for letter in alphabet.chars().flat_map(char::to_uppercase) {
        if letter.is_alphabetic() && !letters.contains(&letter) {
            letters.push(letter);
        }
    }
    letters
}

/// Letter table served to the client. Letters without a known clip are skipped.
pub fn letter_table(alphabet: &[char]) -> Vec<LetterInfo> {
    alphabet
        .iter()
        .filter_map(|&letter| {
            letter_sound(letter).map(|sound| LetterInfo { letter, sound })
        })
        .collect()
}
