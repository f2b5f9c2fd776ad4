use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use unicode_normalization::UnicodeNormalization;

/// Minimum share of a word's characters that must belong to the target alphabet.
pub const MIN_SCRIPT_PURITY: f32 = 0.6;
/// Minimum word length in characters.
pub const MIN_TERM_LEN: usize = 2;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[^\w\s]").expect("valid regex");
    static ref CYRILLIC: Regex = Regex::new(r"\p{Cyrillic}").expect("valid regex");
    static ref LATIN: Regex = Regex::new(r"\p{Latin}").expect("valid regex");
    static ref RUSSIAN_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "и","в","на","с","по","для","не","что","это","как","так",
            "из","у","к","о","за","от","то","же","все","но","вы","бы",
            "а","мне","вот","до","ну","ли","если","уже","или","ни","быть","был",
            "про","при","год","очень","может","есть",
        ];
        words.iter().copied().collect()
    };
    static ref ENGLISH_STOPWORDS: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","cannot","could",
            "did","do","does","doing","down","during",
            "each","few","for","from","further",
            "had","has","have","having","he","her","here","hers","herself","him","himself","his","how",
            "i","if","in","into","is","it","its","itself",
            "me","more","most","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","should","so","some","such",
            "than","that","the","their","theirs","them","themselves","then","there","these","they","this","those","through","to","too",
            "under","until","up","very",
            "was","we","were","what","when","where","which","while","who","whom","why","with","would",
            "you","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
}

/// Target alphabet of the corpus. Selects both the purity check and the stopword list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Script {
    #[default]
    Cyrillic,
    Latin,
}

impl Script {
    fn letters(self) -> &'static Regex {
        match self {
            Script::Cyrillic => &*CYRILLIC,
            Script::Latin => &*LATIN,
        }
    }

    fn stopwords(self) -> &'static HashSet<&'static str> {
        match self {
            Script::Cyrillic => &*RUSSIAN_STOPWORDS,
            Script::Latin => &*ENGLISH_STOPWORDS,
        }
    }
}

impl FromStr for Script {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cyrillic" | "ru" | "russian" => Ok(Script::Cyrillic),
            "latin" | "en" | "english" => Ok(Script::Latin),
            other => Err(anyhow::anyhow!("unknown script {other:?}, expected cyrillic or latin")),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Script::Cyrillic => f.write_str("cyrillic"),
            Script::Latin => f.write_str("latin"),
        }
    }
}

/// Turns raw text into the ordered sequence of terms the index works with.
#[derive(Debug, Clone, Copy, Default)]
pub struct Tokenizer {
    script: Script,
}

impl Tokenizer {
    pub fn new(script: Script) -> Self {
        Self { script }
    }

    pub fn script(&self) -> Script {
        self.script
    }

    /// Tokenize text using NFKC normalization, lowercase, punctuation stripping,
    /// length/stopword filtering and the script-purity check. Duplicates are kept.
    ///
    /// Stripping keeps Unicode word characters of any script, so stray foreign
    /// letters stay inside their word and are judged by the purity check only.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>().to_lowercase();
        let stripped = NON_WORD.replace_all(&normalized, " ");
        let stopwords = self.script.stopwords();
        stripped
            .split_whitespace()
            .filter(|word| word.chars().count() >= MIN_TERM_LEN)
            .filter(|word| !stopwords.contains(word))
            .filter(|word| self.is_target_script(word))
            .map(str::to_string)
            .collect()
    }

    /// Term -> occurrence count for `text`.
    pub fn term_frequencies(&self, text: &str) -> HashMap<String, u32> {
        let mut freqs = HashMap::new();
        for term in self.tokenize(text) {
            *freqs.entry(term).or_insert(0) += 1;
        }
        freqs
    }

    fn is_target_script(&self, word: &str) -> bool {
        let total = word.chars().count();
        let matching = self.script.letters().find_iter(word).count();
        matching > 0 && matching as f32 / total as f32 >= MIN_SCRIPT_PURITY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = Tokenizer::new(Script::Latin).tokenize("Cats, dogs & the mice!");
        assert_eq!(t, vec!["cats", "dogs", "mice"]);
    }

    #[test]
    fn punctuation_keeps_word_boundaries() {
        let t = Tokenizer::new(Script::Latin).tokenize("rust,tokio;serde");
        assert_eq!(t, vec!["rust", "tokio", "serde"]);
    }

    #[test]
    fn purity_threshold_is_inclusive() {
        let tok = Tokenizer::new(Script::Latin);
        // 3 of 5 characters are letters: exactly 60%.
        assert_eq!(tok.tokenize("abc12"), vec!["abc12"]);
        assert!(tok.tokenize("ab123").is_empty());
    }

    #[test]
    fn foreign_letters_stay_inside_words() {
        let tok = Tokenizer::new(Script::Cyrillic);
        // Greek alpha is a word character: kept in place, word passes at 5/6 purity.
        assert_eq!(tok.tokenize("поискα"), vec!["поискα"]);
        assert!(tok.tokenize("αβγ").is_empty());
    }

    #[test]
    fn script_parses_from_str() {
        assert_eq!("Latin".parse::<Script>().unwrap(), Script::Latin);
        assert_eq!("ru".parse::<Script>().unwrap(), Script::Cyrillic);
        assert!("greek".parse::<Script>().is_err());
    }
}
