//! Text processing utilities: tokenization, stop words, keywords, sentences
//!
//! Tokenization is deliberately simple: lowercase, split on anything that is
//! not a word character (alphanumeric or `_`), drop empty fragments. Lengths
//! are measured in characters, not bytes.

use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use tracing::warn;

/// Stop words removed before TF-IDF weighting
static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// Frequent long words ignored by the keyword pre-filter
static COMMON_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// A sentence body followed by its terminator run
static SENTENCE: OnceLock<Option<Regex>> = OnceLock::new();

/// Words shorter than or equal to this are noise for content signals
pub const MIN_WORD_LEN: usize = 2;

/// Words shorter than or equal to this are not keywords
pub const MIN_KEYWORD_LEN: usize = 4;

/// Keywords kept per document by the pre-filter
pub const MAX_KEYWORDS: usize = 50;

/// Sentences of this many characters or fewer are treated as fragments
pub const MIN_SENTENCE_LEN: usize = 10;

fn get_stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| {
        [
            "the", "and", "for", "are", "but", "not", "you", "all", "can", "her", "was", "one",
            "our", "out", "day", "get", "has", "him", "his", "how", "man", "new", "now", "old",
            "see", "two", "way", "who", "boy", "did", "its", "let", "put", "say", "she", "too",
            "use", "this", "that", "with", "have", "from", "they", "will", "what", "been",
            "more", "when", "your", "said", "each", "tell", "does", "very", "just", "than",
            "into", "them",
        ]
        .iter()
        .copied()
        .collect()
    })
}

fn get_common_words() -> &'static HashSet<&'static str> {
    COMMON_WORDS.get_or_init(|| {
        [
            "about", "after", "before", "being", "could", "every", "first", "found", "great",
            "having", "might", "never", "other", "should", "their", "there", "these", "thing",
            "think", "those", "under", "where", "which", "while", "would", "write",
        ]
        .iter()
        .copied()
        .collect()
    })
}

fn get_sentence_regex() -> Option<&'static Regex> {
    SENTENCE
        .get_or_init(|| match Regex::new(r"[^.!?]+[.!?]*") {
            Ok(re) => Some(re),
            Err(e) => {
                warn!(error = %e, "Failed to compile sentence regex");
                None
            }
        })
        .as_ref()
}

/// Whether a character belongs to a word
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Whether a word is on the TF-IDF stop list
pub fn is_stop_word(word: &str) -> bool {
    get_stop_words().contains(word)
}

fn char_len(word: &str) -> usize {
    word.chars().count()
}

/// Lowercase and split on non-word characters, keeping every word
pub fn split_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !is_word_char(c))
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .collect()
}

/// Words longer than two characters, in document order
pub fn content_words(text: &str) -> Vec<String> {
    split_words(text)
        .into_iter()
        .filter(|w| char_len(w) > MIN_WORD_LEN)
        .collect()
}

/// Distinct words longer than two characters
pub fn unique_words(text: &str) -> HashSet<String> {
    content_words(text).into_iter().collect()
}

/// Raw counts of words longer than two characters
pub fn word_frequencies(text: &str) -> BTreeMap<String, usize> {
    let mut freqs = BTreeMap::new();
    for word in content_words(text) {
        *freqs.entry(word).or_insert(0) += 1;
    }
    freqs
}

/// Content words with stop words removed, duplicates preserved
pub fn tfidf_terms(text: &str) -> Vec<String> {
    content_words(text)
        .into_iter()
        .filter(|w| !is_stop_word(w))
        .collect()
}

/// Distinct keywords for the cheap pre-filter
///
/// Keeps words longer than four characters that are not in the common-word
/// list. Only the first [`MAX_KEYWORDS`] qualifying occurrences are read, so
/// repeats count against the cap.
pub fn keywords(text: &str) -> HashSet<String> {
    let common = get_common_words();

    split_words(text)
        .into_iter()
        .filter(|word| char_len(word) > MIN_KEYWORD_LEN && !common.contains(word.as_str()))
        .take(MAX_KEYWORDS)
        .collect()
}

/// One sentence of a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sentence<'a> {
    /// Sentence text, trimmed, without its terminator
    pub text: &'a str,
    /// Whether the sentence ended with a question mark
    pub is_question: bool,
}

impl Sentence<'_> {
    /// Length in characters
    pub fn len(&self) -> usize {
        char_len(self.text)
    }

    /// Whether the sentence has no characters
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Split text on `.`, `!` and `?`, dropping fragments of ten characters or less
pub fn sentences(text: &str) -> Vec<Sentence<'_>> {
    let Some(re) = get_sentence_regex() else {
        return Vec::new();
    };

    re.find_iter(text)
        .filter_map(|m| {
            let raw = m.as_str();
            let body = raw.trim_end_matches(['.', '!', '?']);
            let is_question = raw[body.len()..].contains('?');
            let body = body.trim();
            (char_len(body) > MIN_SENTENCE_LEN).then_some(Sentence {
                text: body,
                is_question,
            })
        })
        .collect()
}

/// Count whitespace-separated tokens
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_words_lowercases_and_splits() {
        let words = split_words("Hello, World! snake_case stays-split");
        assert_eq!(words, vec!["hello", "world", "snake_case", "stays", "split"]);
    }

    #[test]
    fn test_split_words_empty_input() {
        assert!(split_words("").is_empty());
        assert!(split_words("  ... !!! ").is_empty());
    }

    #[test]
    fn test_content_words_drop_short_words() {
        let words = content_words("An ox is in the barn");
        assert_eq!(words, vec!["the", "barn"]);
    }

    #[test]
    fn test_content_words_count_characters_not_bytes() {
        // "été" is three characters but six bytes
        let words = content_words("été au lac");
        assert_eq!(words, vec!["été", "lac"]);
    }

    #[test]
    fn test_tfidf_terms_remove_stop_words() {
        let terms = tfidf_terms("The garden and the orchard need water");
        assert_eq!(terms, vec!["garden", "orchard", "need", "water"]);
    }

    #[test]
    fn test_word_frequencies_counts_duplicates() {
        let freqs = word_frequencies("rust rust cargo");
        assert_eq!(freqs.get("rust"), Some(&2));
        assert_eq!(freqs.get("cargo"), Some(&1));
    }

    #[test]
    fn test_keywords_filter_length_and_common_words() {
        let kws = keywords("These would be great rust compiler internals");
        assert!(kws.contains("compiler"));
        assert!(kws.contains("internals"));
        assert!(!kws.contains("these"));
        assert!(!kws.contains("would"));
        assert!(!kws.contains("rust"));
    }

    #[test]
    fn test_keywords_capped() {
        let text: String = (0..200).map(|i| format!("keyword{i} ")).collect();
        assert_eq!(keywords(&text).len(), MAX_KEYWORDS);
        assert!(keywords(&text).contains("keyword49"));
        assert!(!keywords(&text).contains("keyword50"));
    }

    #[test]
    fn test_keywords_cap_counts_repeats() {
        let text = "alpha ".repeat(60) + "omega";
        let found = keywords(&text);
        assert_eq!(found.len(), 1);
        assert!(found.contains("alpha"));

        let text = "gamma ".repeat(49) + "omega";
        assert!(keywords(&text).contains("omega"));
    }

    #[test]
    fn test_sentences_drop_fragments_and_detect_questions() {
        let text = "Short one. This is a longer statement! Is this really a question? Ok.";
        let found = sentences(text);

        assert_eq!(found.len(), 2);
        assert_eq!(found[0].text, "This is a longer statement");
        assert!(!found[0].is_question);
        assert_eq!(found[1].text, "Is this really a question");
        assert!(found[1].is_question);
    }

    #[test]
    fn test_sentences_without_terminator() {
        let found = sentences("a trailing sentence without a period");
        assert_eq!(found.len(), 1);
        assert!(!found[0].is_question);
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words("  one two\tthree\n"), 3);
        assert_eq!(count_words(""), 0);
    }
}
