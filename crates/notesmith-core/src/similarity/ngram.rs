//! Word n-gram overlap (bigrams and trigrams)

use std::collections::HashSet;

use crate::note::Note;
use crate::similarity::heuristics::jaccard;
use crate::text;

const BIGRAM_WEIGHT: f64 = 0.4;
const TRIGRAM_WEIGHT: f64 = 0.6;

/// Phrase similarity: `0.4 * bigram Jaccard + 0.6 * trigram Jaccard`
pub fn ngram_similarity(a: &Note, b: &Note) -> f64 {
    let words_a = text::split_words(&a.content);
    let words_b = text::split_words(&b.content);

    let bigrams = jaccard(&extract_ngrams(&words_a, 2), &extract_ngrams(&words_b, 2));
    let trigrams = jaccard(&extract_ngrams(&words_a, 3), &extract_ngrams(&words_b, 3));

    BIGRAM_WEIGHT * bigrams + TRIGRAM_WEIGHT * trigrams
}

/// Contiguous word n-grams joined by a single space
///
/// N-grams whose rendered form is `2 * n` characters or shorter are dropped,
/// which removes runs of one- and two-letter words.
pub fn extract_ngrams(words: &[String], n: usize) -> HashSet<String> {
    if n == 0 {
        return HashSet::new();
    }

    words
        .windows(n)
        .map(|window| window.join(" "))
        .filter(|ngram| ngram.chars().count() > n * 2)
        .collect()
}
