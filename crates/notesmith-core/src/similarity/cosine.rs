//! Cosine similarity over raw term-frequency vectors

use std::collections::BTreeMap;

use crate::note::Note;
use crate::text;

/// Cosine similarity between two notes' word-count vectors
///
/// Words shorter than three characters are ignored. Returns 0.0 when either
/// note has no qualifying words.
pub fn cosine_similarity(a: &Note, b: &Note) -> f64 {
    let freqs_a = text::word_frequencies(&a.content);
    let freqs_b = text::word_frequencies(&b.content);

    let to_weights = |freqs: BTreeMap<String, usize>| -> BTreeMap<String, f64> {
        freqs.into_iter().map(|(w, c)| (w, c as f64)).collect()
    };

    cosine(&to_weights(freqs_a), &to_weights(freqs_b))
}

/// Cosine similarity between two sparse weighted vectors
///
/// Vectors are ordered maps so the summation order, and therefore the exact
/// floating-point result, is the same on every call.
pub fn cosine(vec_a: &BTreeMap<String, f64>, vec_b: &BTreeMap<String, f64>) -> f64 {
    if vec_a.is_empty() || vec_b.is_empty() {
        return 0.0;
    }

    let mut dot_product = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for (term, weight) in vec_a {
        norm_a += weight * weight;
        if let Some(weight_b) = vec_b.get(term) {
            dot_product += weight * weight_b;
        }
    }

    for weight in vec_b.values() {
        norm_b += weight * weight;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot_product / (norm_a.sqrt() * norm_b.sqrt())).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_content_scores_one() {
        let a = Note::new("a", "", "apple banana cherry apple");
        let b = Note::new("b", "", "apple banana cherry apple");
        assert!((cosine_similarity(&a, &b) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_disjoint_content_scores_zero() {
        let a = Note::new("a", "", "apple banana");
        let b = Note::new("b", "", "cherry durian");
        assert_eq!(cosine_similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // [apple=1, banana=1] vs [apple=1, cherry=1] -> 1 / 2
        let a = Note::new("a", "", "apple banana");
        let b = Note::new("b", "", "apple cherry");
        assert!((cosine_similarity(&a, &b) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_content_scores_zero() {
        let a = Note::new("a", "", "");
        let b = Note::new("b", "", "apple banana");
        assert_eq!(cosine_similarity(&a, &b), 0.0);
        assert_eq!(cosine_similarity(&b, &a), 0.0);
    }

    #[test]
    fn test_zero_vector_scores_zero() {
        let mut zero = BTreeMap::new();
        zero.insert("apple".to_string(), 0.0);
        let mut other = BTreeMap::new();
        other.insert("apple".to_string(), 2.0);
        assert_eq!(cosine(&zero, &other), 0.0);
    }
}
