//! Corpus-aware TF-IDF similarity
//!
//! [`CorpusStats`] is the document-frequency table for one query. It is built
//! from the candidate set at the start of a ranking call and dropped at the
//! end; pairwise scores must come from stats built over the current
//! candidates; stale stats give meaningless (but finite) scores.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::note::Note;
use crate::similarity::cosine::cosine;
use crate::text;

/// Document frequencies for a corpus snapshot
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CorpusStats {
    /// Number of documents containing each term at least once
    document_frequency: HashMap<String, usize>,
    /// Number of documents in the corpus
    total_documents: usize,
}

impl CorpusStats {
    /// Build statistics over a set of notes
    pub fn build<'a, I>(notes: I) -> Self
    where
        I: IntoIterator<Item = &'a Note>,
    {
        let mut document_frequency: HashMap<String, usize> = HashMap::new();
        let mut total_documents = 0;

        for note in notes {
            total_documents += 1;
            let unique: HashSet<String> = text::tfidf_terms(&note.content).into_iter().collect();
            for term in unique {
                *document_frequency.entry(term).or_insert(0) += 1;
            }
        }

        CorpusStats {
            document_frequency,
            total_documents,
        }
    }

    /// Number of documents the statistics were built from
    pub fn total_documents(&self) -> usize {
        self.total_documents
    }

    /// Number of documents containing `term`
    pub fn document_frequency(&self, term: &str) -> usize {
        self.document_frequency.get(term).copied().unwrap_or(0)
    }

    /// Inverse document frequency: `ln(N / df)`, or 0 for unseen terms
    pub fn idf(&self, term: &str) -> f64 {
        let df = self.document_frequency(term);
        if df == 0 {
            return 0.0;
        }
        (self.total_documents as f64 / df as f64).ln()
    }

    /// TF-IDF weighted vector for a note's content
    pub fn tfidf_vector(&self, note: &Note) -> BTreeMap<String, f64> {
        let mut term_freqs: BTreeMap<String, usize> = BTreeMap::new();
        for term in text::tfidf_terms(&note.content) {
            *term_freqs.entry(term).or_insert(0) += 1;
        }

        term_freqs
            .into_iter()
            .map(|(term, tf)| {
                let weight = tf as f64 * self.idf(&term);
                (term, weight)
            })
            .collect()
    }

    /// Cosine similarity of the two notes' TF-IDF vectors
    pub fn similarity(&self, a: &Note, b: &Note) -> f64 {
        cosine(&self.tfidf_vector(a), &self.tfidf_vector(b))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus() -> Vec<Note> {
        vec![
            Note::new("n-1", "", "apple banana cherry"),
            Note::new("n-2", "", "apple banana durian"),
            Note::new("n-3", "", "zucchini squash pumpkin"),
        ]
    }

    #[test]
    fn test_document_frequencies() {
        let notes = corpus();
        let stats = CorpusStats::build(&notes);

        assert_eq!(stats.total_documents(), 3);
        assert_eq!(stats.document_frequency("apple"), 2);
        assert_eq!(stats.document_frequency("cherry"), 1);
        assert_eq!(stats.document_frequency("missing"), 0);
    }

    #[test]
    fn test_document_frequency_counts_each_note_once() {
        let notes = vec![Note::new("n-1", "", "echo echo echo")];
        let stats = CorpusStats::build(&notes);
        assert_eq!(stats.document_frequency("echo"), 1);
    }

    #[test]
    fn test_document_frequency_never_exceeds_total() {
        let notes = corpus();
        let stats = CorpusStats::build(&notes);
        for note in &notes {
            for term in text::tfidf_terms(&note.content) {
                assert!(stats.document_frequency(&term) <= stats.total_documents());
            }
        }
    }

    #[test]
    fn test_idf_unseen_and_universal_terms() {
        let notes = vec![
            Note::new("n-1", "", "shared alpha"),
            Note::new("n-2", "", "shared beta"),
        ];
        let stats = CorpusStats::build(&notes);

        assert_eq!(stats.idf("unseen"), 0.0);
        assert_eq!(stats.idf("shared"), 0.0);
        assert!((stats.idf("alpha") - 2.0_f64.ln()).abs() < 1e-12);
    }

    #[test]
    fn test_stop_words_excluded() {
        let notes = vec![Note::new("n-1", "", "the garden with them")];
        let stats = CorpusStats::build(&notes);
        assert_eq!(stats.document_frequency("the"), 0);
        assert_eq!(stats.document_frequency("them"), 0);
        assert_eq!(stats.document_frequency("garden"), 1);
    }

    #[test]
    fn test_similarity_range() {
        let notes = corpus();
        let stats = CorpusStats::build(&notes);

        let related = stats.similarity(&notes[0], &notes[1]);
        assert!(related > 0.0 && related < 1.0);

        let unrelated = stats.similarity(&notes[0], &notes[2]);
        assert_eq!(unrelated, 0.0);

        let self_score = stats.similarity(&notes[0], &notes[0]);
        assert!((self_score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_content_scores_zero() {
        let notes = corpus();
        let stats = CorpusStats::build(&notes);
        let empty = Note::new("n-0", "", "");
        assert_eq!(stats.similarity(&empty, &notes[0]), 0.0);
    }
}
