//! Offline keyword-overlap scorer, used when no API key is configured

use crate::note::Note;
use crate::semantic::{ExternalRelation, SemanticError, SemanticScorer};
use crate::text;

/// Target words must be longer than this to count
const MIN_MATCH_WORD_CHARS: usize = 3;
const SCORE_PER_MATCH: f64 = 0.15;
const MAX_SCORE: f64 = 0.95;

/// Scores candidates by how many of the target's words they contain
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    max_results: usize,
}

impl KeywordScorer {
    pub fn new(max_results: usize) -> Self {
        KeywordScorer { max_results }
    }
}

impl SemanticScorer for KeywordScorer {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn find_related(
        &self,
        target: &Note,
        candidates: &[Note],
    ) -> Result<Vec<ExternalRelation>, SemanticError> {
        // Repeated words count once per occurrence
        let words: Vec<String> = text::split_words(&target.full_text())
            .into_iter()
            .filter(|w| w.chars().count() > MIN_MATCH_WORD_CHARS)
            .collect();

        let mut related: Vec<ExternalRelation> = candidates
            .iter()
            .filter(|candidate| candidate.id != target.id)
            .filter_map(|candidate| {
                let haystack = candidate.full_text().to_lowercase();
                let matches = words.iter().filter(|w| haystack.contains(w.as_str())).count();
                (matches > 0).then(|| {
                    let score = (matches as f64 * SCORE_PER_MATCH).min(MAX_SCORE);
                    let plural = if matches > 1 { "s" } else { "" };
                    ExternalRelation::new(
                        &candidate.id,
                        score,
                        format!("Shares {} keyword{}", matches, plural),
                    )
                })
            })
            .collect();

        related.sort_by(|a, b| b.score.total_cmp(&a.score));
        related.truncate(self.max_results);
        Ok(related)
    }
}
