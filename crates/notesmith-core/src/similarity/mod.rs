//! Similarity ranking for finding related notes
//!
//! Leaf signals live in their own modules and are pure functions of two
//! notes (TF-IDF also takes [`CorpusStats`]). Two pipelines combine them:
//! [`SimilarityEngine`] scores every candidate with all eight signals, and
//! [`OptimizedSimilarityEngine`] runs a cheap pre-filter first.

pub mod coherence;
pub mod cosine;
pub mod engine;
pub mod heuristics;
pub mod ngram;
pub mod prefilter;
pub mod result;
pub mod tfidf;

mod tests;

pub use engine::{composite_score, SimilarityEngine};
pub use prefilter::{OptimizedSimilarityEngine, Prefilter};
pub use result::{sort_by_score, Breakdown, Signal, SignalScore, SimilarityResult};
pub use tfidf::CorpusStats;

use crate::note::Note;

/// A strategy for ranking a corpus against a target note
///
/// Implementations must exclude the target (by id), return at most `top_n`
/// results sorted by score descending, and give identical output for
/// identical input.
pub trait RankingPipeline: Send + Sync {
    fn find_similar_notes<'a>(
        &self,
        target: &Note,
        corpus: &'a [Note],
        top_n: usize,
    ) -> Vec<SimilarityResult<'a>>;
}

impl<P: RankingPipeline + ?Sized> RankingPipeline for Box<P> {
    fn find_similar_notes<'a>(
        &self,
        target: &Note,
        corpus: &'a [Note],
        top_n: usize,
    ) -> Vec<SimilarityResult<'a>> {
        (**self).find_similar_notes(target, corpus, top_n)
    }
}
