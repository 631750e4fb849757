//! Full eight-signal ranking

use std::time::Instant;

use tracing::debug;

use crate::config::{RankingConfig, SignalWeights};
use crate::note::Note;
use crate::similarity::result::{sort_by_score, Breakdown, Signal, SimilarityResult};
use crate::similarity::tfidf::CorpusStats;
use crate::similarity::{coherence, cosine, heuristics, ngram, RankingPipeline};
use crate::trace_time;

/// Similarity Engine
///
/// Scores every candidate against the target with all eight signals, using
/// TF-IDF statistics rebuilt from the candidate set on each call.
#[derive(Debug, Clone, Default)]
pub struct SimilarityEngine {
    config: RankingConfig,
}

impl SimilarityEngine {
    /// Create a new Similarity Engine
    pub fn new(config: RankingConfig) -> Self {
        SimilarityEngine { config }
    }

    /// Ranking parameters in use
    pub fn config(&self) -> &RankingConfig {
        &self.config
    }

    /// Raw scores of all eight signals for one pair, in evaluation order
    pub fn score_pair(&self, stats: &CorpusStats, a: &Note, b: &Note) -> Breakdown {
        let mut breakdown = Breakdown::new();
        breakdown.push(Signal::Tfidf, stats.similarity(a, b));
        breakdown.push(Signal::Jaccard, heuristics::word_jaccard(a, b));
        breakdown.push(Signal::Cosine, cosine::cosine_similarity(a, b));
        breakdown.push(Signal::NGram, ngram::ngram_similarity(a, b));
        breakdown.push(Signal::Tags, heuristics::tag_jaccard(a, b));
        breakdown.push(Signal::Temporal, heuristics::temporal_proximity(a, b));
        breakdown.push(Signal::Title, heuristics::title_similarity(a, b));
        breakdown.push(Signal::Coherence, coherence::thought_similarity(a, b));
        breakdown
    }

    /// Weighted sum of a breakdown
    pub fn composite(&self, breakdown: &Breakdown) -> f64 {
        composite_score(&self.config.weights, breakdown)
    }

    /// Rank an explicit candidate set against the target
    ///
    /// The target itself (matched by id) is skipped. Results scoring at or
    /// below `min_score` are dropped, the rest sorted by score (ties keep
    /// candidate order) and truncated to `top_n`.
    pub fn rank_candidates<'a>(
        &self,
        target: &Note,
        candidates: &[&'a Note],
        top_n: usize,
    ) -> Vec<SimilarityResult<'a>> {
        let start = Instant::now();
        let stats = CorpusStats::build(candidates.iter().copied());
        trace_time!(start, "build_corpus_stats", documents = stats.total_documents());

        let mut results: Vec<SimilarityResult<'a>> = candidates
            .iter()
            .copied()
            .filter(|candidate| candidate.id != target.id)
            .filter_map(|candidate| {
                let breakdown = self.score_pair(&stats, target, candidate);
                let score = self.composite(&breakdown);
                (score > self.config.min_score)
                    .then(|| SimilarityResult::new(candidate, score, breakdown))
            })
            .collect();

        sort_by_score(&mut results);
        results.truncate(top_n);

        debug!(
            target = %target.id,
            candidates = candidates.len(),
            results = results.len(),
            "full_ranking"
        );
        trace_time!(start, "full_ranking");

        results
    }
}

impl RankingPipeline for SimilarityEngine {
    fn find_similar_notes<'a>(
        &self,
        target: &Note,
        corpus: &'a [Note],
        top_n: usize,
    ) -> Vec<SimilarityResult<'a>> {
        let candidates: Vec<&'a Note> = corpus.iter().collect();
        self.rank_candidates(target, &candidates, top_n)
    }
}

/// Weighted sum of the signals present in a breakdown
pub fn composite_score(weights: &SignalWeights, breakdown: &Breakdown) -> f64 {
    breakdown
        .iter()
        .map(|entry| weights.weight(entry.signal) * entry.score)
        .sum()
}
