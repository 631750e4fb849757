//! Two-stage ranking: cheap pre-filter, then the full engine on the survivors

use std::time::Instant;

use tracing::{debug, info};

use crate::config::{PrefilterConfig, SimilarityConfig};
use crate::note::Note;
use crate::similarity::engine::SimilarityEngine;
use crate::similarity::heuristics::{self, jaccard};
use crate::similarity::result::SimilarityResult;
use crate::similarity::RankingPipeline;
use crate::text;
use crate::trace_time;

const TAG_SHORT_CIRCUIT_FACTOR: f64 = 0.8;
const QUICK_TAG_WEIGHT: f64 = 0.40;
const QUICK_TITLE_WEIGHT: f64 = 0.30;
const QUICK_KEYWORD_WEIGHT: f64 = 0.25;
const QUICK_TEMPORAL_WEIGHT: f64 = 0.05;

/// A candidate scored by the pre-filter; never leaves this module
struct CandidateScore<'a> {
    note: &'a Note,
    score: f64,
}

/// Stage one: corpus-independent quick scoring
#[derive(Debug, Clone, Default)]
pub struct Prefilter {
    config: PrefilterConfig,
}

impl Prefilter {
    pub fn new(config: PrefilterConfig) -> Self {
        Prefilter { config }
    }

    /// Quick score from tags, title words, keywords and coarse time proximity
    ///
    /// Strong tag overlap decides the score on its own.
    pub fn quick_score(&self, target: &Note, candidate: &Note) -> f64 {
        let tag_score = heuristics::tag_jaccard(target, candidate);
        if tag_score > self.config.tag_short_circuit {
            return tag_score * TAG_SHORT_CIRCUIT_FACTOR;
        }

        let title_score = heuristics::title_word_jaccard(target, candidate);
        let keyword_score = jaccard(
            &text::keywords(&target.content),
            &text::keywords(&candidate.content),
        );
        let temporal_score = heuristics::quick_temporal_proximity(target, candidate);

        QUICK_TAG_WEIGHT * tag_score
            + QUICK_TITLE_WEIGHT * title_score
            + QUICK_KEYWORD_WEIGHT * keyword_score
            + QUICK_TEMPORAL_WEIGHT * temporal_score
    }

    /// Survivors of the pre-filter, best first, at most `max_candidates`
    pub fn select<'a>(&self, target: &Note, corpus: &'a [Note]) -> Vec<&'a Note> {
        let mut scored: Vec<CandidateScore<'a>> = corpus
            .iter()
            .filter(|note| note.id != target.id)
            .map(|note| CandidateScore {
                note,
                score: self.quick_score(target, note),
            })
            .filter(|candidate| candidate.score > self.config.threshold)
            .collect();

        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(self.config.max_candidates);

        scored.into_iter().map(|candidate| candidate.note).collect()
    }
}

/// Optimized Similarity Engine
///
/// Drop-in replacement for [`SimilarityEngine`]: the pre-filter bounds the
/// expensive stage to a fixed number of candidates whatever the corpus size.
#[derive(Debug, Clone, Default)]
pub struct OptimizedSimilarityEngine {
    prefilter: Prefilter,
    engine: SimilarityEngine,
}

impl OptimizedSimilarityEngine {
    pub fn new(prefilter: Prefilter, engine: SimilarityEngine) -> Self {
        OptimizedSimilarityEngine { prefilter, engine }
    }

    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self::new(
            Prefilter::new(config.prefilter.clone()),
            SimilarityEngine::new(config.ranking.clone()),
        )
    }

    pub fn prefilter(&self) -> &Prefilter {
        &self.prefilter
    }
}

impl RankingPipeline for OptimizedSimilarityEngine {
    fn find_similar_notes<'a>(
        &self,
        target: &Note,
        corpus: &'a [Note],
        top_n: usize,
    ) -> Vec<SimilarityResult<'a>> {
        let start = Instant::now();
        let survivors = self.prefilter.select(target, corpus);
        trace_time!(start, "prefilter", survivors = survivors.len());

        info!(
            corpus = corpus.len(),
            survivors = survivors.len(),
            "prefiltered candidates"
        );

        if survivors.is_empty() {
            debug!(target = %target.id, "no candidates survived the pre-filter");
            return Vec::new();
        }

        self.engine.rank_candidates(target, &survivors, top_n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn note(id: &str, title: &str, tags: &[&str], content: &str) -> Note {
        let ts = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        Note::new(id, title, content)
            .with_tags(tags.iter().copied())
            .with_timestamps(ts, ts)
    }

    #[test]
    fn test_tag_short_circuit() {
        let prefilter = Prefilter::default();
        let target = note("a", "One", &["work", "meetings"], "");
        let candidate = note("b", "Two", &["work", "meetings", "notes"], "");
        // Jaccard 2/3 > 0.5 so only tags count
        let expected = (2.0 / 3.0) * 0.8;
        assert!((prefilter.quick_score(&target, &candidate) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_weighted_quick_score() {
        let prefilter = Prefilter::default();
        let base = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let target = note("a", "Garden plans", &["home"], "tomatoes peppers")
            .with_updated(base);
        let candidate = note("b", "Garden ideas", &["home", "outdoor"], "zucchini")
            .with_updated(base + Duration::days(30));

        // tag 1/2 (not above 0.5), title 1/3, no keywords, temporal 0
        let expected = 0.40 * 0.5 + 0.30 * (1.0 / 3.0);
        assert!((prefilter.quick_score(&target, &candidate) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_select_respects_threshold_and_cap() {
        let prefilter = Prefilter::new(PrefilterConfig {
            max_candidates: 3,
            ..PrefilterConfig::default()
        });
        let target = note("t", "Target", &["shared"], "");
        let mut corpus = vec![target.clone()];
        for i in 0..10 {
            corpus.push(note(&format!("n{i}"), "Other", &["shared"], ""));
        }

        let survivors = prefilter.select(&target, &corpus);
        assert_eq!(survivors.len(), 3);
        assert!(survivors.iter().all(|n| n.id != "t"));
        // Equal scores keep corpus order
        let ids: Vec<_> = survivors.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["n0", "n1", "n2"]);
    }

    #[test]
    fn test_select_drops_unrelated_old_notes() {
        let prefilter = Prefilter::default();
        let base = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let target = note("t", "Alpha", &["x"], "").with_updated(base);
        let stranger = note("s", "Beta", &["y"], "").with_updated(base - Duration::days(60));

        assert!(prefilter.select(&target, &[target.clone(), stranger]).is_empty());
    }

    #[test]
    fn test_optimized_engine_ranks_survivors() {
        let engine = OptimizedSimilarityEngine::default();
        let target = note(
            "t",
            "Rust ownership",
            &["rust"],
            "Ownership rules decide when memory is freed.",
        );
        let corpus = vec![
            target.clone(),
            note(
                "a",
                "Rust borrowing",
                &["rust"],
                "Borrowing rules decide when references stay valid.",
            ),
            note("b", "Pasta recipe", &["cooking"], "Boil water, add salt and pasta."),
        ];

        let results = engine.find_similar_notes(&target, &corpus, 5);
        assert_eq!(results[0].note.id, "a");
        assert!(results.iter().all(|r| r.note.id != "t"));
    }
}
