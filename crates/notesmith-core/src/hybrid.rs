//! Hybrid ranking: local pipeline blended with an external semantic scorer
//!
//! The local pipeline always runs and its answer is always usable. The
//! external scorer only ever re-ranks or supplements it; any failure or
//! timeout leaves the local results untouched.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use crate::config::{HybridConfig, SimilarityConfig};
use crate::note::Note;
use crate::semantic::{self, ExternalRelation, SemanticScorer, SemanticTask};
use crate::similarity::{
    sort_by_score, Breakdown, OptimizedSimilarityEngine, RankingPipeline, Signal,
    SimilarityResult,
};
use crate::trace_time;

/// Local ranking plus optional semantic re-ranking
pub struct HybridSimilarityService<P = OptimizedSimilarityEngine> {
    local: P,
    scorer: Option<Arc<dyn SemanticScorer>>,
    config: HybridConfig,
    timeout: Duration,
}

impl HybridSimilarityService<OptimizedSimilarityEngine> {
    /// Optimized local engine plus the configured scorer
    pub fn from_config(config: &SimilarityConfig) -> Self {
        Self::new(
            OptimizedSimilarityEngine::from_config(config),
            semantic::scorer_from_config(config),
            config.hybrid.clone(),
        )
    }
}

impl<P: RankingPipeline> HybridSimilarityService<P> {
    pub fn new(local: P, scorer: Option<Arc<dyn SemanticScorer>>, config: HybridConfig) -> Self {
        let timeout = Duration::from_secs(config.timeout_seconds);
        HybridSimilarityService {
            local,
            scorer,
            config,
            timeout,
        }
    }

    /// Override the deadline for the external call
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Drop the external scorer; results are then purely local
    pub fn offline(mut self) -> Self {
        self.scorer = None;
        self
    }

    /// Whether an external scorer will be consulted
    pub fn is_semantic_enabled(&self) -> bool {
        self.config.enabled && self.scorer.is_some()
    }

    /// Synchronous local-only path
    pub fn local_results<'a>(
        &self,
        target: &Note,
        corpus: &'a [Note],
        top_n: usize,
    ) -> Vec<SimilarityResult<'a>> {
        self.local.find_similar_notes(target, corpus, top_n)
    }

    fn active_scorer(&self) -> Option<&Arc<dyn SemanticScorer>> {
        self.scorer.as_ref().filter(|_| self.config.enabled)
    }

    /// Blend local results with external relations and re-rank
    pub fn merge<'a>(
        &self,
        target: &Note,
        corpus: &'a [Note],
        local: Vec<SimilarityResult<'a>>,
        relations: &[ExternalRelation],
        top_n: usize,
    ) -> Vec<SimilarityResult<'a>> {
        let mut lookup: HashMap<&str, &ExternalRelation> = HashMap::new();
        for relation in relations {
            lookup.entry(relation.note_id.as_str()).or_insert(relation);
        }

        let local_ids: HashSet<&'a str> = local
            .iter()
            .map(|r| {
                let note: &'a Note = r.note;
                note.id.as_str()
            })
            .collect();

        let mut merged: Vec<SimilarityResult<'a>> = local
            .into_iter()
            .map(|mut result| {
                let external = lookup.get(result.note.id.as_str()).copied();
                let external_score = external.map_or(0.0, sanitized_score);

                result.score = self.config.local_weight * result.score
                    + self.config.external_weight * external_score;

                if let Some(relation) = external.filter(|_| external_score > 0.0) {
                    result.breakdown.push(Signal::External, external_score);
                    result.reason = Some(relation.reason.clone());
                }
                result
            })
            .collect();

        let mut added: HashSet<&str> = HashSet::new();
        for relation in relations {
            let id = relation.note_id.as_str();
            if id == target.id || local_ids.contains(id) || !added.insert(id) {
                continue;
            }

            let Some(note) = corpus.iter().find(|n| n.id == id) else {
                warn!(note_id = %id, "external scorer returned an unknown note");
                continue;
            };

            let external_score = sanitized_score(relation);
            if external_score <= 0.0 {
                continue;
            }

            let mut breakdown = Breakdown::new();
            breakdown.push(Signal::External, external_score);

            let mut result =
                SimilarityResult::new(note, self.config.external_weight * external_score, breakdown);
            result.reason = Some(relation.reason.clone());
            merged.push(result);
        }

        sort_by_score(&mut merged);
        merged.truncate(top_n);
        merged
    }
}

/// External score clamped to `[0, 1]`; non-finite scores count as 0
fn sanitized_score(relation: &ExternalRelation) -> f64 {
    if relation.score.is_finite() {
        relation.score.clamp(0.0, 1.0)
    } else {
        warn!(
            note_id = %relation.note_id,
            score = relation.score,
            "ignoring non-finite external score"
        );
        0.0
    }
}

impl<P: RankingPipeline> RankingPipeline for HybridSimilarityService<P> {
    fn find_similar_notes<'a>(
        &self,
        target: &Note,
        corpus: &'a [Note],
        top_n: usize,
    ) -> Vec<SimilarityResult<'a>> {
        let start = Instant::now();
        let mut local = self
            .local
            .find_similar_notes(target, corpus, top_n.saturating_mul(2));
        trace_time!(start, "local_ranking", results = local.len());

        let Some(scorer) = self.active_scorer() else {
            local.truncate(top_n);
            return local;
        };

        if local.is_empty() {
            debug!(target = %target.id, "no local results to enhance");
            return local;
        }

        let candidates: Vec<Note> = local
            .iter()
            .take(self.config.max_external_candidates)
            .map(|result| result.note.clone())
            .collect();
        info!(
            scorer = scorer.name(),
            candidates = candidates.len(),
            "querying external scorer"
        );

        let task = SemanticTask::spawn(Arc::clone(scorer), target.clone(), candidates);
        let results = match task.wait(self.timeout) {
            Ok(relations) => {
                debug!(relations = relations.len(), "external scorer answered");
                self.merge(target, corpus, local, &relations, top_n)
            }
            Err(e) => {
                warn!(error = %e, "external scorer failed, using local results");
                local.truncate(top_n);
                local
            }
        };

        trace_time!(start, "hybrid_ranking", results = results.len());
        results
    }
}
