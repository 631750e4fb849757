//! Ranked results and their explanations

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::note::Note;

/// Raw signal scores above this are worth mentioning in a one-line explanation
const EXPLAIN_MIN_SCORE: f64 = 0.3;
/// Signals mentioned in a one-line explanation
const EXPLAIN_MAX_SIGNALS: usize = 2;
/// Raw signal scores above this appear in the detailed breakdown
const DETAIL_MIN_SCORE: f64 = 0.05;

/// One similarity signal, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Signal {
    Tfidf,
    Jaccard,
    Cosine,
    NGram,
    Tags,
    Temporal,
    Title,
    Coherence,
    /// Score supplied by the external semantic scorer
    External,
}

impl Signal {
    /// The eight local signals in the order they are evaluated and reported
    pub const LOCAL: [Signal; 8] = [
        Signal::Tfidf,
        Signal::Jaccard,
        Signal::Cosine,
        Signal::NGram,
        Signal::Tags,
        Signal::Temporal,
        Signal::Title,
        Signal::Coherence,
    ];

    /// Display name used in explanations and JSON output
    pub fn label(&self) -> &'static str {
        match self {
            Signal::Tfidf => "TF-IDF",
            Signal::Jaccard => "Jaccard",
            Signal::Cosine => "Cosine",
            Signal::NGram => "N-gram",
            Signal::Tags => "Tags",
            Signal::Temporal => "Temporal",
            Signal::Title => "Title",
            Signal::Coherence => "Thought/Theme",
            Signal::External => "AI Semantic",
        }
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Signal {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Raw signal scores in insertion order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Breakdown(Vec<SignalScore>);

/// A single entry of a [`Breakdown`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SignalScore {
    pub signal: Signal,
    pub score: f64,
}

impl Breakdown {
    /// Create an empty breakdown
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a signal; order of insertion is preserved
    pub fn push(&mut self, signal: Signal, score: f64) {
        self.0.push(SignalScore { signal, score });
    }

    /// Raw score recorded for a signal
    pub fn get(&self, signal: Signal) -> Option<f64> {
        self.0.iter().find(|e| e.signal == signal).map(|e| e.score)
    }

    /// Iterate entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SignalScore> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A note ranked against a target, with the evidence behind its score
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityResult<'a> {
    /// The related note
    pub note: &'a Note,
    /// Composite (or hybrid) score, roughly in `[0, 1]`
    pub score: f64,
    /// Raw per-signal scores
    pub breakdown: Breakdown,
    /// Free-text reason from the external scorer, if it contributed
    pub reason: Option<String>,
}

impl<'a> SimilarityResult<'a> {
    /// Create a result without an external reason
    pub fn new(note: &'a Note, score: f64, breakdown: Breakdown) -> Self {
        SimilarityResult {
            note,
            score,
            breakdown,
            reason: None,
        }
    }

    /// One-line summary: overall percentage plus the two strongest signals
    ///
    /// Example: `"72.4% similar (Tags: 100%) (Title: 85%)"`
    pub fn explain(&self) -> String {
        let mut explanation = format!("{:.1}% similar", self.score * 100.0);

        let mut strong: Vec<&SignalScore> = self
            .breakdown
            .iter()
            .filter(|e| e.score > EXPLAIN_MIN_SCORE)
            .collect();
        // Stable sort keeps breakdown order among equal scores
        strong.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));

        for entry in strong.into_iter().take(EXPLAIN_MAX_SIGNALS) {
            explanation.push_str(&format!(" ({}: {:.0}%)", entry.signal, entry.score * 100.0));
        }

        explanation
    }

    /// Multi-line breakdown listing every signal that contributed noticeably
    pub fn detailed_explanation(&self) -> String {
        let mut out = format!("{:.1}% similar\n\nSimilarity Breakdown:\n", self.score * 100.0);

        for entry in self.breakdown.iter().filter(|e| e.score > DETAIL_MIN_SCORE) {
            out.push_str(&format!("  • {}: {:.0}%\n", entry.signal, entry.score * 100.0));
        }

        if let Some(reason) = &self.reason {
            out.push_str(&format!("  Reason: {}\n", reason));
        }

        out
    }
}

impl fmt::Display for SimilarityResult<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.note.title, self.explain())
    }
}

/// Sort results by score, highest first; ties keep their current order
pub fn sort_by_score(results: &mut [SimilarityResult<'_>]) {
    results.sort_by(|a, b| b.score.total_cmp(&a.score));
}
