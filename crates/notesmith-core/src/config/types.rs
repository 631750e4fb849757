//! Configuration type definitions

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NoteSmithError;
use crate::similarity::Signal;

/// API key values shipped in sample configs; treated as "no key"
pub const PLACEHOLDER_API_KEYS: [&str; 2] = ["YOUR_GEMINI_API_KEY_HERE", "YOUR_API_KEY_HERE"];

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Full ranking parameters
    #[serde(default)]
    pub ranking: RankingConfig,

    /// Pre-filter stage parameters
    #[serde(default)]
    pub prefilter: PrefilterConfig,

    /// Hybrid merge parameters
    #[serde(default)]
    pub hybrid: HybridConfig,

    /// External semantic scorer settings
    #[serde(default)]
    pub semantic: SemanticConfig,
}

/// Parameters of the eight-signal ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingConfig {
    /// Composite scores at or below this are dropped (default 0.1)
    #[serde(default = "default_min_score")]
    pub min_score: f64,

    /// Per-signal weights
    #[serde(default)]
    pub weights: SignalWeights,
}

/// Weights of the eight local signals; they sum to 1.0 by default
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalWeights {
    #[serde(default = "default_tfidf_weight")]
    pub tfidf: f64,
    #[serde(default = "default_jaccard_weight")]
    pub jaccard: f64,
    #[serde(default = "default_cosine_weight")]
    pub cosine: f64,
    #[serde(default = "default_ngram_weight")]
    pub ngram: f64,
    #[serde(default = "default_tags_weight")]
    pub tags: f64,
    #[serde(default = "default_temporal_weight")]
    pub temporal: f64,
    #[serde(default = "default_title_weight")]
    pub title: f64,
    #[serde(default = "default_coherence_weight")]
    pub coherence: f64,
}

/// Parameters of the cheap pre-filter stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefilterConfig {
    /// Quick scores at or below this are dropped (default 0.05)
    #[serde(default = "default_prefilter_threshold")]
    pub threshold: f64,

    /// Survivors handed to the full ranking (default 20)
    #[serde(default = "default_max_candidates")]
    pub max_candidates: usize,

    /// Tag overlap above this decides the quick score alone (default 0.5)
    #[serde(default = "default_tag_short_circuit")]
    pub tag_short_circuit: f64,
}

/// Parameters of the local/external blend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridConfig {
    /// Consult the external scorer at all
    #[serde(default = "default_hybrid_enabled")]
    pub enabled: bool,

    #[serde(default = "default_local_weight")]
    pub local_weight: f64,

    #[serde(default = "default_external_weight")]
    pub external_weight: f64,

    /// Local results sent to the external scorer (default 15)
    #[serde(default = "default_max_external_candidates")]
    pub max_external_candidates: usize,

    /// Upper bound on the external round trip, in seconds (default 30)
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Which external scorer to use
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticProvider {
    /// LLM-backed keyword linking via the Gemini API
    #[default]
    Gemini,
    /// Offline keyword overlap
    Keyword,
}

impl SemanticProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            SemanticProvider::Gemini => "gemini",
            SemanticProvider::Keyword => "keyword",
        }
    }
}

impl FromStr for SemanticProvider {
    type Err = NoteSmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gemini" => Ok(SemanticProvider::Gemini),
            "keyword" | "mock" => Ok(SemanticProvider::Keyword),
            other => Err(NoteSmithError::invalid_value("semantic provider", other)),
        }
    }
}

impl fmt::Display for SemanticProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External semantic scorer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticConfig {
    #[serde(default)]
    pub provider: SemanticProvider,

    /// Gemini API key; empty or placeholder selects the keyword scorer
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Endpoint prefix; the model name and `:generateContent` are appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// Relations returned per query (default 5)
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// Keyword-linking scores at or below this are dropped (default 0.3)
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,

    /// Characters of target content included in prompts (default 500)
    #[serde(default = "default_content_preview_chars")]
    pub content_preview_chars: usize,
}

impl SignalWeights {
    /// Weight applied to a signal; the external entry carries no local weight
    pub fn weight(&self, signal: Signal) -> f64 {
        match signal {
            Signal::Tfidf => self.tfidf,
            Signal::Jaccard => self.jaccard,
            Signal::Cosine => self.cosine,
            Signal::NGram => self.ngram,
            Signal::Tags => self.tags,
            Signal::Temporal => self.temporal,
            Signal::Title => self.title,
            Signal::Coherence => self.coherence,
            Signal::External => 0.0,
        }
    }

    /// All eight local weights in evaluation order
    pub fn values(&self) -> [f64; 8] {
        Signal::LOCAL.map(|signal| self.weight(signal))
    }
}

impl SemanticConfig {
    /// True when no usable API key is configured
    pub fn uses_mock_mode(&self) -> bool {
        let key = self.api_key.trim();
        key.is_empty() || PLACEHOLDER_API_KEYS.contains(&key)
    }
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            min_score: default_min_score(),
            weights: SignalWeights::default(),
        }
    }
}

impl Default for SignalWeights {
    fn default() -> Self {
        Self {
            tfidf: default_tfidf_weight(),
            jaccard: default_jaccard_weight(),
            cosine: default_cosine_weight(),
            ngram: default_ngram_weight(),
            tags: default_tags_weight(),
            temporal: default_temporal_weight(),
            title: default_title_weight(),
            coherence: default_coherence_weight(),
        }
    }
}

impl Default for PrefilterConfig {
    fn default() -> Self {
        Self {
            threshold: default_prefilter_threshold(),
            max_candidates: default_max_candidates(),
            tag_short_circuit: default_tag_short_circuit(),
        }
    }
}

impl Default for HybridConfig {
    fn default() -> Self {
        Self {
            enabled: default_hybrid_enabled(),
            local_weight: default_local_weight(),
            external_weight: default_external_weight(),
            max_external_candidates: default_max_external_candidates(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            provider: SemanticProvider::default(),
            api_key: String::new(),
            model: default_model(),
            base_url: default_base_url(),
            max_output_tokens: default_max_output_tokens(),
            temperature: default_temperature(),
            max_results: default_max_results(),
            min_similarity: default_min_similarity(),
            content_preview_chars: default_content_preview_chars(),
        }
    }
}

fn default_min_score() -> f64 {
    0.1
}

fn default_tfidf_weight() -> f64 {
    0.20
}

fn default_jaccard_weight() -> f64 {
    0.12
}

fn default_cosine_weight() -> f64 {
    0.15
}

fn default_ngram_weight() -> f64 {
    0.08
}

fn default_tags_weight() -> f64 {
    0.15
}

fn default_temporal_weight() -> f64 {
    0.05
}

fn default_title_weight() -> f64 {
    0.10
}

fn default_coherence_weight() -> f64 {
    0.15
}

fn default_prefilter_threshold() -> f64 {
    0.05
}

fn default_max_candidates() -> usize {
    20
}

fn default_tag_short_circuit() -> f64 {
    0.5
}

fn default_hybrid_enabled() -> bool {
    true
}

fn default_local_weight() -> f64 {
    0.7
}

fn default_external_weight() -> f64 {
    0.3
}

fn default_max_external_candidates() -> usize {
    15
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_model() -> String {
    "gemini-2.5-flash-latest".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta/models/".to_string()
}

fn default_max_output_tokens() -> u32 {
    1000
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_results() -> usize {
    5
}

fn default_min_similarity() -> f64 {
    0.3
}

fn default_content_preview_chars() -> usize {
    500
}
