//! LLM-assisted linking: the model extracts keywords, matching is local

use tracing::{info, warn};

use crate::config::SemanticConfig;
use crate::note::Note;
use crate::semantic::gemini::{GeminiClient, TextGenerator};
use crate::semantic::{ExternalRelation, SemanticError, SemanticScorer};

/// Matched keywords quoted in a reason
const MAX_REASON_KEYWORDS: usize = 3;

/// Scores candidates by how many model-extracted keywords they contain
pub struct SmartLinkingScorer<G = GeminiClient> {
    generator: G,
    min_similarity: f64,
    max_results: usize,
    preview_chars: usize,
}

impl<G: TextGenerator> SmartLinkingScorer<G> {
    pub fn new(generator: G, config: &SemanticConfig) -> Self {
        SmartLinkingScorer {
            generator,
            min_similarity: config.min_similarity,
            max_results: config.max_results,
            preview_chars: config.content_preview_chars,
        }
    }

    fn extract_keywords(&self, note: &Note) -> Result<Vec<String>, SemanticError> {
        let prompt = keyword_prompt(note, self.preview_chars);
        let answer = self.generator.generate(&prompt)?;
        Ok(parse_keywords(&answer))
    }
}

impl<G: TextGenerator> SemanticScorer for SmartLinkingScorer<G> {
    fn name(&self) -> &'static str {
        "smart-linking"
    }

    fn find_related(
        &self,
        target: &Note,
        candidates: &[Note],
    ) -> Result<Vec<ExternalRelation>, SemanticError> {
        if candidates.iter().all(|c| c.id == target.id) {
            return Ok(Vec::new());
        }

        let keywords = self.extract_keywords(target)?;
        if keywords.is_empty() {
            warn!(target = %target.id, "model returned no keywords");
            return Ok(Vec::new());
        }
        info!(target = %target.id, keywords = %keywords.join(", "), "extracted keywords");

        let mut related: Vec<ExternalRelation> = candidates
            .iter()
            .filter(|candidate| candidate.id != target.id)
            .filter_map(|candidate| {
                let (score, matched) = keyword_match(&keywords, candidate);
                (score > self.min_similarity)
                    .then(|| ExternalRelation::new(&candidate.id, score, reason(&matched)))
            })
            .collect();

        related.sort_by(|a, b| b.score.total_cmp(&a.score));
        related.truncate(self.max_results);

        info!(found = related.len(), "smart linking finished");
        Ok(related)
    }
}

/// Prompt asking for a comma-separated keyword list
pub fn keyword_prompt(note: &Note, preview_chars: usize) -> String {
    format!(
        "Extract 5-10 key concepts, topics, or keywords from this note. \
         Return ONLY the keywords as a comma-separated list, nothing else.\n\n\
         Title: {}\nContent: {}\n\nKeywords:",
        note.title,
        preview(&note.content, preview_chars)
    )
}

/// First `max_chars` characters, with an ellipsis when cut
fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let mut cut: String = content.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Split a comma-separated answer into lowercase keywords, dropping blanks
pub fn parse_keywords(answer: &str) -> Vec<String> {
    answer
        .split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Score and matched keywords for one candidate
///
/// Each keyword found in the title or content counts once, and each tag
/// containing any keyword counts once more.
fn keyword_match<'k>(keywords: &'k [String], candidate: &Note) -> (f64, Vec<&'k str>) {
    let text = candidate.full_text().to_lowercase();

    let matched: Vec<&str> = keywords
        .iter()
        .filter(|k| text.contains(k.as_str()))
        .map(String::as_str)
        .collect();

    let tag_matches = candidate
        .tags
        .iter()
        .map(|tag| tag.to_lowercase())
        .filter(|tag| keywords.iter().any(|k| tag.contains(k.as_str())))
        .count();

    let score = ((matched.len() + tag_matches) as f64 / keywords.len() as f64).min(1.0);
    (score, matched)
}

fn reason(matched: &[&str]) -> String {
    if matched.is_empty() {
        return "Similar content".to_string();
    }
    let shown: Vec<&str> = matched.iter().take(MAX_REASON_KEYWORDS).copied().collect();
    format!("Shares: {}", shown.join(", "))
}
