//! External semantic scorer boundary
//!
//! The hybrid service treats every scorer as unreliable: calls run on their
//! own thread through [`SemanticTask`] with a deadline, and any
//! [`SemanticError`] means "no external results".

pub mod gemini;
pub mod keyword;
pub mod linking;

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use thiserror::Error;
use tracing::{info, warn};

use crate::config::{SemanticProvider, SimilarityConfig};
use crate::note::Note;

pub use gemini::{GeminiClient, TextGenerator};
pub use keyword::KeywordScorer;
pub use linking::SmartLinkingScorer;

/// One related note suggested by an external scorer
#[derive(Debug, Clone, PartialEq)]
pub struct ExternalRelation {
    /// Id of the suggested note
    pub note_id: String,
    /// Similarity in `[0, 1]`
    pub score: f64,
    /// Short free-text justification
    pub reason: String,
}

impl ExternalRelation {
    pub fn new(note_id: impl Into<String>, score: f64, reason: impl Into<String>) -> Self {
        ExternalRelation {
            note_id: note_id.into(),
            score,
            reason: reason.into(),
        }
    }
}

/// Failures of the external scorer
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SemanticError {
    #[error("semantic features are disabled")]
    Disabled,

    #[error("API key not configured")]
    NotConfigured,

    #[error("failed to reach semantic service: {0}")]
    Transport(String),

    #[error("semantic service returned HTTP {code}: {body}")]
    Status { code: u16, body: String },

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("semantic scorer timed out after {0:?}")]
    Timeout(Duration),

    #[error("semantic scorer worker exited without a result")]
    WorkerLost,
}

/// A source of related-note suggestions outside the local ranking
pub trait SemanticScorer: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Suggest notes from `candidates` related to `target`
    ///
    /// The target is skipped if it appears among the candidates.
    fn find_related(
        &self,
        target: &Note,
        candidates: &[Note],
    ) -> Result<Vec<ExternalRelation>, SemanticError>;
}

/// A scorer call running on a background thread
pub struct SemanticTask {
    receiver: mpsc::Receiver<Result<Vec<ExternalRelation>, SemanticError>>,
}

impl SemanticTask {
    /// Start the scorer on a dedicated thread
    pub fn spawn(scorer: Arc<dyn SemanticScorer>, target: Note, candidates: Vec<Note>) -> Self {
        let (sender, receiver) = mpsc::channel();

        let spawned = thread::Builder::new()
            .name("semantic-scorer".to_string())
            .spawn(move || {
                let result = scorer.find_related(&target, &candidates);
                // The receiver may have given up already
                let _ = sender.send(result);
            });

        // A failed spawn drops the sender, which `wait` reports as WorkerLost
        if let Err(e) = spawned {
            warn!(error = %e, "failed to spawn semantic scorer thread");
        }

        SemanticTask { receiver }
    }

    /// Block until the scorer answers or `timeout` passes
    ///
    /// A timed-out worker is left to finish on its own; its result is
    /// discarded.
    pub fn wait(self, timeout: Duration) -> Result<Vec<ExternalRelation>, SemanticError> {
        match self.receiver.recv_timeout(timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(SemanticError::Timeout(timeout)),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(SemanticError::WorkerLost),
        }
    }
}

/// Build the configured scorer, or `None` when semantic enhancement is off
///
/// The Gemini provider without a usable API key falls back to the offline
/// keyword scorer.
pub fn scorer_from_config(config: &SimilarityConfig) -> Option<Arc<dyn SemanticScorer>> {
    if !config.hybrid.enabled {
        return None;
    }

    let semantic = &config.semantic;
    let scorer: Arc<dyn SemanticScorer> = match semantic.provider {
        SemanticProvider::Keyword => Arc::new(KeywordScorer::new(semantic.max_results)),
        SemanticProvider::Gemini if semantic.uses_mock_mode() => {
            info!("no Gemini API key configured, using keyword scorer");
            Arc::new(KeywordScorer::new(semantic.max_results))
        }
        SemanticProvider::Gemini => Arc::new(SmartLinkingScorer::new(
            GeminiClient::from_config(config),
            semantic,
        )),
    };

    Some(scorer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    struct Fixed(Vec<ExternalRelation>);

    impl SemanticScorer for Fixed {
        fn name(&self) -> &'static str {
            "fixed"
        }

        fn find_related(
            &self,
            _target: &Note,
            _candidates: &[Note],
        ) -> Result<Vec<ExternalRelation>, SemanticError> {
            Ok(self.0.clone())
        }
    }

    struct Sleepy;

    impl SemanticScorer for Sleepy {
        fn name(&self) -> &'static str {
            "sleepy"
        }

        fn find_related(
            &self,
            _target: &Note,
            _candidates: &[Note],
        ) -> Result<Vec<ExternalRelation>, SemanticError> {
            thread::sleep(Duration::from_millis(500));
            Ok(Vec::new())
        }
    }

    struct Panicky;

    impl SemanticScorer for Panicky {
        fn name(&self) -> &'static str {
            "panicky"
        }

        fn find_related(
            &self,
            _target: &Note,
            _candidates: &[Note],
        ) -> Result<Vec<ExternalRelation>, SemanticError> {
            panic!("scorer crashed");
        }
    }

    fn target() -> Note {
        Note::new("t", "Target", "content")
    }

    #[test]
    fn test_task_returns_scorer_result() {
        let relations = vec![ExternalRelation::new("a", 0.5, "Shares: rust")];
        let task = SemanticTask::spawn(Arc::new(Fixed(relations.clone())), target(), Vec::new());
        assert_eq!(task.wait(Duration::from_secs(5)).unwrap(), relations);
    }

    #[test]
    fn test_task_times_out() {
        let start = Instant::now();
        let task = SemanticTask::spawn(Arc::new(Sleepy), target(), Vec::new());
        let err = task.wait(Duration::from_millis(20)).unwrap_err();

        assert!(matches!(err, SemanticError::Timeout(_)));
        assert!(start.elapsed() < Duration::from_millis(450));
    }

    #[test]
    fn test_task_reports_lost_worker() {
        let task = SemanticTask::spawn(Arc::new(Panicky), target(), Vec::new());
        assert_eq!(
            task.wait(Duration::from_secs(5)).unwrap_err(),
            SemanticError::WorkerLost
        );
    }

    #[test]
    fn test_scorer_from_config_disabled() {
        let mut config = SimilarityConfig::default();
        config.hybrid.enabled = false;
        assert!(scorer_from_config(&config).is_none());
    }

    #[test]
    fn test_scorer_from_config_mock_mode() {
        let config = SimilarityConfig::default();
        let scorer = scorer_from_config(&config).unwrap();
        assert_eq!(scorer.name(), "keyword");
    }

    #[test]
    fn test_scorer_from_config_gemini() {
        let mut config = SimilarityConfig::default();
        config.semantic.api_key = "test-key".to_string();
        let scorer = scorer_from_config(&config).unwrap();
        assert_eq!(scorer.name(), "smart-linking");
    }
}
