//! Output format handling
//!
//! - human: readable, one line per result
//! - json: stable, machine-readable

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::NoteSmithError;
use crate::similarity::{Breakdown, SimilarityResult};

/// Output format for notesmith commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for machine consumption
    Json,
}

impl FromStr for OutputFormat {
    type Err = NoteSmithError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            other => Err(NoteSmithError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Human line for a ranked result: `"{id}  {title} - {explanation}"`
pub fn result_line(result: &SimilarityResult<'_>) -> String {
    format!("{}  {}", result.note.id, result)
}

/// JSON object for a ranked result
pub fn result_json(result: &SimilarityResult<'_>) -> Value {
    let mut value = json!({
        "id": result.note.id,
        "title": result.note.title,
        "score": result.score,
        "breakdown": breakdown_json(&result.breakdown),
    });
    if let (Some(reason), Some(obj)) = (&result.reason, value.as_object_mut()) {
        obj.insert("reason".to_string(), Value::String(reason.clone()));
    }
    value
}

/// JSON array of `{signal, score}` entries in breakdown order
pub fn breakdown_json(breakdown: &Breakdown) -> Value {
    Value::Array(
        breakdown
            .iter()
            .map(|entry| json!({ "signal": entry.signal.label(), "score": entry.score }))
            .collect(),
    )
}
