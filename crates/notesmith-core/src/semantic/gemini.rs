//! Blocking client for the Gemini `generateContent` endpoint

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error};

use crate::config::SimilarityConfig;
use crate::semantic::SemanticError;

/// Longest slice of an error body kept in [`SemanticError::Status`]
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Anything that turns a prompt into text
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> Result<String, SemanticError>;
}

/// HTTP client for the Gemini API
pub struct GeminiClient {
    agent: ureq::Agent,
    enabled: bool,
    api_key: String,
    model: String,
    base_url: String,
    max_output_tokens: u32,
    temperature: f64,
    mock_mode: bool,
}

impl GeminiClient {
    /// Create a client from the effective configuration
    pub fn from_config(config: &SimilarityConfig) -> Self {
        let timeout = Duration::from_secs(config.hybrid.timeout_seconds);
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        let semantic = &config.semantic;
        GeminiClient {
            agent,
            enabled: config.hybrid.enabled,
            api_key: semantic.api_key.trim().to_string(),
            model: semantic.model.clone(),
            base_url: semantic.base_url.clone(),
            max_output_tokens: semantic.max_output_tokens,
            temperature: semantic.temperature,
            mock_mode: semantic.uses_mock_mode(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// JSON request body for a prompt
    pub fn request_body(&self, prompt: &str) -> serde_json::Value {
        serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "maxOutputTokens": self.max_output_tokens,
                "temperature": self.temperature,
            }
        })
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String, SemanticError> {
        if !self.enabled {
            return Err(SemanticError::Disabled);
        }
        if self.mock_mode {
            return Err(SemanticError::NotConfigured);
        }

        let payload = self.request_body(prompt).to_string();
        debug!(model = %self.model, prompt_chars = prompt.len(), "sending Gemini request");

        let mut response = self
            .agent
            .post(&self.endpoint())
            .header("Content-Type", "application/json")
            .send(payload.as_str())
            .map_err(|e| SemanticError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| SemanticError::Transport(e.to_string()))?;

        if !status.is_success() {
            error!(status = status.as_u16(), "Gemini API error");
            return Err(SemanticError::Status {
                code: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        debug!(bytes = body.len(), "received Gemini response");
        parse_response(&body)
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

/// Extract the first candidate's first text part
pub fn parse_response(body: &str) -> Result<String, SemanticError> {
    let response: GenerateResponse = serde_json::from_str(body)
        .map_err(|e| SemanticError::MalformedResponse(e.to_string()))?;

    response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().next())
        .and_then(|part| part.text)
        .ok_or_else(|| SemanticError::MalformedResponse("no text in response".to_string()))
}
