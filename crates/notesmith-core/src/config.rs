//! Configuration for notesmith
//!
//! Layers, lowest precedence first: built-in defaults, the user file
//! (`~/.notesmith/config.toml`, or an explicit path), then environment
//! variables.

pub mod types;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::{NoteSmithError, Result};

pub use types::{
    HybridConfig, PrefilterConfig, RankingConfig, SemanticConfig, SemanticProvider,
    SignalWeights, SimilarityConfig, PLACEHOLDER_API_KEYS,
};

const CONFIG_DIR: &str = ".notesmith";
const CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "NOTESMITH_CONFIG_DIR";
const REDACTED: &str = "********";

pub const ENV_AI_ENABLED: &str = "NOTESMITH_AI_ENABLED";
pub const ENV_API_KEY: &str = "NOTESMITH_GEMINI_API_KEY";
pub const ENV_MODEL: &str = "NOTESMITH_GEMINI_MODEL";
pub const ENV_TIMEOUT: &str = "NOTESMITH_AI_TIMEOUT";
pub const ENV_PROVIDER: &str = "NOTESMITH_SEMANTIC_PROVIDER";

impl SimilarityConfig {
    /// Default location of the user configuration file
    pub fn default_path() -> Result<PathBuf> {
        // Allow environment variable override for testing
        let config_dir = if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            PathBuf::from(env_dir)
        } else {
            dirs::home_dir()
                .ok_or_else(|| {
                    NoteSmithError::failed("locate config", "unable to determine home directory")
                })?
                .join(CONFIG_DIR)
        };

        Ok(config_dir.join(CONFIG_FILE))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            NoteSmithError::failed("read config", format!("{}: {}", path.display(), e))
        })?;
        let config: SimilarityConfig = toml::from_str(&content)?;
        debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load the user configuration file, or defaults when it does not exist
    pub fn load_default() -> Result<Self> {
        let path = Self::default_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Resolve the effective configuration: file, environment, validation
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => Self::load_default()?,
        };
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides read through `lookup`
    ///
    /// Unparseable values are ignored with a warning.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_AI_ENABLED) {
            match parse_bool(&value) {
                Some(enabled) => self.hybrid.enabled = enabled,
                None => warn!(var = ENV_AI_ENABLED, value = %value, "ignoring invalid boolean"),
            }
        }

        if let Some(key) = lookup(ENV_API_KEY) {
            self.semantic.api_key = key;
        }

        if let Some(model) = lookup(ENV_MODEL) {
            if !model.is_empty() {
                self.semantic.model = model;
            }
        }

        if let Some(timeout) = lookup(ENV_TIMEOUT) {
            match timeout.trim().parse::<u64>() {
                Ok(seconds) => self.hybrid.timeout_seconds = seconds.clamp(1, 120),
                Err(_) => warn!(var = ENV_TIMEOUT, value = %timeout, "ignoring invalid timeout"),
            }
        }

        if let Some(provider) = lookup(ENV_PROVIDER) {
            match provider.parse::<SemanticProvider>() {
                Ok(provider) => self.semantic.provider = provider,
                Err(e) => warn!(var = ENV_PROVIDER, error = %e, "ignoring invalid provider"),
            }
        }
    }

    /// Reject values the ranking code cannot work with
    pub fn validate(&self) -> Result<()> {
        for (signal, weight) in crate::similarity::Signal::LOCAL
            .iter()
            .zip(self.ranking.weights.values())
        {
            if !weight.is_finite() || weight < 0.0 {
                return Err(NoteSmithError::invalid_value(
                    &format!("{} weight", signal),
                    weight,
                ));
            }
        }

        check_unit("ranking.min_score", self.ranking.min_score)?;
        check_unit("prefilter.threshold", self.prefilter.threshold)?;
        check_unit("prefilter.tag_short_circuit", self.prefilter.tag_short_circuit)?;
        check_unit("hybrid.local_weight", self.hybrid.local_weight)?;
        check_unit("hybrid.external_weight", self.hybrid.external_weight)?;
        check_unit("semantic.min_similarity", self.semantic.min_similarity)?;

        if self.prefilter.max_candidates == 0 {
            return Err(NoteSmithError::invalid_value("prefilter.max_candidates", 0));
        }
        if self.hybrid.max_external_candidates == 0 {
            return Err(NoteSmithError::invalid_value(
                "hybrid.max_external_candidates",
                0,
            ));
        }
        if self.hybrid.timeout_seconds == 0 {
            return Err(NoteSmithError::invalid_value("hybrid.timeout_seconds", 0));
        }
        if self.semantic.max_results == 0 {
            return Err(NoteSmithError::invalid_value("semantic.max_results", 0));
        }
        if !self.semantic.temperature.is_finite() || self.semantic.temperature < 0.0 {
            return Err(NoteSmithError::invalid_value(
                "semantic.temperature",
                self.semantic.temperature,
            ));
        }

        Ok(())
    }

    /// Copy safe to print: a real API key is masked
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if !config.semantic.uses_mock_mode() {
            config.semantic.api_key = REDACTED.to_string();
        }
        config
    }

    /// Render as pretty TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_toml()?)?;
        Ok(())
    }
}

fn check_unit(context: &str, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(NoteSmithError::invalid_value(context, value))
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
