//! Error types and exit codes for notesmith
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage error (bad flags/args, invalid configuration values)
//! - 3: Data error (missing or malformed corpus, unknown note)
//!
//! Ranking itself never fails: degenerate input scores 0 and external scorer
//! failures are absorbed by the hybrid service. These errors only cover the
//! edges of the system (loading, configuration, output).

use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage error - bad flags/args (2)
    Usage = 2,
    /// Data error - missing corpus, unknown note (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Errors that can occur during notesmith operations
#[derive(Error, Debug)]
pub enum NoteSmithError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human or json)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("corpus not found: {path:?}")]
    CorpusNotFound { path: PathBuf },

    #[error("invalid corpus file {path:?}: {reason}")]
    InvalidCorpus { path: PathBuf, reason: String },

    #[error("note not found: {id}")]
    NoteNotFound { id: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("failed to {operation}: {reason}")]
    FailedOperation { operation: String, reason: String },
}

impl NoteSmithError {
    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        NoteSmithError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an error for a corpus file that could not be parsed
    pub fn invalid_corpus(path: impl Into<PathBuf>, reason: impl std::fmt::Display) -> Self {
        NoteSmithError::InvalidCorpus {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Create an error for a failed operation
    pub fn failed(operation: &str, reason: impl std::fmt::Display) -> Self {
        NoteSmithError::FailedOperation {
            operation: operation.to_string(),
            reason: reason.to_string(),
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self {
            NoteSmithError::UnknownFormat(_)
            | NoteSmithError::UsageError(_)
            | NoteSmithError::InvalidValue { .. } => ExitCode::Usage,

            NoteSmithError::CorpusNotFound { .. }
            | NoteSmithError::InvalidCorpus { .. }
            | NoteSmithError::NoteNotFound { .. } => ExitCode::Data,

            NoteSmithError::Io(_)
            | NoteSmithError::Json(_)
            | NoteSmithError::Toml(_)
            | NoteSmithError::TomlSer(_)
            | NoteSmithError::FailedOperation { .. } => ExitCode::Failure,
        }
    }

    /// Get the error type identifier
    pub fn error_type(&self) -> &'static str {
        match self {
            NoteSmithError::UnknownFormat(_) => "unknown_format",
            NoteSmithError::UsageError(_) => "usage_error",
            NoteSmithError::InvalidValue { .. } => "invalid_value",
            NoteSmithError::CorpusNotFound { .. } => "corpus_not_found",
            NoteSmithError::InvalidCorpus { .. } => "invalid_corpus",
            NoteSmithError::NoteNotFound { .. } => "note_not_found",
            NoteSmithError::Io(_) => "io_error",
            NoteSmithError::Json(_) => "json_error",
            NoteSmithError::Toml(_) => "toml_error",
            NoteSmithError::TomlSer(_) => "toml_error",
            NoteSmithError::FailedOperation { .. } => "failed_operation",
        }
    }

    /// Convert error to JSON representation for structured error output
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for notesmith operations
pub type Result<T> = std::result::Result<T, NoteSmithError>;
