//! CLI argument parsing for notesmith
//!
//! Global flags: --config, --format, --quiet, --verbose, --log-level, --log-json

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use notesmith_core::format::OutputFormat;

/// NoteSmith - find the notes most related to a note, and say why
#[derive(Parser, Debug)]
#[command(name = "notesmith")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (default: ~/.notesmith/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (human, json)
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Report timing for major phases
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the notes most related to a note
    Related {
        /// Target note id
        id: String,

        /// Corpus: a JSON file or a directory of JSON files
        #[arg(long, env = "NOTESMITH_CORPUS")]
        corpus: PathBuf,

        /// Maximum number of results
        #[arg(long, short = 'n', default_value_t = 5)]
        limit: usize,

        /// Ranking pipeline
        #[arg(long, value_enum, default_value = "hybrid")]
        engine: EngineKind,

        /// Never call the external scorer
        #[arg(long)]
        offline: bool,
    },

    /// Show every signal for one pair of notes
    Compare {
        /// First note id
        id: String,

        /// Second note id
        other: String,

        /// Corpus: a JSON file or a directory of JSON files
        #[arg(long, env = "NOTESMITH_CORPUS")]
        corpus: PathBuf,
    },

    /// Print the effective configuration
    Config,
}

/// Which ranking pipeline `related` runs
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineKind {
    /// Score every note in the corpus
    Full,
    /// Cheap prefilter, then full scoring of the survivors
    Optimized,
    /// Optimized local ranking plus the external scorer
    Hybrid,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_related_defaults() {
        let cli = Cli::try_parse_from(["notesmith", "related", "n-1", "--corpus", "notes.json"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Human);
        match cli.command {
            Commands::Related {
                limit,
                engine,
                offline,
                ..
            } => {
                assert_eq!(limit, 5);
                assert_eq!(engine, EngineKind::Hybrid);
                assert!(!offline);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_format_is_global() {
        let cli = Cli::try_parse_from(["notesmith", "config", "--format", "json"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_unknown_format_rejected() {
        let err = Cli::try_parse_from(["notesmith", "config", "--format", "xml"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }
}
