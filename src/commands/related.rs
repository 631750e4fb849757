//! `notesmith related` - rank the corpus against one note

use std::path::Path;

use serde_json::Value;
use tracing::debug;

use crate::cli::EngineKind;
use crate::commands::dispatch::{trace_command, CommandContext};
use notesmith_core::config::SimilarityConfig;
use notesmith_core::error::Result;
use notesmith_core::format::{result_json, result_line, OutputFormat};
use notesmith_core::hybrid::HybridSimilarityService;
use notesmith_core::similarity::{
    OptimizedSimilarityEngine, RankingPipeline, SimilarityEngine, SimilarityResult,
};
use notesmith_core::store::{JsonNoteStore, NoteSource};

pub struct RelatedOptions<'a> {
    pub id: &'a str,
    pub corpus: &'a Path,
    pub limit: usize,
    pub engine: EngineKind,
    pub offline: bool,
}

/// Build the pipeline selected on the command line
pub fn build_pipeline(
    config: &SimilarityConfig,
    engine: EngineKind,
    offline: bool,
) -> Box<dyn RankingPipeline> {
    match engine {
        EngineKind::Full => Box::new(SimilarityEngine::new(config.ranking.clone())),
        EngineKind::Optimized => Box::new(OptimizedSimilarityEngine::from_config(config)),
        EngineKind::Hybrid => {
            let service = HybridSimilarityService::from_config(config);
            if offline {
                Box::new(service.offline())
            } else {
                Box::new(service)
            }
        }
    }
}

pub fn execute(ctx: &CommandContext, options: RelatedOptions) -> Result<()> {
    let notes = JsonNoteStore::new(options.corpus).load_notes()?;
    trace_command!(ctx.cli, ctx.start, "load_corpus");

    let target = super::find_in(&notes, options.id)?;
    let pipeline = build_pipeline(ctx.config, options.engine, options.offline);
    debug!(engine = ?options.engine, offline = options.offline, "ranking");

    let results = pipeline.find_similar_notes(target, &notes, options.limit);
    trace_command!(ctx.cli, ctx.start, "rank");

    match ctx.cli.format {
        OutputFormat::Json => {
            let values: Vec<Value> = results.iter().map(result_json).collect();
            println!("{}", serde_json::to_string_pretty(&values)?);
        }
        OutputFormat::Human => print_human(ctx, target.id.as_str(), &results),
    }

    Ok(())
}

fn print_human(ctx: &CommandContext, id: &str, results: &[SimilarityResult<'_>]) {
    if results.is_empty() {
        if !ctx.cli.quiet {
            println!("No related notes found for {}", id);
        }
        return;
    }

    for result in results {
        println!("{}", result_line(result));
        if let Some(reason) = &result.reason {
            if !ctx.cli.quiet {
                println!("    {}", reason);
            }
        }
    }
}
