//! `notesmith compare` - full signal breakdown for a pair of notes

use std::path::Path;

use serde_json::json;

use crate::commands::dispatch::{trace_command, CommandContext};
use notesmith_core::error::Result;
use notesmith_core::format::{breakdown_json, OutputFormat};
use notesmith_core::similarity::{CorpusStats, SimilarityEngine, SimilarityResult};
use notesmith_core::store::{JsonNoteStore, NoteSource};

pub fn execute(ctx: &CommandContext, id: &str, other: &str, corpus: &Path) -> Result<()> {
    let notes = JsonNoteStore::new(corpus).load_notes()?;
    trace_command!(ctx.cli, ctx.start, "load_corpus");

    let source = super::find_in(&notes, id)?;
    let target = super::find_in(&notes, other)?;

    let engine = SimilarityEngine::new(ctx.config.ranking.clone());
    let stats = CorpusStats::build(&notes);
    let breakdown = engine.score_pair(&stats, source, target);
    let score = engine.composite(&breakdown);

    match ctx.cli.format {
        OutputFormat::Json => {
            let value = json!({
                "source": source.id,
                "target": target.id,
                "score": score,
                "breakdown": breakdown_json(&breakdown),
            });
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
        OutputFormat::Human => {
            let weights = &ctx.config.ranking.weights;
            println!("{} ({}) vs {} ({})", source.id, source.title, target.id, target.title);
            for entry in breakdown.iter() {
                println!(
                    "  {:<14} {:>6.3}  x {:.2}",
                    entry.signal.label(),
                    entry.score,
                    weights.weight(entry.signal)
                );
            }
            println!("  {:<14} {:>6.3}", "Composite", score);
            if !ctx.cli.quiet {
                let result = SimilarityResult::new(target, score, breakdown);
                println!();
                print!("{}", result.detailed_explanation());
            }
        }
    }

    Ok(())
}
