//! Command dispatch logic for notesmith

use std::time::Instant;

use crate::cli::{Cli, Commands};
use notesmith_core::config::SimilarityConfig;
use notesmith_core::error::Result;

mod command;
mod macros;

pub(crate) use command::{Command, CommandContext};
pub(crate) use macros::{trace_command, trace_command_always};

use super::related::RelatedOptions;

pub fn run(cli: &Cli, start: Instant) -> Result<()> {
    let config = SimilarityConfig::resolve(cli.config.as_deref())?;

    trace_command_always!(start, "resolve_config");

    let ctx = CommandContext::new(cli, &config, start);
    cli.command.execute(&ctx)
}

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Related {
                id,
                corpus,
                limit,
                engine,
                offline,
            } => super::related::execute(
                ctx,
                RelatedOptions {
                    id,
                    corpus,
                    limit: *limit,
                    engine: *engine,
                    offline: *offline,
                },
            ),
            Commands::Compare { id, other, corpus } => {
                super::compare::execute(ctx, id, other, corpus)
            }
            Commands::Config => super::config::execute(ctx),
        }
    }
}
