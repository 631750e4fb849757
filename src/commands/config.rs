//! `notesmith config` - print the effective configuration

use crate::commands::dispatch::CommandContext;
use notesmith_core::error::Result;
use notesmith_core::format::OutputFormat;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let shown = ctx.config.redacted();

    match ctx.cli.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&shown)?),
        OutputFormat::Human => print!("{}", shown.to_toml()?),
    }

    Ok(())
}
