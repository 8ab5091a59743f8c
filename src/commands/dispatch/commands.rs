//! Routing from parsed commands to their implementations

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{counts, delete, import, list, lookup, purge};
use kotoba_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Import(args) => import::execute(ctx, args),
            Commands::List => list::execute(ctx),
            Commands::Counts(args) => counts::execute(ctx, args),
            Commands::Delete(args) => delete::execute(ctx, args),
            Commands::Purge => purge::execute(ctx),
            Commands::Term(args) => lookup::execute_term(ctx, args),
            Commands::Kanji(args) => lookup::execute_kanji(ctx, args),
            Commands::Tag(args) => lookup::execute_tag(ctx, args),
        }
    }
}
