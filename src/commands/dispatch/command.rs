//! Command trait and context for dispatching commands

use std::time::Instant;

use crate::cli::Cli;
use kotoba_core::error::Result;
use kotoba_core::store::Store;

/// Open the store named by `--store`/`KOTOBA_STORE`, or the default one
pub fn open_store(cli: &Cli) -> Result<Store> {
    let root = match &cli.store {
        Some(path) => path.clone(),
        None => Store::default_root()?,
    };
    Store::open(&root)
}

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, start: Instant) -> Self {
        Self { cli, start }
    }

    pub fn open_store(&self) -> Result<Store> {
        let store = open_store(self.cli)?;
        tracing::debug!(elapsed = ?self.start.elapsed(), root = %store.root().display(), "open_store");
        Ok(store)
    }

    /// Whether progress lines may be written to stderr
    pub fn show_progress(&self) -> bool {
        !self.cli.quiet && self.cli.format == crate::cli::OutputFormat::Human
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("kotoba {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("A local store for zipped dictionary packages.");
        println!();
        println!("Run `kotoba --help` for usage information.");
        Ok(())
    }
}
