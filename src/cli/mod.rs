//! CLI argument parsing for kotoba
//!
//! Global flags: --store, --format, --quiet, --verbose, --log-level, --log-json

pub mod commands;
pub mod output;

use clap::Parser;
use std::path::PathBuf;

pub use commands::Commands;
pub use output::OutputFormat;

/// Kotoba - local dictionary store with bulk lookups
#[derive(Parser, Debug)]
#[command(name = "kotoba")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Store directory (defaults to $KOTOBA_STORE, then the platform data directory)
    #[arg(long, global = true, env = "KOTOBA_STORE")]
    pub store: Option<PathBuf>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug-level logging and phase timings
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log filter, a level (`info`) or directives (`kotoba_core=trace`)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["kotoba", "list", "--format", "json", "--store", "/tmp/s"])
            .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.store, Some(PathBuf::from("/tmp/s")));
        assert!(matches!(cli.command, Some(Commands::List)));
    }

    #[test]
    fn test_term_requires_keys() {
        assert!(Cli::try_parse_from(["kotoba", "term"]).is_err());
        let cli = Cli::try_parse_from(["kotoba", "term", "打つ", "うつ", "-d", "JMdict"]).unwrap();
        match cli.command {
            Some(Commands::Term(args)) => {
                assert_eq!(args.terms, vec!["打つ", "うつ"]);
                assert_eq!(args.dictionaries, vec!["JMdict"]);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
