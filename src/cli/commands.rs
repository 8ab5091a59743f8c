//! Top-level kotoba commands

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import a zipped dictionary package
    Import(ImportArgs),

    /// List imported dictionaries
    List,

    /// Show record counts per dictionary
    Counts(CountsArgs),

    /// Delete one dictionary and all of its records
    Delete(DeleteArgs),

    /// Remove every dictionary from the store
    Purge,

    /// Look up terms by expression or reading
    Term(TermArgs),

    /// Look up kanji by character
    Kanji(KanjiArgs),

    /// Show a tag as defined by one dictionary
    Tag(TagArgs),
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Path to the dictionary package (.zip)
    pub archive: PathBuf,

    /// Stop at the first failed insert chunk instead of collecting failures
    #[arg(long)]
    pub fail_fast: bool,
}

#[derive(Args, Debug)]
pub struct CountsArgs {
    /// Dictionary title (repeatable); all dictionaries when omitted
    #[arg(long = "title", short = 't')]
    pub titles: Vec<String>,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Title of the dictionary to delete
    pub title: String,
}

#[derive(Args, Debug)]
pub struct TermArgs {
    /// Expressions or readings to look up
    #[arg(required = true)]
    pub terms: Vec<String>,

    /// Restrict to these dictionaries (repeatable)
    #[arg(long = "dict", short = 'd')]
    pub dictionaries: Vec<String>,

    /// Follow sequence numbers of matches within this dictionary
    #[arg(long)]
    pub sequence_from: Option<String>,
}

#[derive(Args, Debug)]
pub struct KanjiArgs {
    /// Characters to look up
    #[arg(required = true)]
    pub characters: Vec<String>,

    /// Restrict to these dictionaries (repeatable)
    #[arg(long = "dict", short = 'd')]
    pub dictionaries: Vec<String>,
}

#[derive(Args, Debug)]
pub struct TagArgs {
    /// Tag name
    pub name: String,

    /// Dictionary whose definition to show
    #[arg(long = "dict", short = 'd')]
    pub dictionary: String,
}
