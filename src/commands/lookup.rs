//! `kotoba term`, `kotoba kanji`, `kotoba tag` - store lookups

use std::collections::{BTreeSet, HashSet};

use serde_json::{json, Value};

use crate::cli::commands::{KanjiArgs, TagArgs, TermArgs};
use crate::cli::output::print_json;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format;
use kotoba_core::db::Database;
use kotoba_core::error::{KotobaError, Result};
use kotoba_core::model::{KanjiEntry, TermEntry};

/// Requested dictionaries, or every imported one
fn resolve_titles(db: &Database, requested: &[String]) -> Result<HashSet<String>> {
    if requested.is_empty() {
        Ok(db.summarize()?.into_iter().map(|s| s.title).collect())
    } else {
        Ok(requested.iter().cloned().collect())
    }
}

fn gloss_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn print_term(entry: &TermEntry) {
    let reading = if entry.reading.is_empty() || entry.reading == entry.expression {
        String::new()
    } else {
        format!(" [{}]", entry.reading)
    };
    let tags = if entry.definition_tags.is_empty() {
        String::new()
    } else {
        format!(" ({})", entry.definition_tags.join(", "))
    };
    println!("{}{}{}  <{}>", entry.expression, reading, tags, entry.dictionary);
    let glosses: Vec<String> = entry.glossary.iter().map(gloss_text).collect();
    println!("    {}", glosses.join("; "));
}

fn print_kanji(entry: &KanjiEntry) {
    println!("{}  <{}>", entry.character, entry.dictionary);
    if !entry.onyomi.is_empty() {
        println!("    on:  {}", entry.onyomi.join(" "));
    }
    if !entry.kunyomi.is_empty() {
        println!("    kun: {}", entry.kunyomi.join(" "));
    }
    println!("    {}", entry.glossary.join("; "));
}

pub fn execute_term(ctx: &CommandContext, args: &TermArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let db = store.db();
    let titles = resolve_titles(db, &args.dictionaries)?;

    let mut terms = db.find_terms_bulk(&args.terms, &titles)?;
    terms.sort_by_key(|t| (t.index, t.id));
    let mut meta = db.find_term_meta_bulk(&args.terms, &titles)?;
    meta.sort_by_key(|m| (m.index, m.id));

    let related = match &args.sequence_from {
        Some(main) => {
            let found: HashSet<i64> = terms.iter().map(|t| t.id).collect();
            let sequences: Vec<i64> = terms
                .iter()
                .filter(|t| &t.dictionary == main && t.sequence >= 0)
                .map(|t| t.sequence)
                .collect::<BTreeSet<_>>()
                .into_iter()
                .collect();
            let mut related = db.find_terms_by_sequence_bulk(&sequences, main)?;
            related.retain(|t| !found.contains(&t.id));
            related.sort_by_key(|t| (t.sequence, t.id));
            related
        }
        None => Vec::new(),
    };

    output_by_format!(ctx.cli.format,
        json => {
            print_json(&json!({
                "terms": terms,
                "meta": meta,
                "related": related,
            }))?;
        },
        human => {
            if terms.is_empty() && !ctx.cli.quiet {
                println!("No terms found");
            }
            for entry in &terms {
                print_term(entry);
            }
            for m in &meta {
                println!("{} {}: {}  <{}>", m.expression, m.mode, m.data, m.dictionary);
            }
            if !related.is_empty() {
                println!();
                println!("Related:");
                for entry in &related {
                    print_term(entry);
                }
            }
        }
    );

    Ok(())
}

pub fn execute_kanji(ctx: &CommandContext, args: &KanjiArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let db = store.db();
    let titles = resolve_titles(db, &args.dictionaries)?;

    let mut kanji = db.find_kanji_bulk(&args.characters, &titles)?;
    kanji.sort_by_key(|k| (k.index, k.id));
    let mut meta = db.find_kanji_meta_bulk(&args.characters, &titles)?;
    meta.sort_by_key(|m| (m.index, m.id));

    output_by_format!(ctx.cli.format,
        json => {
            print_json(&json!({"kanji": kanji, "meta": meta}))?;
        },
        human => {
            if kanji.is_empty() && !ctx.cli.quiet {
                println!("No kanji found");
            }
            for entry in &kanji {
                print_kanji(entry);
            }
            for m in &meta {
                println!("{} {}: {}  <{}>", m.character, m.mode, m.data, m.dictionary);
            }
        }
    );

    Ok(())
}

pub fn execute_tag(ctx: &CommandContext, args: &TagArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let tag = store
        .db()
        .find_tag_for_title(&args.name, &args.dictionary)?
        .ok_or_else(|| {
            KotobaError::not_found("tag", format!("{} in {}", args.name, args.dictionary))
        })?;

    output_by_format!(ctx.cli.format,
        json => {
            print_json(&tag)?;
        },
        human => {
            println!("{}  [{}]  <{}>", tag.name, tag.category, tag.dictionary);
            if !tag.notes.is_empty() {
                println!("    {}", tag.notes);
            }
        }
    );

    Ok(())
}
