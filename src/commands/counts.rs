//! `kotoba counts` - record counts per dictionary

use serde_json::json;

use crate::cli::commands::CountsArgs;
use crate::cli::output::print_json;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format;
use kotoba_core::error::Result;
use kotoba_core::model::RecordCounts;

fn print_row(label: &str, c: &RecordCounts) {
    println!(
        "{:<24} {:>9} {:>9} {:>9} {:>9} {:>9}",
        label, c.terms, c.term_meta, c.kanji, c.kanji_meta, c.tag_meta
    );
}

pub fn execute(ctx: &CommandContext, args: &CountsArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let db = store.db();

    let titles: Vec<String> = if args.titles.is_empty() {
        db.summarize()?.into_iter().map(|s| s.title).collect()
    } else {
        args.titles.clone()
    };
    let counts = db.get_dictionary_counts(&titles, true)?;

    output_by_format!(ctx.cli.format,
        json => {
            let per_title: Vec<_> = titles
                .iter()
                .zip(&counts.counts)
                .map(|(title, c)| json!({"title": title, "counts": c}))
                .collect();
            print_json(&json!({
                "dictionaries": per_title,
                "total": counts.total,
            }))?;
        },
        human => {
            println!(
                "{:<24} {:>9} {:>9} {:>9} {:>9} {:>9}",
                "dictionary", "terms", "term_meta", "kanji", "kanji_meta", "tags"
            );
            for (title, c) in titles.iter().zip(&counts.counts) {
                print_row(title, c);
            }
            if let Some(total) = &counts.total {
                print_row("(all)", total);
            }
        }
    );

    Ok(())
}
