//! `kotoba list` - list imported dictionaries

use crate::cli::output::print_json;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format;
use kotoba_core::error::Result;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let store = ctx.open_store()?;
    let summaries = store.db().summarize()?;

    output_by_format!(ctx.cli.format,
        json => {
            print_json(&summaries)?;
        },
        human => {
            if summaries.is_empty() {
                if !ctx.cli.quiet {
                    println!("No dictionaries imported");
                }
            } else {
                for s in &summaries {
                    println!(
                        "{}  revision {}  format {}{}",
                        s.title,
                        s.revision,
                        s.version,
                        if s.sequenced { "  sequenced" } else { "" }
                    );
                }
            }
        }
    );

    Ok(())
}
