//! `kotoba purge` - remove every dictionary

use serde_json::json;

use crate::cli::output::print_json;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format;
use kotoba_core::error::Result;

pub fn execute(ctx: &CommandContext) -> Result<()> {
    let mut store = ctx.open_store()?;
    let removed = store.db().summarize()?.len();
    store.db_mut().purge()?;

    output_by_format!(ctx.cli.format,
        json => {
            print_json(&json!({"purged": removed}))?;
        },
        human => {
            if !ctx.cli.quiet {
                println!("Purged {} dictionaries", removed);
            }
        }
    );

    Ok(())
}
