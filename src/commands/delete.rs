//! `kotoba delete` - delete one dictionary

use serde_json::json;

use crate::cli::commands::DeleteArgs;
use crate::cli::output::print_json;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format;
use kotoba_core::db::DeleteProgress;
use kotoba_core::error::Result;

pub fn execute(ctx: &CommandContext, args: &DeleteArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let show_progress = ctx.show_progress();
    let rate = store.config().delete_rate;

    let mut deleted = 0;
    let mut report = |p: DeleteProgress| {
        deleted = p.processed;
        if show_progress {
            eprint!(
                "\rDeleting... {}/{} rows ({}/{} tables)",
                p.processed, p.count, p.stores_processed, p.store_count
            );
        }
    };
    store
        .db()
        .delete_dictionary(&args.title, rate, Some(&mut report))?;
    if show_progress {
        eprintln!();
    }

    output_by_format!(ctx.cli.format,
        json => {
            print_json(&json!({"deleted": args.title, "rows": deleted}))?;
        },
        human => {
            if !ctx.cli.quiet {
                println!("Deleted {} ({} records)", args.title, deleted);
            }
        }
    );

    Ok(())
}
