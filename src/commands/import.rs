//! `kotoba import` - import a dictionary package

use serde_json::json;

use crate::cli::commands::ImportArgs;
use crate::cli::output::print_json;
use crate::commands::dispatch::CommandContext;
use crate::output_by_format;
use kotoba_core::error::{KotobaError, Result};
use kotoba_core::import::ImportProgress;

pub fn execute(ctx: &CommandContext, args: &ImportArgs) -> Result<()> {
    let store = ctx.open_store()?;
    let show_progress = ctx.show_progress();

    let mut last_reported = -1.0;
    let mut report = |p: ImportProgress| {
        // Redraw only on whole-percent changes
        let percent = if p.total == 0 {
            100.0
        } else {
            (p.current / p.total as f64 * 100.0).floor()
        };
        if percent > last_reported {
            last_reported = percent;
            eprint!("\rImporting... {:>3}% ({:.1}/{} banks)", percent, p.current, p.total);
        }
    };
    let progress: Option<&mut dyn FnMut(ImportProgress)> = if show_progress {
        Some(&mut report)
    } else {
        None
    };

    let result = store.import_file(&args.archive, progress, !args.fail_fast);
    if show_progress && last_reported >= 0.0 {
        eprintln!();
    }
    let result = result?;

    output_by_format!(ctx.cli.format,
        json => {
            let errors: Vec<_> = result.errors.iter().map(KotobaError::to_json).collect();
            print_json(&json!({
                "summary": result.summary,
                "errors": errors,
            }))?;
        },
        human => {
            let s = &result.summary;
            if !ctx.cli.quiet {
                println!(
                    "Imported {} (revision {}, format {}{})",
                    s.title,
                    s.revision,
                    s.version,
                    if s.sequenced { ", sequenced" } else { "" }
                );
            }
            for error in &result.errors {
                eprintln!("warning: {}", error);
            }
        }
    );

    if result.is_partial() {
        return Err(KotobaError::FailedOperation {
            operation: "import".to_string(),
            reason: format!(
                "{} chunk(s) failed; delete and re-import \"{}\"",
                result.errors.len(),
                result.summary.title
            ),
        });
    }

    Ok(())
}
