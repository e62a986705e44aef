//! Cleanup command implementation.

use super::{CommandContext, Result};

/// Executes the cleanup command: deletes every completed or cancelled
/// todo in a list. Without `--yes` the candidates are listed and
/// nothing is removed.
pub fn execute(ctx: &CommandContext, list: &str, yes: bool) -> Result<()> {
    let mut store = ctx.load_store()?;
    let list = store.resolve_list(list)?;

    if !yes {
        let finished: Vec<String> = store
            .items()
            .iter()
            .filter(|item| {
                item.list == list && matches!(item.status.as_str(), "completed" | "cancelled")
            })
            .map(|item| format!("  {} \"{}\"", item.id, item.summary))
            .collect();
        if finished.is_empty() {
            println!("Nothing to clean up in list {list}.");
        } else {
            println!("Would delete {} finished todo(s) from {list}:", finished.len());
            for line in finished {
                println!("{line}");
            }
            println!("Pass --yes to delete them.");
        }
        return Ok(());
    }

    let removed = store.cleanup(&list)?;
    if !ctx.quiet {
        println!("Removed {removed} finished todo(s) from list {list}.");
    }
    if removed > 0 {
        ctx.warn_ids_changed();
    }
    Ok(())
}
