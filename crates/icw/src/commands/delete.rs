//! Delete command implementation.

use super::{CommandContext, Result};

/// Executes the delete command. Without `--yes` the affected todos are
/// listed and nothing is removed.
pub fn execute(ctx: &CommandContext, ids: &[usize], yes: bool) -> Result<()> {
    let mut store = ctx.load_store()?;

    let mut items = Vec::with_capacity(ids.len());
    for id in ids {
        items.push(store.get(*id)?.clone());
    }

    if !yes {
        println!("Would delete {} todo(s):", items.len());
        for item in &items {
            println!("  {} \"{}\" ({})", item.id, item.summary, item.list);
        }
        println!("Pass --yes to delete them.");
        return Ok(());
    }

    for item in items {
        store.delete(&item)?;
        if !ctx.quiet {
            println!("Deleted todo {} (\"{}\").", item.id, item.summary);
        }
    }
    ctx.warn_ids_changed();
    Ok(())
}
