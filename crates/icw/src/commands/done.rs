//! Done command implementation.

use super::{CommandContext, Result};

/// Executes the done command: marks each item completed, setting the
/// status, percent-complete and completion timestamp, and writes the
/// files back. All ids resolve before the first write.
pub fn execute(ctx: &CommandContext, ids: &[usize]) -> Result<()> {
    let mut store = ctx.load_store()?;

    let mut items = Vec::with_capacity(ids.len());
    for id in ids {
        items.push(store.get(*id)?.clone());
    }

    for mut item in items {
        item.complete();
        item.touch();
        if !ctx.quiet {
            println!("Completed todo {} (\"{}\").", item.id, item.summary);
        }
        store.save(&item)?;
    }
    Ok(())
}
