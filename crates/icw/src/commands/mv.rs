//! Move command implementation.

use super::{CommandContext, Result};

/// Executes the move command: rewrites the todo's file under the target
/// list directory and removes the old file.
pub fn execute(ctx: &CommandContext, id: usize, list: &str) -> Result<()> {
    let mut store = ctx.load_store()?;
    let target = store.resolve_list(list)?;
    let summary = store.get(id)?.summary.clone();
    store.move_item(id, &target)?;

    if !ctx.quiet {
        println!("Moved todo {id} (\"{summary}\") to list {target}.");
    }
    ctx.warn_ids_changed();
    Ok(())
}
