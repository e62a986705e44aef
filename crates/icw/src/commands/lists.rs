//! List management commands: lists, newlist and droplist.

use super::{CommandContext, Result};

/// Prints every list with its todo count.
pub fn lists(ctx: &CommandContext) -> Result<()> {
    let store = ctx.load_store()?;
    if store.lists().is_empty() {
        println!("No lists yet. Create one with \"icw newlist <name>\".");
        return Ok(());
    }
    for list in store.lists() {
        let count = store.items().iter().filter(|i| &i.list == list).count();
        println!("{list} ({count})");
    }
    Ok(())
}

/// Creates a new, empty list.
pub fn newlist(ctx: &CommandContext, name: &str) -> Result<()> {
    let mut store = ctx.load_store()?;
    store.new_list(name)?;
    if !ctx.quiet {
        println!("Created list {name}.");
    }
    Ok(())
}

/// Deletes a list and everything in it. Without `--yes` the list's
/// content is summarized and nothing is removed.
pub fn droplist(ctx: &CommandContext, name: &str, yes: bool) -> Result<()> {
    let mut store = ctx.load_store()?;
    let list = store.resolve_list(name)?;
    let count = store.items().iter().filter(|i| i.list == list).count();

    if !yes {
        println!("Would delete list {list} and the {count} todo(s) in it.");
        println!("Pass --yes to delete it.");
        return Ok(());
    }

    store.drop_list(&list)?;
    if !ctx.quiet {
        println!("Deleted list {list} and {count} todo(s).");
    }
    ctx.warn_ids_changed();
    Ok(())
}
