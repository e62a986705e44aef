//! Add command implementation.

use icw_core::{PropertyChangeSet, TodoItem};

use super::{CommandContext, CommandError, Result};

/// Executes the add command: decodes the tokens into a change-set,
/// creates a fresh item and writes it to the target list.
pub fn execute(ctx: &CommandContext, list: &str, tokens: &[String]) -> Result<()> {
    let changes = PropertyChangeSet::decode(tokens, &ctx.syntax)?;
    let summary = changes
        .summary()
        .ok_or_else(|| CommandError::Usage("a new todo needs a summary".to_string()))?;

    let mut item = TodoItem::new(summary);
    changes.apply(&mut item);

    let mut store = ctx.load_store()?;
    let list = store.resolve_list(list)?;
    let uid = item.uid.clone();
    store.add(&list, item)?;

    if !ctx.quiet {
        println!("Added \"{summary}\" to list {list} ({uid}).");
    }
    Ok(())
}
