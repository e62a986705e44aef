//! Modify command implementation.

use icw_core::PropertyChangeSet;

use super::{CommandContext, Result};

/// Executes the modify command: decodes the tokens, applies them to the
/// item with the given id and writes the file back. The whole token
/// list validates before anything is mutated.
pub fn execute(ctx: &CommandContext, id: usize, tokens: &[String]) -> Result<()> {
    let changes = PropertyChangeSet::decode(tokens, &ctx.syntax)?;

    let mut store = ctx.load_store()?;
    let mut item = store.get(id)?.clone();
    changes.apply(&mut item);
    store.save(&item)?;

    if !ctx.quiet {
        println!("Modified todo {id} (\"{}\").", item.summary);
    }
    Ok(())
}
