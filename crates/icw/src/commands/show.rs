//! Show command implementation.

use crate::output::format_item_details;

use super::{CommandContext, Result};

/// Executes the show command: prints every configured property of one
/// todo as name/value rows.
pub fn execute(ctx: &CommandContext, id: usize) -> Result<()> {
    let store = ctx.load_store()?;
    let item = store.get(id)?;

    let columns: Vec<&str> = ctx
        .config
        .info_columns
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    print!("{}", format_item_details(item, &columns, &ctx.syntax));
    Ok(())
}
