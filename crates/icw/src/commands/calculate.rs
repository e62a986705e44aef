//! Calculate command implementation.

use icw_core::decode_date;

use super::{CommandContext, Result};

/// Executes the calculate command: evaluates a date expression and
/// prints the resulting date or date-time in the configured format.
pub fn execute(ctx: &CommandContext, expression: &str) -> Result<()> {
    let result = decode_date(expression, &ctx.syntax)?;
    println!("{}", result.format(&ctx.syntax));
    Ok(())
}
