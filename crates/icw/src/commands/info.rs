//! Info command implementation.

use icw_core::dates::{DATE_FORMULA_UNITS, DATE_SYNONYMS};
use icw_core::filter::{DATE_OPERATORS, INT_OPERATORS, TEXT_OPERATORS};
use icw_core::{PropertyKind, Schema};

use crate::cli::InfoTopic;

use super::{CommandContext, Result};

/// Executes the info command.
pub fn execute(ctx: &CommandContext, topic: InfoTopic) -> Result<()> {
    match topic {
        InfoTopic::Properties => properties(),
        InfoTopic::Filter => filter(),
        InfoTopic::Dates => dates(ctx),
    }
    Ok(())
}

fn properties() {
    println!("Supported properties:");
    for name in Schema::supported_properties() {
        match Schema::kind(name) {
            Some(PropertyKind::Date) => println!("  {name:<18} date"),
            Some(PropertyKind::Integer) => println!("  {name:<18} integer"),
            Some(PropertyKind::Enum(values)) => {
                println!("  {name:<18} one of {}", values.join(", "))
            }
            _ => println!("  {name:<18} text"),
        }
    }
    println!("Filter-only context properties:");
    for name in Schema::TEXT_CONTEXT_PROPERTIES {
        println!("  {name:<18} text");
    }
    for name in Schema::INT_CONTEXT_PROPERTIES {
        println!("  {name:<18} integer");
    }
}

fn filter() {
    println!("Constraints take the form property[.operator]:value,");
    println!("joined by \"and\" and \"or\" (\"and\" binds tighter).");
    println!("+x and _x match items with and without category x.");
    println!();
    println!("Operators by property kind:");
    println!("  text     {}", TEXT_OPERATORS.join(", "));
    println!("  integer  {}", INT_OPERATORS.join(", "));
    println!("  date     {}", DATE_OPERATORS.join(", "));
}

fn dates(ctx: &CommandContext) {
    println!("Absolute formats:");
    println!("  date       {}", ctx.syntax.date_format);
    println!("  date-time  {}", ctx.syntax.datetime_format);
    println!();
    println!("Synonyms: {}", DATE_SYNONYMS.join(", "));
    println!("Weekday names resolve to the next occurrence strictly after today.");
    println!();
    println!(
        "Relative expressions may carry a {}{} time suffix and a formula",
        ctx.syntax.relative_time_separator, ctx.syntax.relative_time_format
    );
    println!("of signed offsets, e.g. today+2w-3d.");
    println!("Units: {}", DATE_FORMULA_UNITS.join(", "));
}
