//! Export command implementation.

use serde_json::{json, Value};

use icw_core::TodoItem;

use super::{CommandContext, Result};

/// Executes the export command: prints the matching todos as a JSON
/// array on stdout.
pub fn execute(ctx: &CommandContext, constraints: &[String]) -> Result<()> {
    let expression = ctx.parse_constraints(constraints, None)?;
    let store = ctx.load_store()?;

    let mut exported = Vec::new();
    for item in store.items() {
        if expression.matches(item, &ctx.syntax)? {
            exported.push(item_to_json(item, ctx));
        }
    }

    println!("{}", serde_json::to_string_pretty(&Value::Array(exported))?);
    Ok(())
}

fn item_to_json(item: &TodoItem, ctx: &CommandContext) -> Value {
    json!({
        "id": item.id,
        "uid": item.uid,
        "list": item.list,
        "summary": item.summary,
        "description": item.description,
        "status": item.status,
        "categories": item.categories,
        "due": item.due.map(|d| d.format(&ctx.syntax)),
        "dtstart": item.dtstart.map(|d| d.format(&ctx.syntax)),
        "dtend": item.dtend.map(|d| d.format(&ctx.syntax)),
        "priority": item.priority,
        "percent-complete": item.percent_complete,
    })
}
