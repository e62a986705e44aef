//! Report command implementation.

use icw_core::TodoItem;

use crate::output::format_report_table;

use super::{CommandContext, Result};

/// Executes the report command: filters the snapshot with the report's
/// configured constraint plus the extra tokens from the command line,
/// sorts by due date and prints a column table.
pub fn execute(ctx: &CommandContext, name: Option<&str>, constraints: &[String]) -> Result<()> {
    let (report_name, report) = ctx.config.report(name.unwrap_or("default"))?;
    let expression = ctx.parse_constraints(constraints, report.constraint.as_deref())?;

    let store = ctx.load_store()?;
    let total = store.items().len();

    let mut matching: Vec<&TodoItem> = Vec::new();
    for item in store.items() {
        if expression.matches(item, &ctx.syntax)? {
            matching.push(item);
        }
    }

    // Due-dated todos first, soonest on top; undated ones keep id order.
    matching.sort_by(|a, b| match (a.due, b.due) {
        (Some(x), Some(y)) => x.as_datetime().cmp(&y.as_datetime()).then(a.id.cmp(&b.id)),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => a.id.cmp(&b.id),
    });

    let shown = match report.max_list_length {
        Some(max) => matching.len().min(max),
        None => matching.len(),
    };
    matching.truncate(shown);

    let columns: Vec<&str> = report
        .columns
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .collect();

    print!(
        "{}",
        format_report_table(
            &matching,
            &columns,
            &ctx.syntax,
            ctx.use_colors,
            report.max_column_width,
        )
    );
    if !ctx.quiet {
        println!("Report {report_name}: showing {shown} out of {total} todos.");
    }
    Ok(())
}
