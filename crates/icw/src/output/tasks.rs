//! Report table and property listing formatting.

use icw_core::{Syntax, TodoItem};

use super::helpers::{colorize_by_due, dim_header, truncate_str};

/// Renders todos as a column table. Column widths follow the longest
/// cell, capped at `max_column_width`. Rows are colored by due date.
pub fn format_report_table(
    items: &[&TodoItem],
    columns: &[&str],
    syntax: &Syntax,
    use_colors: bool,
    max_column_width: Option<usize>,
) -> String {
    if items.is_empty() {
        return "No todos found.\n".to_string();
    }

    let cap = max_column_width.unwrap_or(usize::MAX);
    let rows: Vec<Vec<String>> = items
        .iter()
        .map(|item| {
            columns
                .iter()
                .map(|column| truncate_str(&item.display_value(column, syntax), cap))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            rows.iter()
                .map(|row| row[i].chars().count())
                .max()
                .unwrap_or(0)
                .max(column.chars().count())
        })
        .collect();

    let mut output = String::new();
    let header = render_row(columns.iter().map(|c| c.to_string()).collect(), &widths);
    output.push_str(&dim_header(&header, use_colors));
    output.push('\n');

    for (item, row) in items.iter().zip(rows) {
        let line = render_row(row, &widths);
        output.push_str(&colorize_by_due(&line, item.due, use_colors));
        output.push('\n');
    }

    output
}

/// Renders every configured property of one todo as name/value rows.
pub fn format_item_details(item: &TodoItem, columns: &[&str], syntax: &Syntax) -> String {
    let name_width = columns
        .iter()
        .map(|c| c.chars().count())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for column in columns {
        let value = item.display_value(column, syntax);
        output.push_str(&format!("{column:<name_width$}  {value}\n"));
    }
    output
}

fn render_row(cells: Vec<String>, widths: &[usize]) -> String {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    padded.join("  ").trim_end().to_string()
}
