//! Common helper functions for output formatting.

use chrono::Local;
use icw_core::dates::DateValue;
use owo_colors::OwoColorize;

/// Truncates a string to a maximum length.
pub fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    } else {
        s.to_string()
    }
}

/// Colors a rendered row by its due date: overdue red, due today
/// yellow, everything else unchanged.
pub fn colorize_by_due(line: &str, due: Option<DateValue>, use_colors: bool) -> String {
    if !use_colors {
        return line.to_string();
    }
    let Some(due) = due else {
        return line.to_string();
    };

    let today = Local::now().date_naive();
    if due.date() < today {
        line.red().to_string()
    } else if due.date() == today {
        line.yellow().to_string()
    } else {
        line.to_string()
    }
}

/// Dims a header line when colors are enabled.
pub fn dim_header(line: &str, use_colors: bool) -> String {
    if use_colors {
        line.dimmed().to_string()
    } else {
        line.to_string()
    }
}
