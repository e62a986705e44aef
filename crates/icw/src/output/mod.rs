//! Output formatting utilities for the icw CLI.
//!
//! - [`tasks`] - report tables and the show command's property listing
//! - [`helpers`] - common formatting utilities (truncation, due-based
//!   coloring)

pub mod helpers;
mod tasks;

pub use tasks::{format_item_details, format_report_table};
