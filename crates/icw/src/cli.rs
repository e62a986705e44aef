//! CLI argument parsing using clap derive macros.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// icw - a command-line todo manager over iCalendar files
#[derive(Parser, Debug)]
#[command(name = "icw")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, env = "ICW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show all todo lists
    Lists,

    /// Create a new todo list
    Newlist {
        /// Name of the new list
        name: String,
    },

    /// Delete a list and every todo in it
    Droplist {
        /// Name of the list to delete
        name: String,

        /// Delete without asking
        #[arg(long)]
        yes: bool,
    },

    /// Add a new todo to a list
    #[command(alias = "a")]
    Add {
        /// Target list (name or unambiguous prefix)
        list: String,

        /// Summary text and property assignments (e.g. "Buy milk" due:friday +errands)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        tokens: Vec<String>,
    },

    /// Modify properties of an existing todo
    #[command(alias = "mod")]
    Modify {
        /// Todo id from the last report
        id: usize,

        /// Property assignments (e.g. due:tomorrow priority: +work)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
        tokens: Vec<String>,
    },

    /// Mark todos as completed
    Done {
        /// Todo ids from the last report
        #[arg(required = true)]
        ids: Vec<usize>,
    },

    /// Delete todos
    #[command(alias = "del")]
    Delete {
        /// Todo ids from the last report
        #[arg(required = true)]
        ids: Vec<usize>,

        /// Delete without asking
        #[arg(long)]
        yes: bool,
    },

    /// Move a todo to another list
    #[command(name = "move", alias = "mv")]
    Move {
        /// Todo id from the last report
        id: usize,

        /// Target list (name or unambiguous prefix)
        list: String,
    },

    /// Show all properties of one todo
    Show {
        /// Todo id from the last report
        id: usize,
    },

    /// List todos matching a report and optional extra constraints
    #[command(alias = "r")]
    Report {
        /// Report name from the configuration (default: "default")
        name: Option<String>,

        /// Extra constraint tokens (e.g. due.before:friday +work or status:completed)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        constraints: Vec<String>,
    },

    /// Delete all completed and cancelled todos from a list
    Cleanup {
        /// Name of the list to clean up
        list: String,

        /// Delete without asking
        #[arg(long)]
        yes: bool,
    },

    /// Print matching todos as JSON
    Export {
        /// Constraint tokens restricting the export
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        constraints: Vec<String>,
    },

    /// Evaluate a date expression and print the result
    #[command(alias = "calc")]
    Calculate {
        /// Date expression (e.g. today+2w-3d or friday@12:00)
        expression: String,
    },

    /// Show supported properties, filter operators or date syntax
    Info {
        /// What to describe
        #[arg(value_enum)]
        topic: InfoTopic,
    },
}

/// Topics for the info command.
#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum InfoTopic {
    /// Supported properties and their kinds
    Properties,
    /// Filter operators per property kind
    Filter,
    /// Date synonyms and formula units
    Dates,
}
