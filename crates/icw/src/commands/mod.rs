//! Command implementations for the icw CLI.
//!
//! Each submodule holds one command handler. Handlers load a fresh
//! snapshot from the lists directory, run the core engines against it,
//! and write back the affected files.

pub mod add;
pub mod calculate;
pub mod cleanup;
pub mod delete;
pub mod done;
pub mod export;
pub mod info;
pub mod lists;
pub mod modify;
pub mod mv;
pub mod report;
pub mod show;

use std::path::PathBuf;

use icw_core::{
    ChangeError, Config, ConfigError, ConstraintExpression, DateError, FilterError, StoreError,
    Syntax, TodoStore,
};

use crate::cli::Cli;

/// Error type for command execution.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Store error.
    #[error("{0}")]
    Store(#[from] StoreError),

    /// Filter expression error.
    #[error("{0}")]
    Filter(#[from] FilterError),

    /// Property assignment error.
    #[error("{0}")]
    Change(#[from] ChangeError),

    /// Date expression error.
    #[error("{0}")]
    Date(#[from] DateError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid command usage.
    #[error("{0}")]
    Usage(String),
}

/// Result type for command execution.
pub type Result<T> = std::result::Result<T, CommandError>;

/// Context for command execution, containing common dependencies.
pub struct CommandContext {
    /// The loaded configuration.
    pub config: Config,
    /// Input syntax settings derived from the configuration.
    pub syntax: Syntax,
    /// Whether to use colors.
    pub use_colors: bool,
    /// Whether to be quiet (errors only).
    pub quiet: bool,
}

impl CommandContext {
    /// Creates a command context from CLI arguments, loading the
    /// configuration file.
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let path: PathBuf = match &cli.config {
            Some(path) => path.clone(),
            None => Config::default_path()?,
        };
        let config = Config::load(&path)?;
        let syntax = config.syntax();
        Ok(Self {
            config,
            syntax,
            use_colors: !cli.no_color,
            quiet: cli.quiet,
        })
    }

    /// Loads a fresh snapshot of every list.
    pub fn load_store(&self) -> Result<TodoStore> {
        Ok(TodoStore::load(&self.config.lists_dir)?)
    }

    /// Parses CLI constraint tokens together with a report's configured
    /// constraint, joined by an `and`.
    pub fn parse_constraints(
        &self,
        cli_tokens: &[String],
        configured: Option<&str>,
    ) -> Result<ConstraintExpression> {
        let mut tokens: Vec<String> = cli_tokens.to_vec();
        if let Some(configured) = configured {
            let extra: Vec<String> = configured.split_whitespace().map(str::to_string).collect();
            if !extra.is_empty() {
                if !tokens.is_empty() {
                    tokens.push("and".to_string());
                }
                tokens.extend(extra);
            }
        }
        Ok(ConstraintExpression::parse(&tokens, &self.syntax)?)
    }

    /// Prints the reminder that snapshot ids are stale after a
    /// mutation.
    pub fn warn_ids_changed(&self) {
        if !self.quiet {
            println!("Todo ids may have changed. Run a report to see current ids.");
        }
    }
}
