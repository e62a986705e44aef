//! Core logic for the icw todo manager.
//!
//! This crate contains everything the CLI binary builds on:
//!
//! - [`dates`] - the date expression engine (absolute formats, synonyms
//!   such as `today` or `friday`, and `+2w-3d` style formulas)
//! - [`filter`] - the constraint filter engine used to select todos by
//!   property predicates combined with `and`/`or`
//! - [`changeset`] - the property assignment decoder turning raw CLI
//!   tokens into a validated change-set
//! - [`schema`] - the static property table (names, kinds, enum values)
//! - [`item`] - the todo item model and its iCalendar adapter
//! - [`store`] - the list-directory snapshot store
//! - [`config`] - YAML configuration

pub mod changeset;
pub mod config;
pub mod dates;
pub mod filter;
pub mod item;
pub mod schema;
pub mod store;

pub use changeset::{ChangeError, PropertyChangeSet};
pub use config::{Config, ConfigError, Syntax};
pub use dates::{decode_date, expand_prefix, DateError, DateValue};
pub use filter::{ConstraintExpression, FilterError};
pub use item::{ItemError, TodoItem};
pub use schema::{PropertyKind, Schema};
pub use store::{StoreError, TodoStore};
