//! Constraint filter parser and evaluator.
//!
//! This module turns a sequence of raw constraint tokens into a
//! normalized boolean expression over property predicates, and
//! evaluates that expression against candidate todo items.
//!
//! # Supported Syntax
//!
//! ## Property predicates
//! - `due.before:friday` - property, operator and literal value
//! - `status:completed` - the operator defaults to `equals`
//! - `sum.cont:report` - property and operator names may be abbreviated
//!   to any unambiguous prefix
//!
//! ## Category shorthand
//! - `+work` - categories contain `work`
//! - `_home` - categories do not contain `home`
//!
//! ## Boolean operators
//! - `and`, `or` - as their own tokens between predicates
//! - two adjacent predicates are joined by an implicit `and`
//!
//! `and` binds tighter than `or`; there is no grouping and no negation
//! beyond the `not_*` operators.
//!
//! # Example
//!
//! ```
//! use icw_core::config::Syntax;
//! use icw_core::filter::ConstraintExpression;
//!
//! let syntax = Syntax::default();
//! let tokens = ["status:needs-action".to_string(), "+work".to_string()];
//! let expr = ConstraintExpression::parse(&tokens, &syntax).unwrap();
//! assert_eq!(expr.predicate_count(), 2);
//! ```

mod ast;
mod error;
mod evaluator;
mod parser;

pub use ast::{ConstraintElement, ConstraintExpression, LogicalRelation, PropertyPredicate};
pub use error::{FilterError, FilterResult};
pub use parser::{DATE_OPERATORS, INT_OPERATORS, TEXT_OPERATORS};

#[cfg(test)]
mod tests;
