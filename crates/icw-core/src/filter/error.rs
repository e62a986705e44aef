//! Error types for the constraint filter engine.

use thiserror::Error;

use crate::dates::DateError;

/// A specialized Result type for filter operations.
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors that can occur while parsing or evaluating a constraint
/// expression.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FilterError {
    /// A logical relation token appeared where a predicate was
    /// required, or the expression ended on a relation.
    #[error("invalid filter expression: \"{token}\" must follow a property constraint")]
    InvalidExpression {
        /// The misplaced token.
        token: String,
    },

    /// A constraint token carried no `name:value` colon.
    #[error("invalid constraint \"{token}\": expected \"property:value\" or \"property.operator:value\"")]
    InvalidConstraintFormat {
        /// The malformed token.
        token: String,
    },

    /// A property name matched no or several supported properties.
    #[error("unknown or ambiguous property \"{name}\"{}, supported properties are {}", suggestion_suffix(.suggestion), .known.join(", "))]
    UnknownProperty {
        /// The requested property name or prefix.
        name: String,
        /// A close known name, if any.
        suggestion: Option<String>,
        /// All supported filter property names.
        known: Vec<String>,
    },

    /// An operator name matched no or several operators for the
    /// property's kind.
    #[error("unknown or ambiguous operator \"{operator}\" for property \"{property}\", supported operators are {}", .supported.join(", "))]
    UnknownOperator {
        /// The property the operator was applied to.
        property: String,
        /// The requested operator name or prefix.
        operator: String,
        /// Operators valid for the property's kind.
        supported: Vec<String>,
    },

    /// An integer comparison literal was not a number.
    #[error("invalid integer value \"{value}\" for property \"{property}\"")]
    InvalidIntegerLiteral {
        /// The property being compared.
        property: String,
        /// The non-numeric literal.
        value: String,
    },

    /// A date comparison literal failed to decode.
    #[error(transparent)]
    InvalidDate(#[from] DateError),
}

impl FilterError {
    /// Creates an invalid expression error.
    pub fn invalid_expression(token: impl Into<String>) -> Self {
        FilterError::InvalidExpression {
            token: token.into(),
        }
    }

    /// Creates an invalid constraint format error.
    pub fn invalid_constraint_format(token: impl Into<String>) -> Self {
        FilterError::InvalidConstraintFormat {
            token: token.into(),
        }
    }
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean \"{name}\"?)"),
        None => String::new(),
    }
}
