//! Token-sequence parser for constraint expressions.

use super::ast::{ConstraintElement, ConstraintExpression, LogicalRelation, PropertyPredicate};
use super::error::{FilterError, FilterResult};
use crate::config::Syntax;
use crate::dates::expand_prefix;
use crate::schema::{PropertyKind, Schema};

/// Operators valid for text and enum properties.
pub const TEXT_OPERATORS: &[&str] = &["contains", "not_contains", "equals", "not_equals"];

/// Operators valid for integer properties.
pub const INT_OPERATORS: &[&str] = &["gt", "geq", "lt", "leq", "equals", "not_equals"];

/// Operators valid for date properties.
pub const DATE_OPERATORS: &[&str] = &["before", "after", "equals"];

impl ConstraintExpression {
    /// Parses raw constraint tokens into a normalized expression.
    ///
    /// Each token is one of:
    /// - the literal `and` or `or`, which must follow a predicate
    /// - a category shorthand (`+work`, `_home`), using the configured
    ///   prefix characters
    /// - a `property[.operator]:value` constraint, with property and
    ///   operator names expanded from any unambiguous prefix
    ///
    /// An implicit `and` is inserted between two adjacent predicates.
    /// The expression must end on a predicate.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidExpression`] for a misplaced
    /// relation, [`FilterError::InvalidConstraintFormat`] for a token
    /// without a colon, and [`FilterError::UnknownProperty`] or
    /// [`FilterError::UnknownOperator`] when prefix expansion fails.
    pub fn parse(tokens: &[String], syntax: &Syntax) -> FilterResult<Self> {
        let mut elements: Vec<ConstraintElement> = Vec::new();

        for token in tokens {
            match token.as_str() {
                "and" | "or" => {
                    let relation = if token == "and" {
                        LogicalRelation::And
                    } else {
                        LogicalRelation::Or
                    };
                    if !matches!(elements.last(), Some(ConstraintElement::Predicate(_))) {
                        return Err(FilterError::invalid_expression(token));
                    }
                    elements.push(ConstraintElement::Relation(relation));
                }
                _ => {
                    let predicate = if let Some(category) =
                        category_shorthand(token, syntax.category_include_prefix)
                    {
                        PropertyPredicate {
                            property: "categories".to_string(),
                            operator: "contains".to_string(),
                            value: category.to_string(),
                        }
                    } else if let Some(category) =
                        category_shorthand(token, syntax.category_exclude_prefix)
                    {
                        PropertyPredicate {
                            property: "categories".to_string(),
                            operator: "not_contains".to_string(),
                            value: category.to_string(),
                        }
                    } else {
                        parse_constraint(token)?
                    };

                    if matches!(elements.last(), Some(ConstraintElement::Predicate(_))) {
                        elements.push(ConstraintElement::Relation(LogicalRelation::And));
                    }
                    elements.push(ConstraintElement::Predicate(predicate));
                }
            }
        }

        if matches!(elements.last(), Some(ConstraintElement::Relation(_))) {
            return Err(FilterError::invalid_expression(
                tokens.last().map(String::as_str).unwrap_or_default(),
            ));
        }

        Ok(Self { elements })
    }
}

/// Recognizes a `<prefix><alphanumeric>` category shorthand token.
fn category_shorthand(token: &str, prefix: char) -> Option<&str> {
    let rest = token.strip_prefix(prefix)?;
    if !rest.is_empty() && rest.chars().all(char::is_alphanumeric) {
        Some(rest)
    } else {
        None
    }
}

/// Parses a `property[.operator]:value` token into a predicate.
fn parse_constraint(token: &str) -> FilterResult<PropertyPredicate> {
    let (head, value) = token
        .split_once(':')
        .ok_or_else(|| FilterError::invalid_constraint_format(token))?;

    let (property_prefix, operator_prefix) = match head.split_once('.') {
        Some((property, operator)) => (property, operator),
        None => (head, "equals"),
    };

    let known = Schema::supported_filter_properties();
    let property = expand_prefix(property_prefix, known.iter().copied()).ok_or_else(|| {
        FilterError::UnknownProperty {
            name: property_prefix.to_string(),
            suggestion: Schema::suggest(property_prefix).map(str::to_string),
            known: known.iter().map(|s| s.to_string()).collect(),
        }
    })?;

    let supported = operators_for(property);
    let operator = expand_prefix(operator_prefix, supported.iter().copied()).ok_or_else(|| {
        FilterError::UnknownOperator {
            property: property.to_string(),
            operator: operator_prefix.to_string(),
            supported: supported.iter().map(|s| s.to_string()).collect(),
        }
    })?;

    Ok(PropertyPredicate {
        property: property.to_string(),
        operator: operator.to_string(),
        value: value.to_string(),
    })
}

/// Returns the operator set for a property's kind.
pub(super) fn operators_for(property: &str) -> &'static [&'static str] {
    match Schema::filter_kind(property) {
        Some(PropertyKind::Date) => DATE_OPERATORS,
        Some(PropertyKind::Integer) => INT_OPERATORS,
        // Enum properties compare as case-insensitive text.
        Some(PropertyKind::Text) | Some(PropertyKind::Enum(_)) | None => TEXT_OPERATORS,
    }
}
