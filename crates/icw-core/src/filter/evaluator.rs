//! Constraint expression evaluation against todo items.

use super::ast::{ConstraintElement, ConstraintExpression, LogicalRelation, PropertyPredicate};
use super::error::{FilterError, FilterResult};
use crate::config::Syntax;
use crate::dates::decode_date;
use crate::item::TodoItem;
use crate::schema::{PropertyKind, Schema};

impl ConstraintExpression {
    /// Evaluates the expression against one item.
    ///
    /// The normalized element sequence is reduced by a left-to-right
    /// fold honoring `and`-over-`or` precedence: predicates joined by
    /// `and` accumulate into a conjunction, and each `or` folds the
    /// accumulated group into the overall result. Every predicate is
    /// evaluated, so a bad comparison literal fails the whole
    /// expression instead of being masked by short-circuiting.
    ///
    /// Date synonyms in comparison literals (`today`, `now`) resolve
    /// against the clock on every call. The empty expression matches
    /// every item.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidIntegerLiteral`] or
    /// [`FilterError::InvalidDate`] when a comparison literal does not
    /// decode per the property's kind.
    pub fn matches(&self, item: &TodoItem, syntax: &Syntax) -> FilterResult<bool> {
        let mut result = false;
        let mut group = true;

        for element in &self.elements {
            match element {
                ConstraintElement::Predicate(predicate) => {
                    let value = evaluate_predicate(predicate, item, syntax)?;
                    group = group && value;
                }
                ConstraintElement::Relation(LogicalRelation::And) => {}
                ConstraintElement::Relation(LogicalRelation::Or) => {
                    result = result || group;
                    group = true;
                }
            }
        }

        Ok(result || group)
    }
}

/// Evaluates one predicate. An item lacking the tested property never
/// matches, regardless of the operator.
fn evaluate_predicate(
    predicate: &PropertyPredicate,
    item: &TodoItem,
    syntax: &Syntax,
) -> FilterResult<bool> {
    match Schema::filter_kind(&predicate.property) {
        Some(PropertyKind::Date) => evaluate_date(predicate, item, syntax),
        Some(PropertyKind::Integer) => evaluate_int(predicate, item),
        Some(PropertyKind::Text) | Some(PropertyKind::Enum(_)) => evaluate_text(predicate, item),
        None => Ok(false),
    }
}

fn evaluate_date(
    predicate: &PropertyPredicate,
    item: &TodoItem,
    syntax: &Syntax,
) -> FilterResult<bool> {
    // The literal is decoded before the presence check so that a bad
    // date fails the expression even for items without the property.
    let literal = decode_date(&predicate.value, syntax)?;

    let Some(stored) = item.date_value(&predicate.property) else {
        return Ok(false);
    };
    let literal = literal.adapt_to(&stored);

    Ok(match predicate.operator.as_str() {
        "before" => stored.as_datetime() < literal.as_datetime(),
        "after" => stored.as_datetime() > literal.as_datetime(),
        // Date equality ignores the time-of-day component.
        "equals" => stored.date() == literal.date(),
        _ => false,
    })
}

fn evaluate_int(predicate: &PropertyPredicate, item: &TodoItem) -> FilterResult<bool> {
    let literal: i64 =
        predicate
            .value
            .parse()
            .map_err(|_| FilterError::InvalidIntegerLiteral {
                property: predicate.property.clone(),
                value: predicate.value.clone(),
            })?;

    let Some(stored) = item.int_value(&predicate.property) else {
        return Ok(false);
    };

    Ok(match predicate.operator.as_str() {
        "gt" => stored > literal,
        "geq" => stored >= literal,
        "lt" => stored < literal,
        "leq" => stored <= literal,
        "equals" => stored == literal,
        "not_equals" => stored != literal,
        _ => false,
    })
}

fn evaluate_text(predicate: &PropertyPredicate, item: &TodoItem) -> FilterResult<bool> {
    let Some(stored) = item.text_value(&predicate.property) else {
        return Ok(false);
    };
    let stored = stored.to_lowercase();
    let literal = predicate.value.to_lowercase();

    Ok(match predicate.operator.as_str() {
        "contains" => stored.contains(&literal),
        "not_contains" => !stored.contains(&literal),
        "equals" => stored == literal,
        "not_equals" => stored != literal,
        _ => false,
    })
}
