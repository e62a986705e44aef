//! The normalized constraint expression.

/// A boolean connective between two predicates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalRelation {
    And,
    Or,
}

/// A single property test: property name, operator name and the raw
/// literal to compare against. The literal is interpreted per the
/// property's kind at evaluation time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyPredicate {
    /// Full (expanded) property name.
    pub property: String,
    /// Full (expanded) operator name, valid for the property's kind.
    pub operator: String,
    /// The raw comparison literal.
    pub value: String,
}

/// One element of a normalized expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintElement {
    Relation(LogicalRelation),
    Predicate(PropertyPredicate),
}

/// A normalized constraint expression: an alternating sequence of
/// predicates and relations, starting and ending on a predicate.
///
/// The empty expression is valid and matches every item. Built once
/// from raw tokens, then evaluated read-only against any number of
/// candidates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConstraintExpression {
    pub(super) elements: Vec<ConstraintElement>,
}

impl ConstraintExpression {
    /// The normalized elements, for inspection.
    pub fn elements(&self) -> &[ConstraintElement] {
        &self.elements
    }

    /// Returns whether the expression carries no predicates.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Number of property predicates in the expression.
    pub fn predicate_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, ConstraintElement::Predicate(_)))
            .count()
    }
}
