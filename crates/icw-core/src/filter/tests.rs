//! Tests for the constraint filter parser and evaluator.

use super::*;
use crate::config::Syntax;
use crate::dates::DateValue;
use crate::item::TodoItem;
use chrono::NaiveDate;

fn syntax() -> Syntax {
    Syntax::default()
}

fn tokens(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|s| s.to_string()).collect()
}

fn parse(raw: &[&str]) -> FilterResult<ConstraintExpression> {
    ConstraintExpression::parse(&tokens(raw), &syntax())
}

fn item() -> TodoItem {
    let mut item = TodoItem::new("Write report");
    item.id = 1;
    item.list = "work".to_string();
    item.priority = Some(2);
    item.categories = vec!["office".to_string(), "writing".to_string()];
    item.due = Some(DateValue::Date(
        NaiveDate::from_ymd_opt(2021, 6, 14).unwrap(),
    ));
    item
}

// ==================== Parsing ====================

#[test]
fn normalizes_alternating_sequence() {
    let expr = parse(&["priority:1", "or", "status:completed"]).unwrap();
    assert_eq!(expr.elements().len(), 3);
    assert!(matches!(
        expr.elements()[1],
        ConstraintElement::Relation(LogicalRelation::Or)
    ));
    assert_eq!(expr.predicate_count(), 2);
}

#[test]
fn implicit_and_between_adjacent_predicates() {
    let expr = parse(&["status:needs-action", "priority:1"]).unwrap();
    assert!(matches!(
        expr.elements()[1],
        ConstraintElement::Relation(LogicalRelation::And)
    ));
}

#[test]
fn misplaced_relations_are_rejected() {
    for raw in [
        vec!["or"],
        vec!["and"],
        vec!["status:completed", "or"],
        vec!["status:completed", "or", "or", "priority:1"],
        vec!["and", "status:completed"],
    ] {
        assert!(
            matches!(parse(&raw), Err(FilterError::InvalidExpression { .. })),
            "expected expression error for {raw:?}"
        );
    }
}

#[test]
fn missing_colon_is_a_format_error() {
    assert!(matches!(
        parse(&["summary"]),
        Err(FilterError::InvalidConstraintFormat { .. })
    ));
}

#[test]
fn property_and_operator_prefixes_expand() {
    let expr = parse(&["sum.cont:report"]).unwrap();
    let ConstraintElement::Predicate(p) = &expr.elements()[0] else {
        panic!("expected predicate");
    };
    assert_eq!(p.property, "summary");
    assert_eq!(p.operator, "contains");
    assert_eq!(p.value, "report");
}

#[test]
fn ambiguous_property_prefix_fails() {
    // "d" matches due, dtstart, dtend and description.
    assert!(matches!(
        parse(&["d:today"]),
        Err(FilterError::UnknownProperty { .. })
    ));
}

#[test]
fn unknown_property_carries_a_suggestion() {
    match parse(&["sumary:report"]) {
        Err(FilterError::UnknownProperty { suggestion, .. }) => {
            assert_eq!(suggestion.as_deref(), Some("summary"));
        }
        other => panic!("expected UnknownProperty, got {other:?}"),
    }
}

#[test]
fn operator_must_match_the_property_kind() {
    assert!(matches!(
        parse(&["due.contains:today"]),
        Err(FilterError::UnknownOperator { .. })
    ));
    assert!(matches!(
        parse(&["priority.before:1"]),
        Err(FilterError::UnknownOperator { .. })
    ));
}

#[test]
fn category_shorthand_tokens() {
    let expr = parse(&["+work", "_home"]).unwrap();
    assert_eq!(expr.predicate_count(), 2);
    let ConstraintElement::Predicate(include) = &expr.elements()[0] else {
        panic!("expected predicate");
    };
    assert_eq!(include.property, "categories");
    assert_eq!(include.operator, "contains");
    assert_eq!(include.value, "work");
    let ConstraintElement::Predicate(exclude) = &expr.elements()[2] else {
        panic!("expected predicate");
    };
    assert_eq!(exclude.operator, "not_contains");
    assert_eq!(exclude.value, "home");
}

// ==================== Evaluation ====================

#[test]
fn empty_expression_matches_everything() {
    let expr = parse(&[]).unwrap();
    assert!(expr.is_empty());
    assert!(expr.matches(&item(), &syntax()).unwrap());
}

#[test]
fn text_comparisons_are_case_insensitive() {
    let item = item();
    assert!(parse(&["summary.contains:REPORT"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
    assert!(parse(&["summary:write report"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
    assert!(!parse(&["summary.not_contains:report"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
}

#[test]
fn status_compares_as_text() {
    let item = item();
    assert!(parse(&["status:needs-action"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
    assert!(parse(&["status.not_equals:completed"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
}

#[test]
fn integer_comparisons() {
    let item = item();
    for (constraint, expected) in [
        ("priority:2", true),
        ("priority.gt:1", true),
        ("priority.geq:2", true),
        ("priority.lt:2", false),
        ("priority.leq:2", true),
        ("priority.not_equals:2", false),
        ("id:1", true),
    ] {
        assert_eq!(
            parse(&[constraint]).unwrap().matches(&item, &syntax()).unwrap(),
            expected,
            "constraint {constraint}"
        );
    }
}

#[test]
fn date_comparisons_adapt_shapes() {
    let item = item();
    assert!(parse(&["due:2021-06-14"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
    // Equality ignores the time-of-day of the literal.
    assert!(parse(&["due:2021-06-14T09:30"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
    assert!(parse(&["due.before:2021-07-01"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
    assert!(parse(&["due.after:2021-06-01"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
    assert!(!parse(&["due.before:2021-06-14"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
}

#[test]
fn missing_property_never_matches() {
    let item = item();
    for constraint in [
        "description.contains:x",
        "description.not_contains:x",
        "percent-complete.gt:0",
        "dtstart.before:today",
    ] {
        assert!(
            !parse(&[constraint]).unwrap().matches(&item, &syntax()).unwrap(),
            "constraint {constraint}"
        );
    }
}

#[test]
fn bad_literals_fail_the_whole_expression() {
    let item = item();
    assert!(matches!(
        parse(&["priority:high"]).unwrap().matches(&item, &syntax()),
        Err(FilterError::InvalidIntegerLiteral { .. })
    ));
    assert!(matches!(
        parse(&["due.before:nonsense"])
            .unwrap()
            .matches(&item, &syntax()),
        Err(FilterError::InvalidDate(_))
    ));
    // The bad literal surfaces even when an earlier predicate already
    // decided the group.
    assert!(matches!(
        parse(&["status:completed", "priority:high"])
            .unwrap()
            .matches(&item, &syntax()),
        Err(FilterError::InvalidIntegerLiteral { .. })
    ));
}

#[test]
fn and_binds_tighter_than_or() {
    let item = item();
    // false or (true and true)
    assert!(parse(&["status:completed", "or", "status:needs-action", "priority:2"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
    // (true and false) or false
    assert!(!parse(&["status:needs-action", "priority:9", "or", "status:completed"])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
}

#[test]
fn category_shorthand_evaluation() {
    let item = item();
    assert!(parse(&["+office"]).unwrap().matches(&item, &syntax()).unwrap());
    assert!(!parse(&["_office"]).unwrap().matches(&item, &syntax()).unwrap());
    assert!(parse(&["_errands"]).unwrap().matches(&item, &syntax()).unwrap());
}

#[test]
fn context_properties_filter() {
    let item = item();
    assert!(parse(&["list:work"]).unwrap().matches(&item, &syntax()).unwrap());
    let by_uid = format!("uid:{}", item.uid);
    assert!(parse(&[by_uid.as_str()])
        .unwrap()
        .matches(&item, &syntax())
        .unwrap());
}
