//! Property assignment decoder.
//!
//! Turns the raw `name:value` tokens of an `add` or `modify` invocation
//! into a validated [`PropertyChangeSet`]. Decoding is fully separated
//! from application: an item is only ever mutated after the entire
//! token list has validated, so a bad token never leaves a partial
//! change behind.
//!
//! Token classification, in order:
//!
//! - an all-digit token is plain text and falls through to the summary
//! - a `+work` / `_home` token is a category modifier
//! - a token with a colon is a property assignment; the name expands
//!   from any unambiguous prefix and the value is checked against the
//!   property's kind; an empty value marks the property for removal
//! - anything else is the summary text, at most once per invocation

use std::collections::BTreeMap;

use thiserror::Error;

use crate::config::Syntax;
use crate::dates::{decode_date, expand_prefix, DateError, DateValue};
use crate::item::TodoItem;
use crate::schema::{PropertyKind, Schema};

/// Errors raised while decoding assignment tokens.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ChangeError {
    /// A property name matched no or several supported properties.
    #[error("unknown or ambiguous property \"{name}\"{}, supported properties are {}", suggestion_suffix(.suggestion), .known.join(", "))]
    UnknownProperty {
        /// The requested property name or prefix.
        name: String,
        /// A close known name, if any.
        suggestion: Option<String>,
        /// All settable property names.
        known: Vec<String>,
    },

    /// An enum property was assigned a value outside its fixed set.
    #[error("invalid value \"{value}\" for property \"{property}\", allowed values are {}", .allowed.join(", "))]
    InvalidEnumValue {
        /// The property being assigned.
        property: String,
        /// The rejected value.
        value: String,
        /// The allowed value set.
        allowed: Vec<String>,
    },

    /// An integer property was assigned a non-numeric value.
    #[error("invalid integer value \"{value}\" for property \"{property}\"")]
    InvalidInteger {
        /// The property being assigned.
        property: String,
        /// The non-numeric value.
        value: String,
    },

    /// A date property value failed to decode.
    #[error(transparent)]
    InvalidDate(#[from] DateError),

    /// Category modifiers were combined with an explicit
    /// `categories:` assignment.
    #[error("categories can be given either as modifiers (+x, _x) or as an explicit list, not both")]
    InvalidCategorySpecification,

    /// A second bare summary token appeared.
    #[error("unexpected token \"{token}\": the summary has already been given")]
    DuplicateSummary {
        /// The extra token.
        token: String,
    },

    /// The summary token was empty.
    #[error("the summary must not be empty")]
    EmptySummary,
}

fn suggestion_suffix(suggestion: &Option<String>) -> String {
    match suggestion {
        Some(name) => format!(" (did you mean \"{name}\"?)"),
        None => String::new(),
    }
}

/// A single decoded property assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyChange {
    Date(DateValue),
    Text(String),
    Int(i64),
    /// Remove the property. Decoded from an empty value.
    Remove,
}

/// An include or exclude category modifier, in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryModifier {
    Include(String),
    Exclude(String),
}

/// A validated set of property changes, built once per invocation and
/// applied exactly once to an item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyChangeSet {
    changes: BTreeMap<String, PropertyChange>,
    /// Explicit replacement list from a `categories:a,b` token. An
    /// empty vector means the property is removed.
    replacement_categories: Option<Vec<String>>,
    modifiers: Vec<CategoryModifier>,
    summary_given: bool,
}

impl PropertyChangeSet {
    /// Decodes raw assignment tokens into a change-set.
    ///
    /// # Errors
    ///
    /// Fails fast on the first invalid token; see [`ChangeError`] for
    /// the conditions. Category modifiers and an explicit
    /// `categories:` assignment in the same invocation fail with
    /// [`ChangeError::InvalidCategorySpecification`].
    pub fn decode(tokens: &[String], syntax: &Syntax) -> Result<Self, ChangeError> {
        let mut set = Self::default();

        for token in tokens {
            if token.chars().all(|c| c.is_ascii_digit()) && !token.is_empty() {
                set.push_summary(token)?;
            } else if let Some(category) =
                category_modifier(token, syntax.category_include_prefix)
            {
                set.modifiers
                    .push(CategoryModifier::Include(category.to_string()));
            } else if let Some(category) =
                category_modifier(token, syntax.category_exclude_prefix)
            {
                set.modifiers
                    .push(CategoryModifier::Exclude(category.to_string()));
            } else if let Some((name, value)) = token.split_once(':') {
                set.push_assignment(name, value, syntax)?;
            } else {
                set.push_summary(token)?;
            }
        }

        if set.replacement_categories.is_some() && !set.modifiers.is_empty() {
            return Err(ChangeError::InvalidCategorySpecification);
        }

        Ok(set)
    }

    fn push_summary(&mut self, token: &str) -> Result<(), ChangeError> {
        if self.summary_given {
            return Err(ChangeError::DuplicateSummary {
                token: token.to_string(),
            });
        }
        if token.is_empty() {
            return Err(ChangeError::EmptySummary);
        }
        self.summary_given = true;
        self.changes
            .insert("summary".to_string(), PropertyChange::Text(token.to_string()));
        Ok(())
    }

    fn push_assignment(
        &mut self,
        name: &str,
        value: &str,
        syntax: &Syntax,
    ) -> Result<(), ChangeError> {
        let known = Schema::supported_properties();
        let property = expand_prefix(name, known.iter().copied()).ok_or_else(|| {
            ChangeError::UnknownProperty {
                name: name.to_string(),
                suggestion: Schema::suggest(name).map(str::to_string),
                known: known.iter().map(|s| s.to_string()).collect(),
            }
        })?;

        // Summary has no removal default; an empty value would leave
        // the item without a title.
        if property == "summary" && value.is_empty() {
            return Err(ChangeError::EmptySummary);
        }

        if property == "categories" {
            self.replacement_categories = Some(if value.is_empty() {
                Vec::new()
            } else {
                value.split(',').map(str::to_string).collect()
            });
            return Ok(());
        }

        let change = if value.is_empty() {
            PropertyChange::Remove
        } else {
            match Schema::kind(property) {
                Some(PropertyKind::Date) => PropertyChange::Date(decode_date(value, syntax)?),
                Some(PropertyKind::Integer) => {
                    PropertyChange::Int(value.parse().map_err(|_| ChangeError::InvalidInteger {
                        property: property.to_string(),
                        value: value.to_string(),
                    })?)
                }
                Some(PropertyKind::Enum(allowed)) => {
                    let normalized = value.to_lowercase();
                    if !allowed.contains(&normalized.as_str()) {
                        return Err(ChangeError::InvalidEnumValue {
                            property: property.to_string(),
                            value: value.to_string(),
                            allowed: allowed.iter().map(|s| s.to_string()).collect(),
                        });
                    }
                    PropertyChange::Text(normalized)
                }
                _ => PropertyChange::Text(value.to_string()),
            }
        };

        self.changes.insert(property.to_string(), change);
        Ok(())
    }

    /// Returns whether the change-set carries no changes at all.
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
            && self.replacement_categories.is_none()
            && self.modifiers.is_empty()
    }

    /// Returns the decoded summary text, if one was given.
    pub fn summary(&self) -> Option<&str> {
        match self.changes.get("summary") {
            Some(PropertyChange::Text(s)) => Some(s),
            _ => None,
        }
    }

    /// The decoded singleton changes by property name.
    pub fn changes(&self) -> &BTreeMap<String, PropertyChange> {
        &self.changes
    }

    /// Applies the change-set to an item.
    ///
    /// Singleton properties are replaced or removed. Categories start
    /// from the explicit replacement list (or the item's existing list)
    /// and the modifiers are applied in input order. A non-empty
    /// change-set refreshes the item's last-modified and dtstamp
    /// timestamps.
    pub fn apply(&self, item: &mut TodoItem) {
        if self.is_empty() {
            return;
        }

        for (name, change) in &self.changes {
            apply_change(item, name, change);
        }

        if self.replacement_categories.is_some() || !self.modifiers.is_empty() {
            let mut categories = self
                .replacement_categories
                .clone()
                .unwrap_or_else(|| item.categories.clone());
            for modifier in &self.modifiers {
                match modifier {
                    CategoryModifier::Include(c) => {
                        if !categories.contains(c) {
                            categories.push(c.clone());
                        }
                    }
                    CategoryModifier::Exclude(c) => categories.retain(|existing| existing != c),
                }
            }
            item.categories = categories;
        }

        item.touch();
    }
}

fn apply_change(item: &mut TodoItem, name: &str, change: &PropertyChange) {
    match name {
        "summary" => {
            if let PropertyChange::Text(s) = change {
                item.summary = s.clone();
            }
        }
        "description" => {
            item.description = match change {
                PropertyChange::Text(s) => Some(s.clone()),
                _ => None,
            }
        }
        // Removing the status falls back to the same default the load
        // normalization applies.
        "status" => {
            item.status = match change {
                PropertyChange::Text(s) => s.clone(),
                _ => "needs-action".to_string(),
            }
        }
        "due" => item.due = change_date(change),
        "dtstart" => item.dtstart = change_date(change),
        "dtend" => item.dtend = change_date(change),
        "priority" => item.priority = change_int(change),
        "percent-complete" => item.percent_complete = change_int(change),
        _ => {}
    }
}

fn change_date(change: &PropertyChange) -> Option<DateValue> {
    match change {
        PropertyChange::Date(d) => Some(*d),
        _ => None,
    }
}

fn change_int(change: &PropertyChange) -> Option<i64> {
    match change {
        PropertyChange::Int(i) => Some(*i),
        _ => None,
    }
}

/// Recognizes a `<prefix><alphanumeric>` category modifier token.
fn category_modifier(token: &str, prefix: char) -> Option<&str> {
    let rest = token.strip_prefix(prefix)?;
    if !rest.is_empty() && rest.chars().all(char::is_alphanumeric) {
        Some(rest)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn syntax() -> Syntax {
        Syntax::default()
    }

    fn decode(raw: &[&str]) -> Result<PropertyChangeSet, ChangeError> {
        let tokens: Vec<String> = raw.iter().map(|s| s.to_string()).collect();
        PropertyChangeSet::decode(&tokens, &syntax())
    }

    #[test]
    fn decodes_summary_and_typed_assignments() {
        let set = decode(&["Water the plants", "due:2021-06-14", "priority:3"]).unwrap();
        assert_eq!(set.summary(), Some("Water the plants"));
        assert_eq!(
            set.changes().get("due"),
            Some(&PropertyChange::Date(DateValue::Date(
                NaiveDate::from_ymd_opt(2021, 6, 14).unwrap()
            )))
        );
        assert_eq!(set.changes().get("priority"), Some(&PropertyChange::Int(3)));
    }

    #[test]
    fn property_prefixes_expand() {
        let set = decode(&["pri:3", "desc:notes"]).unwrap();
        assert_eq!(set.changes().get("priority"), Some(&PropertyChange::Int(3)));
        assert_eq!(
            set.changes().get("description"),
            Some(&PropertyChange::Text("notes".to_string()))
        );
    }

    #[test]
    fn ambiguous_property_prefix_fails() {
        assert!(matches!(
            decode(&["d:today"]),
            Err(ChangeError::UnknownProperty { .. })
        ));
    }

    #[test]
    fn all_digit_token_is_summary_text() {
        let set = decode(&["42"]).unwrap();
        assert_eq!(set.summary(), Some("42"));
    }

    #[test]
    fn second_bare_token_is_rejected() {
        assert!(matches!(
            decode(&["first", "second"]),
            Err(ChangeError::DuplicateSummary { .. })
        ));
    }

    #[test]
    fn empty_summary_is_rejected() {
        assert!(matches!(decode(&[""]), Err(ChangeError::EmptySummary)));
    }

    #[test]
    fn enum_values_are_checked_case_insensitively() {
        let set = decode(&["status:Completed"]).unwrap();
        assert_eq!(
            set.changes().get("status"),
            Some(&PropertyChange::Text("completed".to_string()))
        );
        assert!(matches!(
            decode(&["status:done"]),
            Err(ChangeError::InvalidEnumValue { .. })
        ));
    }

    #[test]
    fn empty_value_is_the_removal_sentinel() {
        let set = decode(&["due:"]).unwrap();
        assert_eq!(set.changes().get("due"), Some(&PropertyChange::Remove));
    }

    #[test]
    fn explicit_categories_and_modifiers_are_mutually_exclusive() {
        assert!(matches!(
            decode(&["Testtask", "categories:a,b", "+c"]),
            Err(ChangeError::InvalidCategorySpecification)
        ));
    }

    #[test]
    fn modifiers_apply_in_order() {
        let mut item = TodoItem::new("Test");
        decode(&["+x", "+y"]).unwrap().apply(&mut item);
        assert_eq!(item.categories, vec!["x", "y"]);

        decode(&["_x"]).unwrap().apply(&mut item);
        assert_eq!(item.categories, vec!["y"]);
    }

    #[test]
    fn explicit_categories_replace_the_list() {
        let mut item = TodoItem::new("Test");
        item.categories = vec!["old".to_string()];
        decode(&["categories:a,b"]).unwrap().apply(&mut item);
        assert_eq!(item.categories, vec!["a", "b"]);

        decode(&["categories:"]).unwrap().apply(&mut item);
        assert!(item.categories.is_empty());
    }

    #[test]
    fn removal_sentinel_deletes_the_property() {
        let mut item = TodoItem::new("Test");
        decode(&["due:2021-06-14"]).unwrap().apply(&mut item);
        assert!(item.has_property("due"));

        decode(&["due:"]).unwrap().apply(&mut item);
        assert!(!item.has_property("due"));
    }

    #[test]
    fn removing_the_status_resets_it_to_needs_action() {
        let mut item = TodoItem::new("Test");
        item.complete();
        assert_eq!(item.status, "completed");

        decode(&["status:"]).unwrap().apply(&mut item);
        assert_eq!(item.status, "needs-action");
    }

    #[test]
    fn empty_summary_assignment_is_rejected() {
        assert!(matches!(decode(&["summary:"]), Err(ChangeError::EmptySummary)));
    }

    #[test]
    fn applying_changes_refreshes_timestamps() {
        let mut item = TodoItem::new("Test");
        item.last_modified = None;
        item.dtstamp = None;

        decode(&[]).unwrap().apply(&mut item);
        assert!(item.last_modified.is_none());

        decode(&["priority:1"]).unwrap().apply(&mut item);
        assert!(item.last_modified.is_some());
        assert!(item.dtstamp.is_some());
    }

    #[test]
    fn invalid_integer_value() {
        assert!(matches!(
            decode(&["priority:high"]),
            Err(ChangeError::InvalidInteger { .. })
        ));
    }

    #[test]
    fn invalid_date_value() {
        assert!(matches!(
            decode(&["due:2021-13-40"]),
            Err(ChangeError::InvalidDate(_))
        ));
    }
}
