//! The static property schema.
//!
//! One process-wide table maps property names to their kind (date, text,
//! integer or enum). It is the single source of truth for which
//! properties exist, how their values are typed and which filter
//! operators apply; nothing else in the crate hard-codes property kinds.

use strsim::levenshtein;

/// Maximum Levenshtein distance to consider a name as a suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 3;

/// The kind of a todo property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    /// A date or date-time value.
    Date,
    /// Free text. `categories` is the one multi-valued text property.
    Text,
    /// An integer value.
    Integer,
    /// One of a fixed, case-insensitive value set.
    Enum(&'static [&'static str]),
}

/// The fixed property table.
pub struct Schema;

impl Schema {
    /// Date-typed properties.
    pub const DATE_PROPERTIES: &'static [&'static str] = &["due", "dtstart", "dtend"];

    /// Text-typed properties. `categories` holds a list of values.
    pub const TEXT_PROPERTIES: &'static [&'static str] =
        &["summary", "description", "categories"];

    /// Integer-typed properties.
    pub const INT_PROPERTIES: &'static [&'static str] = &["priority", "percent-complete"];

    /// Enum-typed properties.
    pub const ENUM_PROPERTIES: &'static [&'static str] = &["status"];

    /// Allowed values for the `status` property.
    pub const STATUS_VALUES: &'static [&'static str] =
        &["needs-action", "completed", "in-process", "cancelled"];

    /// Text-typed context properties, available only when filtering.
    pub const TEXT_CONTEXT_PROPERTIES: &'static [&'static str] = &["uid", "list"];

    /// Integer-typed context properties, available only when filtering.
    pub const INT_CONTEXT_PROPERTIES: &'static [&'static str] = &["id"];

    /// Returns the kind of a settable property, or `None` for unknown
    /// names.
    pub fn kind(name: &str) -> Option<PropertyKind> {
        if Self::DATE_PROPERTIES.contains(&name) {
            Some(PropertyKind::Date)
        } else if Self::TEXT_PROPERTIES.contains(&name) {
            Some(PropertyKind::Text)
        } else if Self::INT_PROPERTIES.contains(&name) {
            Some(PropertyKind::Integer)
        } else if name == "status" {
            Some(PropertyKind::Enum(Self::STATUS_VALUES))
        } else {
            None
        }
    }

    /// Returns the kind of a filterable property, including the
    /// context-only ones.
    pub fn filter_kind(name: &str) -> Option<PropertyKind> {
        if Self::TEXT_CONTEXT_PROPERTIES.contains(&name) {
            Some(PropertyKind::Text)
        } else if Self::INT_CONTEXT_PROPERTIES.contains(&name) {
            Some(PropertyKind::Integer)
        } else {
            Self::kind(name)
        }
    }

    /// Returns true for properties that exist only in the read-time
    /// context of an item, not in its stored representation.
    pub fn is_context(name: &str) -> bool {
        Self::TEXT_CONTEXT_PROPERTIES.contains(&name)
            || Self::INT_CONTEXT_PROPERTIES.contains(&name)
    }

    /// All properties accepted by `add`/`modify`.
    pub fn supported_properties() -> Vec<&'static str> {
        let mut result = Vec::new();
        result.extend_from_slice(Self::DATE_PROPERTIES);
        result.extend_from_slice(Self::TEXT_PROPERTIES);
        result.extend_from_slice(Self::INT_PROPERTIES);
        result.extend_from_slice(Self::ENUM_PROPERTIES);
        result
    }

    /// All properties accepted in filter constraints.
    pub fn supported_filter_properties() -> Vec<&'static str> {
        let mut result = Self::supported_properties();
        result.extend_from_slice(Self::TEXT_CONTEXT_PROPERTIES);
        result.extend_from_slice(Self::INT_CONTEXT_PROPERTIES);
        result
    }

    /// Finds the closest property name for an unrecognized input, for
    /// "did you mean" hints. Returns `None` when nothing is close.
    pub fn suggest(name: &str) -> Option<&'static str> {
        let name_lower = name.to_lowercase();
        let (best, distance) = Self::supported_filter_properties()
            .into_iter()
            .map(|candidate| (candidate, levenshtein(&name_lower, candidate)))
            .min_by_key(|(_, d)| *d)?;

        if distance > 0 && distance <= MAX_SUGGESTION_DISTANCE {
            Some(best)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_resolve_from_the_table() {
        assert_eq!(Schema::kind("due"), Some(PropertyKind::Date));
        assert_eq!(Schema::kind("summary"), Some(PropertyKind::Text));
        assert_eq!(Schema::kind("priority"), Some(PropertyKind::Integer));
        assert_eq!(
            Schema::kind("status"),
            Some(PropertyKind::Enum(Schema::STATUS_VALUES))
        );
        assert_eq!(Schema::kind("id"), None);
        assert_eq!(Schema::filter_kind("id"), Some(PropertyKind::Integer));
        assert_eq!(Schema::filter_kind("list"), Some(PropertyKind::Text));
    }

    #[test]
    fn context_properties_are_not_settable() {
        for name in ["id", "uid", "list"] {
            assert!(Schema::is_context(name));
            assert_eq!(Schema::kind(name), None);
        }
    }

    #[test]
    fn suggestions_for_typos() {
        assert_eq!(Schema::suggest("sumary"), Some("summary"));
        assert_eq!(Schema::suggest("priorty"), Some("priority"));
        assert_eq!(Schema::suggest("zzzzzzzz"), None);
    }
}
