//! The todo item model and its iCalendar adapter.
//!
//! A [`TodoItem`] is the in-memory form of one `.ics` file. Known
//! properties are mapped to typed fields; everything else is carried as
//! raw key/value pairs and written back unchanged, so foreign clients
//! never lose data when icw rewrites a file.
//!
//! Normalization happens once at load time: an item without a `STATUS`
//! property gets `needs-action`. Read paths can rely on the field being
//! set.

use chrono::{Local, NaiveDate, NaiveDateTime};
use icalendar::{Calendar, CalendarComponent, Component, Property, Todo};
use thiserror::Error;
use uuid::Uuid;

use crate::config::Syntax;
use crate::dates::DateValue;

/// Property keys the typed fields cover. Anything else is passed
/// through unmapped.
const HANDLED_KEYS: &[&str] = &[
    "UID",
    "SUMMARY",
    "DESCRIPTION",
    "STATUS",
    "PRIORITY",
    "PERCENT-COMPLETE",
    "DUE",
    "DTSTART",
    "DTEND",
    "COMPLETED",
    "CATEGORIES",
    "CREATED",
    "LAST-MODIFIED",
    "DTSTAMP",
    "PRODID",
    "VERSION",
    "CALSCALE",
];

/// Errors raised while reading a todo file.
#[derive(Debug, Error)]
pub enum ItemError {
    /// The file content is not a parsable iCalendar object.
    #[error("not a valid iCalendar file: {reason}")]
    ParseIcs {
        /// Parser message.
        reason: String,
    },

    /// The calendar contains no VTODO component.
    #[error("no todo entry found in calendar file")]
    MissingTodo,
}

/// A property icw does not interpret, preserved verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawProperty {
    pub key: String,
    pub value: String,
    pub params: Vec<(String, String)>,
}

/// One todo item, loaded from or destined for a single `.ics` file.
///
/// `id` and `list` are context fields assigned by the store when a
/// snapshot is built. Ids are recomputed on every load and are not
/// stable across mutations.
#[derive(Debug, Clone, Default)]
pub struct TodoItem {
    pub uid: String,
    pub list: String,
    pub id: usize,
    pub summary: String,
    pub description: Option<String>,
    pub status: String,
    pub categories: Vec<String>,
    pub due: Option<DateValue>,
    pub dtstart: Option<DateValue>,
    pub dtend: Option<DateValue>,
    pub priority: Option<i64>,
    pub percent_complete: Option<i64>,
    pub completed: Option<NaiveDateTime>,
    pub created: Option<NaiveDateTime>,
    pub last_modified: Option<NaiveDateTime>,
    pub dtstamp: Option<NaiveDateTime>,
    pub unmapped: Vec<RawProperty>,
}

impl TodoItem {
    /// Creates a fresh item with a random UID, `needs-action` status and
    /// current creation timestamps.
    pub fn new(summary: &str) -> Self {
        let now = Local::now().naive_local();
        Self {
            uid: Uuid::new_v4().to_string(),
            summary: summary.to_string(),
            status: "needs-action".to_string(),
            created: Some(now),
            dtstamp: Some(now),
            ..Self::default()
        }
    }

    /// Parses a calendar-wrapped todo file.
    pub fn from_ics(raw: &str) -> Result<Self, ItemError> {
        let calendar: Calendar = raw
            .parse()
            .map_err(|e: String| ItemError::ParseIcs { reason: e.to_string() })?;

        let todo = calendar
            .components
            .iter()
            .find_map(|component| match component {
                CalendarComponent::Todo(t) => Some(t),
                _ => None,
            })
            .ok_or(ItemError::MissingTodo)?;

        let properties = todo.properties();
        let value_of = |key: &str| properties.get(key).map(|p| p.value().to_string());

        let status = value_of("STATUS")
            .map(|s| s.trim().to_lowercase())
            .unwrap_or_else(|| "needs-action".to_string());

        let mut categories = Vec::new();
        if let Some(multi) = todo.multi_properties().get("CATEGORIES") {
            for prop in multi {
                categories.extend(split_categories(prop.value()));
            }
        }
        if let Some(prop) = properties.get("CATEGORIES") {
            categories.extend(split_categories(prop.value()));
        }

        let mut unmapped = Vec::new();
        for (key, prop) in properties {
            if !HANDLED_KEYS.contains(&key.to_uppercase().as_str()) {
                unmapped.push(raw_property(prop));
            }
        }
        for (key, props) in todo.multi_properties() {
            if !HANDLED_KEYS.contains(&key.to_uppercase().as_str()) {
                unmapped.extend(props.iter().map(raw_property));
            }
        }

        Ok(Self {
            uid: todo.get_uid().unwrap_or_default().to_string(),
            list: String::new(),
            id: 0,
            summary: todo.get_summary().unwrap_or_default().to_string(),
            description: todo.get_description().map(str::to_string),
            status,
            categories,
            due: value_of("DUE").as_deref().and_then(parse_ics_date),
            dtstart: value_of("DTSTART").as_deref().and_then(parse_ics_date),
            dtend: value_of("DTEND").as_deref().and_then(parse_ics_date),
            priority: value_of("PRIORITY").and_then(|v| v.parse().ok()),
            percent_complete: value_of("PERCENT-COMPLETE").and_then(|v| v.parse().ok()),
            completed: value_of("COMPLETED").as_deref().and_then(parse_ics_timestamp),
            created: value_of("CREATED").as_deref().and_then(parse_ics_timestamp),
            last_modified: value_of("LAST-MODIFIED")
                .as_deref()
                .and_then(parse_ics_timestamp),
            dtstamp: value_of("DTSTAMP").as_deref().and_then(parse_ics_timestamp),
            unmapped,
        })
    }

    /// Serializes the item as a calendar-wrapped todo.
    pub fn to_ics(&self) -> String {
        let mut todo = Todo::new();
        todo.uid(&self.uid);
        todo.summary(&self.summary);
        if let Some(description) = &self.description {
            todo.description(description);
        }
        todo.add_property("STATUS", self.status.to_uppercase());

        if let Some(due) = self.due {
            todo.add_property("DUE", format_ics_date(due));
        }
        if let Some(dtstart) = self.dtstart {
            todo.add_property("DTSTART", format_ics_date(dtstart));
        }
        if let Some(dtend) = self.dtend {
            todo.add_property("DTEND", format_ics_date(dtend));
        }
        if let Some(priority) = self.priority {
            todo.add_property("PRIORITY", priority.to_string());
        }
        if let Some(percent) = self.percent_complete {
            todo.add_property("PERCENT-COMPLETE", percent.to_string());
        }
        if let Some(completed) = self.completed {
            todo.add_property("COMPLETED", format_ics_timestamp(completed));
        }
        if let Some(created) = self.created {
            todo.add_property("CREATED", format_ics_timestamp(created));
        }
        if let Some(last_modified) = self.last_modified {
            todo.add_property("LAST-MODIFIED", format_ics_timestamp(last_modified));
        }
        if let Some(dtstamp) = self.dtstamp {
            todo.add_property("DTSTAMP", format_ics_timestamp(dtstamp));
        }

        for raw in &self.unmapped {
            let mut prop = Property::new(&raw.key, &raw.value);
            for (k, v) in &raw.params {
                prop.add_parameter(k, v);
            }
            todo.append_multi_property(prop);
        }

        let mut calendar = Calendar::new();
        calendar.push(todo);
        let mut ics = calendar.to_string();

        // The library exposes no categories setter, so the single
        // CATEGORIES line is injected into the serialized text.
        if !self.categories.is_empty() {
            let escaped: Vec<String> = self
                .categories
                .iter()
                .map(|c| c.replace(',', "\\,"))
                .collect();
            let line = format!("CATEGORIES:{}", escaped.join(","));
            if let Some(idx) = ics.rfind("END:VTODO") {
                let (head, tail) = ics.split_at(idx);
                ics = format!("{head}{line}\r\n{tail}");
            }
        }

        ics
    }

    /// Returns whether the named property is present on this item.
    /// Context properties (`id`, `uid`, `list`) always are.
    pub fn has_property(&self, name: &str) -> bool {
        match name {
            "id" | "uid" | "list" | "summary" | "status" => true,
            "description" => self.description.is_some(),
            "categories" => !self.categories.is_empty(),
            "due" => self.due.is_some(),
            "dtstart" => self.dtstart.is_some(),
            "dtend" => self.dtend.is_some(),
            "priority" => self.priority.is_some(),
            "percent-complete" => self.percent_complete.is_some(),
            _ => false,
        }
    }

    /// Returns the value of a date-typed property.
    pub fn date_value(&self, name: &str) -> Option<DateValue> {
        match name {
            "due" => self.due,
            "dtstart" => self.dtstart,
            "dtend" => self.dtend,
            _ => None,
        }
    }

    /// Returns the value of a text-typed property. Categories are
    /// comma-joined; `uid` and `list` are read-time context.
    pub fn text_value(&self, name: &str) -> Option<String> {
        match name {
            "summary" => Some(self.summary.clone()),
            "description" => self.description.clone(),
            "status" => Some(self.status.clone()),
            "categories" => {
                if self.categories.is_empty() {
                    None
                } else {
                    Some(self.categories.join(","))
                }
            }
            "uid" => Some(self.uid.clone()),
            "list" => Some(self.list.clone()),
            _ => None,
        }
    }

    /// Returns the value of an integer-typed property. `id` is
    /// read-time context.
    pub fn int_value(&self, name: &str) -> Option<i64> {
        match name {
            "priority" => self.priority,
            "percent-complete" => self.percent_complete,
            "id" => Some(self.id as i64),
            _ => None,
        }
    }

    /// Renders a property for tabular output. Absent properties render
    /// as the empty string.
    pub fn display_value(&self, name: &str, syntax: &Syntax) -> String {
        match name {
            "id" => self.id.to_string(),
            "due" | "dtstart" | "dtend" => self
                .date_value(name)
                .map(|v| v.format(syntax))
                .unwrap_or_default(),
            "priority" | "percent-complete" => self
                .int_value(name)
                .map(|v| v.to_string())
                .unwrap_or_default(),
            other => self.text_value(other).unwrap_or_default(),
        }
    }

    /// Marks the item as done.
    pub fn complete(&mut self) {
        self.status = "completed".to_string();
        self.percent_complete = Some(100);
        self.completed = Some(Local::now().naive_local());
    }

    /// Refreshes the modification timestamps. Called after any
    /// change-set has been applied.
    pub fn touch(&mut self) {
        let now = Local::now().naive_local();
        self.last_modified = Some(now);
        self.dtstamp = Some(now);
    }
}

fn split_categories(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn raw_property(prop: &Property) -> RawProperty {
    RawProperty {
        key: prop.key().to_string(),
        value: prop.value().to_string(),
        params: prop
            .params()
            .iter()
            .map(|(k, param)| (k.clone(), param.value().to_string()))
            .collect(),
    }
}

/// Parses an iCalendar DATE or DATE-TIME value. An 8-character value is
/// a plain date; anything longer carries a time-of-day.
fn parse_ics_date(value: &str) -> Option<DateValue> {
    if value.len() == 8 {
        NaiveDate::parse_from_str(value, "%Y%m%d")
            .ok()
            .map(DateValue::Date)
    } else {
        parse_ics_timestamp(value).map(DateValue::DateTime)
    }
}

fn parse_ics_timestamp(value: &str) -> Option<NaiveDateTime> {
    let format = if value.ends_with('Z') {
        "%Y%m%dT%H%M%SZ"
    } else {
        "%Y%m%dT%H%M%S"
    };
    NaiveDateTime::parse_from_str(value, format).ok()
}

fn format_ics_date(value: DateValue) -> String {
    match value {
        DateValue::Date(d) => d.format("%Y%m%d").to_string(),
        DateValue::DateTime(dt) => dt.format("%Y%m%dT%H%M%S").to_string(),
    }
}

fn format_ics_timestamp(value: NaiveDateTime) -> String {
    value.format("%Y%m%dT%H%M%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = "BEGIN:VCALENDAR\r\n\
        VERSION:2.0\r\n\
        BEGIN:VTODO\r\n\
        UID:abc-123\r\n\
        SUMMARY:Water the plants\r\n\
        DUE:20210614\r\n\
        DTSTART:20210601T083000\r\n\
        PRIORITY:3\r\n\
        CATEGORIES:home,garden\r\n\
        X-FOREIGN:kept\r\n\
        END:VTODO\r\n\
        END:VCALENDAR\r\n";

    #[test]
    fn parses_typed_fields() {
        let item = TodoItem::from_ics(SAMPLE).unwrap();
        assert_eq!(item.uid, "abc-123");
        assert_eq!(item.summary, "Water the plants");
        assert_eq!(
            item.due,
            Some(DateValue::Date(
                NaiveDate::from_ymd_opt(2021, 6, 14).unwrap()
            ))
        );
        assert_eq!(
            item.dtstart,
            Some(DateValue::DateTime(
                NaiveDate::from_ymd_opt(2021, 6, 1)
                    .unwrap()
                    .and_hms_opt(8, 30, 0)
                    .unwrap()
            ))
        );
        assert_eq!(item.priority, Some(3));
        assert_eq!(item.categories, vec!["home", "garden"]);
    }

    #[test]
    fn missing_status_normalizes_to_needs_action() {
        let item = TodoItem::from_ics(SAMPLE).unwrap();
        assert_eq!(item.status, "needs-action");
    }

    #[test]
    fn unmapped_properties_survive_a_round_trip() {
        let item = TodoItem::from_ics(SAMPLE).unwrap();
        assert_eq!(item.unmapped.len(), 1);
        assert_eq!(item.unmapped[0].key, "X-FOREIGN");

        let ics = item.to_ics();
        assert!(ics.contains("X-FOREIGN:kept"));
        assert!(ics.contains("CATEGORIES:home,garden"));
        assert!(ics.contains("STATUS:NEEDS-ACTION"));
    }

    #[test]
    fn complete_sets_status_percent_and_timestamp() {
        let mut item = TodoItem::new("Test");
        item.complete();
        assert_eq!(item.status, "completed");
        assert_eq!(item.percent_complete, Some(100));
        assert!(item.completed.is_some());
    }

    #[test]
    fn missing_todo_component_is_an_error() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nEND:VCALENDAR\r\n";
        assert!(matches!(
            TodoItem::from_ics(ics),
            Err(ItemError::MissingTodo)
        ));
    }

    #[test]
    fn context_properties_are_always_present() {
        let item = TodoItem::new("Test");
        for name in ["id", "uid", "list", "summary", "status"] {
            assert!(item.has_property(name));
        }
        assert!(!item.has_property("due"));
    }
}
