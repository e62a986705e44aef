//! Date expression engine.
//!
//! Turns a date expression string into an absolute date or date-time.
//! Three shapes are accepted, tried in this order:
//!
//! 1. The configured absolute date format (e.g. `2024-05-17`)
//! 2. The configured absolute date-time format (e.g. `2024-05-17T09:30`)
//! 3. A relative expression: a synonym (`today`, `tomorrow`, `now`, or a
//!    weekday name), optionally followed by `@HH:MM` and/or a formula of
//!    signed unit offsets (`fri@12:00+2w-3d`)
//!
//! Synonyms and formula units may be abbreviated to any unambiguous
//! prefix (`tod`, `mon`, `3d`, `2mo`). Weekday synonyms always resolve to
//! the next occurrence strictly after today, never today itself.
//!
//! Synonyms are resolved against the clock on every call; results of
//! `today`/`now` based expressions must not be cached across invocations.

use chrono::{Datelike, Duration, Local, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use thiserror::Error;

use crate::config::Syntax;

/// The date synonyms understood by the relative expression parser.
pub const DATE_SYNONYMS: &[&str] = &[
    "now",
    "today",
    "tomorrow",
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Units accepted in date formulas, matched by unambiguous prefix.
pub const DATE_FORMULA_UNITS: &[&str] =
    &["minutes", "hours", "days", "weeks", "months", "years"];

/// Errors produced by the date expression engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DateError {
    /// The input matched neither absolute format nor a known synonym.
    #[error(
        "invalid date \"{input}\": expected format {date_format} or {datetime_format}, or a synonym from {}",
        .synonyms.join(", ")
    )]
    InvalidFormat {
        /// The offending input string.
        input: String,
        /// The configured absolute date format.
        date_format: String,
        /// The configured absolute date-time format.
        datetime_format: String,
        /// The accepted synonym names.
        synonyms: Vec<String>,
    },

    /// A date formula was malformed.
    #[error("invalid date formula: {reason} at position {position}")]
    InvalidFormula {
        /// What went wrong.
        reason: String,
        /// Character offset inside the formula part of the expression.
        position: usize,
    },
}

/// A resolved date expression: either a plain calendar date or a
/// date with time-of-day, both in local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue {
    /// A calendar date without time-of-day.
    Date(NaiveDate),
    /// A date with time-of-day.
    DateTime(NaiveDateTime),
}

impl DateValue {
    /// Returns the calendar date component.
    pub fn date(&self) -> NaiveDate {
        match self {
            DateValue::Date(d) => *d,
            DateValue::DateTime(dt) => dt.date(),
        }
    }

    /// Returns the value as a date-time, promoting a plain date to
    /// midnight.
    pub fn as_datetime(&self) -> NaiveDateTime {
        match self {
            DateValue::Date(d) => d.and_time(NaiveTime::MIN),
            DateValue::DateTime(dt) => *dt,
        }
    }

    /// Aligns this value to the shape of `reference`: a plain date is
    /// promoted to midnight when the reference carries a time-of-day,
    /// and a date-time is truncated to its date when the reference is a
    /// plain date.
    pub fn adapt_to(&self, reference: &DateValue) -> DateValue {
        match reference {
            DateValue::Date(_) => DateValue::Date(self.date()),
            DateValue::DateTime(_) => DateValue::DateTime(self.as_datetime()),
        }
    }

    /// Formats the value with the configured absolute format matching
    /// its shape.
    pub fn format(&self, syntax: &Syntax) -> String {
        match self {
            DateValue::Date(d) => d.format(&syntax.date_format).to_string(),
            DateValue::DateTime(dt) => dt.format(&syntax.datetime_format).to_string(),
        }
    }
}

/// Expands `prefix` to the unique candidate it is a leading substring
/// of. Returns `None` when no candidate or more than one candidate
/// matches.
pub fn expand_prefix<'a, I>(prefix: &str, candidates: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut result = None;
    for candidate in candidates {
        if candidate.starts_with(prefix) {
            if result.is_some() {
                return None;
            }
            result = Some(candidate);
        }
    }
    result
}

/// Decodes a date expression string into an absolute [`DateValue`].
///
/// # Errors
///
/// Returns [`DateError::InvalidFormat`] when the input is empty, matches
/// no absolute format and starts with no unambiguous synonym prefix, or
/// carries an unparsable `@time` suffix. Returns
/// [`DateError::InvalidFormula`] when a trailing offset formula is
/// malformed.
pub fn decode_date(input: &str, syntax: &Syntax) -> Result<DateValue, DateError> {
    if input.is_empty() {
        return Err(invalid_format(input, syntax));
    }

    // Absolute formats win over relative interpretation, so that a
    // numeric but malformed date like "2000-08-33" is reported as a
    // format error instead of being read as a formula.
    if let Ok(date) = NaiveDate::parse_from_str(input, &syntax.date_format) {
        return Ok(DateValue::Date(date));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, &syntax.datetime_format) {
        return Ok(DateValue::DateTime(dt));
    }

    decode_relative_date(input, syntax)
}

/// Decodes a relative expression: synonym, optional `@time` suffix,
/// optional formula.
fn decode_relative_date(input: &str, syntax: &Syntax) -> Result<DateValue, DateError> {
    let prefix_len = input
        .char_indices()
        .find(|(_, c)| !c.is_alphabetic())
        .map(|(i, _)| i)
        .unwrap_or(input.len());
    let (prefix, mut rest) = input.split_at(prefix_len);

    let mut result = expand_prefix(prefix, DATE_SYNONYMS.iter().copied())
        .and_then(resolve_synonym)
        .ok_or_else(|| invalid_format(input, syntax))?;

    if let Some(stripped) = rest.strip_prefix(syntax.relative_time_separator) {
        // The time slice is fixed-width; its width follows from the
        // configured format, which is assumed to use zero-padded fields.
        let width = Local::now()
            .format(&syntax.relative_time_format)
            .to_string()
            .len();
        let slice = stripped
            .get(..width)
            .ok_or_else(|| invalid_format(input, syntax))?;
        let time = NaiveTime::parse_from_str(slice, &syntax.relative_time_format)
            .map_err(|_| invalid_format(input, syntax))?;
        result = DateValue::DateTime(result.date().and_time(time));
        rest = &stripped[width..];
    }

    if rest.is_empty() {
        Ok(result)
    } else {
        decode_date_formula(result, rest)
    }
}

/// Applies a formula of `(+|-)<integer><unit>` groups to a base date,
/// left to right.
pub fn decode_date_formula(base: DateValue, formula: &str) -> Result<DateValue, DateError> {
    let chars: Vec<char> = formula.chars().collect();
    let mut result = base;
    let mut i = 0;

    while i < chars.len() {
        let negate = match chars[i] {
            '+' => false,
            '-' => true,
            _ => {
                return Err(DateError::InvalidFormula {
                    reason: "expected \"+\" or \"-\"".to_string(),
                    position: i,
                })
            }
        };
        i += 1;

        let digits_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        let digits: String = chars[digits_start..i].iter().collect();
        let amount: i64 = digits.parse().map_err(|_| DateError::InvalidFormula {
            reason: "expected digit".to_string(),
            position: i,
        })?;

        let unit_start = i;
        while i < chars.len() && chars[i].is_alphabetic() {
            i += 1;
        }
        let unit_prefix: String = chars[unit_start..i].iter().collect();
        let unit = expand_prefix(&unit_prefix, DATE_FORMULA_UNITS.iter().copied()).ok_or_else(
            || DateError::InvalidFormula {
                reason: format!(
                    "invalid or ambiguous unit \"{unit_prefix}\", supported units are {}",
                    DATE_FORMULA_UNITS.join(", ")
                ),
                position: unit_start,
            },
        )?;

        let amount = if negate { -amount } else { amount };
        result = apply_offset(result, unit, amount).ok_or_else(|| DateError::InvalidFormula {
            reason: "resulting date out of range".to_string(),
            position: unit_start,
        })?;
    }

    Ok(result)
}

/// Applies a single signed offset to a value. Month and year offsets use
/// calendar-aware arithmetic; minute and hour offsets promote a plain
/// date to midnight first.
fn apply_offset(value: DateValue, unit: &str, amount: i64) -> Option<DateValue> {
    match unit {
        "minutes" => add_duration(value, Duration::minutes(amount)),
        "hours" => add_duration(value, Duration::hours(amount)),
        "days" => add_days(value, amount),
        "weeks" => add_days(value, amount.checked_mul(7)?),
        "months" => add_months(value, amount),
        "years" => add_months(value, amount.checked_mul(12)?),
        _ => None,
    }
}

fn add_duration(value: DateValue, delta: Duration) -> Option<DateValue> {
    value
        .as_datetime()
        .checked_add_signed(delta)
        .map(DateValue::DateTime)
}

fn add_days(value: DateValue, days: i64) -> Option<DateValue> {
    match value {
        DateValue::Date(d) => d
            .checked_add_signed(Duration::days(days))
            .map(DateValue::Date),
        DateValue::DateTime(dt) => dt
            .checked_add_signed(Duration::days(days))
            .map(DateValue::DateTime),
    }
}

fn add_months(value: DateValue, months: i64) -> Option<DateValue> {
    let delta = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    match value {
        DateValue::Date(d) => if months >= 0 {
            d.checked_add_months(delta)
        } else {
            d.checked_sub_months(delta)
        }
        .map(DateValue::Date),
        DateValue::DateTime(dt) => if months >= 0 {
            dt.checked_add_months(delta)
        } else {
            dt.checked_sub_months(delta)
        }
        .map(DateValue::DateTime),
    }
}

/// Resolves a full synonym name against the current clock. Names
/// outside the synonym table resolve to `None`.
fn resolve_synonym(name: &str) -> Option<DateValue> {
    let today = Local::now().date_naive();
    let target = match name {
        "now" => return Some(DateValue::DateTime(Local::now().naive_local())),
        "today" => return Some(DateValue::Date(today)),
        "tomorrow" => return Some(DateValue::Date(today + Duration::days(1))),
        "monday" => Weekday::Mon,
        "tuesday" => Weekday::Tue,
        "wednesday" => Weekday::Wed,
        "thursday" => Weekday::Thu,
        "friday" => Weekday::Fri,
        "saturday" => Weekday::Sat,
        "sunday" => Weekday::Sun,
        _ => return None,
    };
    Some(DateValue::Date(next_weekday(today, target)))
}

/// Returns the next occurrence of `target` strictly after `today`.
fn next_weekday(today: NaiveDate, target: Weekday) -> NaiveDate {
    let tomorrow = today + Duration::days(1);
    let offset = (7 + i64::from(target.num_days_from_monday())
        - i64::from(tomorrow.weekday().num_days_from_monday()))
        % 7;
    tomorrow + Duration::days(offset)
}

fn invalid_format(input: &str, syntax: &Syntax) -> DateError {
    DateError::InvalidFormat {
        input: input.to_string(),
        date_format: syntax.date_format.clone(),
        datetime_format: syntax.datetime_format.clone(),
        synonyms: DATE_SYNONYMS.iter().map(|s| s.to_string()).collect(),
    }
}
