// src/validation.rs
use chrono::NaiveDate;
use regex::Regex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static EMAIL_RE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+\-]+@[A-Za-z0-9\-]+(\.[A-Za-z0-9\-]+)*\.[A-Za-z]{2,}$").ok()
});

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Field path (dot-joined, e.g. `exercises.0.name`) to message.
///
/// An empty map means the form validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<String, String>);

impl FieldErrors {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message for `path`. The first message for a path wins.
    pub fn add(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.0.entry(path.into()).or_insert_with(|| message.into());
    }

    pub fn clear_field(&mut self, path: &str) {
        self.0.remove(path);
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.0.get(path).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains_key(path)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// `Ok(value)` when no errors were collected.
    /// # Errors
    /// Returns `self` when at least one field failed.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (path, message) in &self.0 {
            if !first {
                writeln!(f)?;
            }
            write!(f, "{path}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

/// `^\d+$` over ASCII digits.
#[must_use]
pub fn is_digits(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Narrow-input rule for numeric text fields: empty or digits only.
#[must_use]
pub fn accepts_numeric_input(value: &str) -> bool {
    value.is_empty() || is_digits(value)
}

/// Coerces a `YYYY-MM-DD` form value into a date. Blank or malformed input is `None`.
#[must_use]
pub fn parse_form_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).ok()
}

#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE
        .as_ref()
        .is_some_and(|re| re.is_match(value.trim()))
}

/// A non-blank numeric form value that did not parse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{0}' is not a valid number")]
pub struct InvalidNumber(pub String);

/// Parses an optional non-negative integer field; blank is `Ok(None)`.
/// # Errors
/// Returns [`InvalidNumber`] for anything that is not a `u32`.
pub fn parse_optional_int(value: &str) -> Result<Option<u32>, InvalidNumber> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<u32>()
        .map(Some)
        .map_err(|_| InvalidNumber(trimmed.to_string()))
}

/// Parses an optional non-negative decimal field; blank is `Ok(None)`.
/// # Errors
/// Returns [`InvalidNumber`] for negative, non-finite or malformed input.
pub fn parse_optional_float(value: &str) -> Result<Option<f64>, InvalidNumber> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(Some(v)),
        _ => Err(InvalidNumber(trimmed.to_string())),
    }
}

impl FieldErrors {
    /// Optional integer field; a bad value records `message` under `path`.
    pub(crate) fn optional_int(&mut self, path: &str, value: &str, message: &str) -> Option<u32> {
        self.record_invalid(path, message, parse_optional_int(value))
    }

    /// Optional decimal field; a bad value records `message` under `path`.
    pub(crate) fn optional_float(&mut self, path: &str, value: &str, message: &str) -> Option<f64> {
        self.record_invalid(path, message, parse_optional_float(value))
    }

    fn record_invalid<T>(
        &mut self,
        path: &str,
        message: &str,
        parsed: Result<Option<T>, InvalidNumber>,
    ) -> Option<T> {
        parsed.unwrap_or_else(|InvalidNumber(raw)| {
            tracing::debug!(field = path, %raw, "Rejected numeric field");
            self.add(path, message);
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digits_only() {
        assert!(is_digits("0"));
        assert!(is_digits("045"));
        assert!(!is_digits(""));
        assert!(!is_digits("3a"));
        assert!(!is_digits("-3"));
        assert!(!is_digits(" 3"));
        assert!(!is_digits("٣")); // non-ASCII digit
    }

    #[test]
    fn numeric_input_accepts_blank() {
        assert!(accepts_numeric_input(""));
        assert!(accepts_numeric_input("12"));
        assert!(!accepts_numeric_input("1.5"));
    }

    #[test]
    fn form_dates() {
        assert_eq!(
            parse_form_date("2025-03-20"),
            NaiveDate::from_ymd_opt(2025, 3, 20)
        );
        assert_eq!(parse_form_date(""), None);
        assert_eq!(parse_form_date("2025-02-30"), None);
        assert_eq!(parse_form_date("yesterday"), None);
    }

    #[test]
    fn emails() {
        assert!(is_valid_email("john.doe@example.com"));
        assert!(!is_valid_email("john.doe@"));
        assert!(!is_valid_email("not an email"));
    }

    #[test]
    fn optional_numbers() {
        assert_eq!(parse_optional_int(" "), Ok(None));
        assert_eq!(parse_optional_int(" 32 "), Ok(Some(32)));
        assert_eq!(
            parse_optional_int("3.5"),
            Err(InvalidNumber("3.5".to_string()))
        );
        assert_eq!(parse_optional_float("72.5"), Ok(Some(72.5)));
        assert!(parse_optional_float("-1").is_err());
        assert!(parse_optional_float("NaN").is_err());
    }

    #[test]
    fn optional_field_records_message_once() {
        let mut errors = FieldErrors::new();
        assert_eq!(errors.optional_int("age", "", "bad age"), None);
        assert!(errors.is_empty());
        assert_eq!(errors.optional_int("age", "abc", "bad age"), None);
        assert_eq!(errors.optional_float("height", "180.5", "bad height"), Some(180.5));
        assert_eq!(errors.get("age"), Some("bad age"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn first_message_per_path_wins() {
        let mut errors = FieldErrors::new();
        errors.add("title", "first");
        errors.add("title", "second");
        assert_eq!(errors.get("title"), Some("first"));
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.to_string(), "title: first");
    }
}
