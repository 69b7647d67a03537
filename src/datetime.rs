use std::borrow::Cow;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};

use crate::{validate::Validator, SetupError, ValidationError};

/// Tried in order by [`DateTimeValidator::default`].
pub const DEFAULT_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%z",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d",
];

/// A parsed date-time, with an offset if the token carried one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateTimeValue {
    Naive(NaiveDateTime),
    Offset(DateTime<FixedOffset>),
}

impl DateTimeValue {
    pub fn naive_local(&self) -> NaiveDateTime {
        match self {
            DateTimeValue::Naive(it) => *it,
            DateTimeValue::Offset(it) => it.naive_local(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DateTimeValidator {
    formats: Vec<String>,
}

impl DateTimeValidator {
    pub fn new<I>(formats: I) -> Result<Self, SetupError>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let formats = formats.into_iter().map(Into::into).collect::<Vec<String>>();
        if formats.is_empty() {
            return Err(setup_err!("Invalid formats: At least one format is required."));
        }
        Ok(Self { formats })
    }

    pub fn formats(&self) -> &[String] {
        &self.formats
    }
}

impl Default for DateTimeValidator {
    fn default() -> Self {
        Self { formats: DEFAULT_FORMATS.iter().map(|it| it.to_string()).collect() }
    }
}

impl Validator for DateTimeValidator {
    type Output = DateTimeValue;

    fn validate(&self, token: &str) -> Result<DateTimeValue, ValidationError> {
        if let Some(value) = self.formats.iter().find_map(|format| parse_with(token, format)) {
            return Ok(value);
        }
        let formats = self.formats.iter().map(|it| format!("'{it}'")).collect::<Vec<_>>();
        let msg = if formats.len() < 2 {
            format!("'{token}' does not match date-time format {}.", formats.join(", "))
        } else {
            format!("'{token}' does not match any of date-time formats {}.", formats.join(", "))
        };
        Err(ValidationError::new(msg))
    }
}

fn parse_with(token: &str, format: &str) -> Option<DateTimeValue> {
    // `Z` stands for a zero UTC offset.
    let token = match token.strip_suffix('Z') {
        Some(rest) if format.ends_with("%z") => Cow::Owned(format!("{rest}+00:00")),
        _ => Cow::Borrowed(token),
    };
    if let Ok(it) = DateTime::parse_from_str(&token, format) {
        return Some(DateTimeValue::Offset(it));
    }
    if let Ok(it) = NaiveDateTime::parse_from_str(&token, format) {
        return Some(DateTimeValue::Naive(it));
    }
    // Date-only formats never yield a time of day.
    let date = NaiveDate::parse_from_str(&token, format).ok()?;
    date.and_hms_opt(0, 0, 0).map(DateTimeValue::Naive)
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn default_formats() {
        let v = DateTimeValidator::default();

        let it = v.validate("2025-01-01T20:00:00.250000+08:00").unwrap();
        let DateTimeValue::Offset(it) = it else { panic!("expected an offset: {it:?}") };
        assert_eq!(it.offset().local_minus_utc(), 8 * 3600);
        assert_eq!(it.nanosecond(), 250_000_000);

        for token in ["2025-01-01T20:00:00Z", "2025-01-01T20:00:00.5Z"] {
            let it = v.validate(token).unwrap();
            let DateTimeValue::Offset(it) = it else { panic!("expected an offset: {it:?}") };
            assert_eq!(it.offset().local_minus_utc(), 0);
            assert_eq!(it.naive_local().hour(), 20);
        }

        let it = v.validate("2025-01-01T20:00:00").unwrap();
        assert!(matches!(it, DateTimeValue::Naive(_)));
        assert_eq!(it.naive_local().hour(), 20);

        let it = v.validate("2025-02-03").unwrap().naive_local();
        assert_eq!((it.year(), it.month(), it.day(), it.hour()), (2025, 2, 3, 0));
    }

    #[test]
    fn rejects() {
        let v = DateTimeValidator::new(["%d/%m/%Y"]).unwrap();
        assert!(v.validate("03/02/2025").is_ok());
        assert_eq!(
            v.validate("2025-02-03").unwrap_err().to_string(),
            "'2025-02-03' does not match date-time format '%d/%m/%Y'."
        );

        let err = DateTimeValidator::default().validate("yesterday").unwrap_err();
        assert!(err.to_string().starts_with("'yesterday' does not match any of date-time formats"));

        assert!(DateTimeValidator::new(Vec::<String>::new()).is_err());
    }
}
