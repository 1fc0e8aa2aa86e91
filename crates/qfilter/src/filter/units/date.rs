//! Date recognizer.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use super::{CommonKeys, Recognizer};
use crate::filter::entry::TestEntry;
use crate::filter::splitter::Operator;

/// Default keys claimed by the date recognizer.
pub const DATE_KEYS: &[&str] = &["date", "added", "created", "modified", "updated"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y.%m.%d", "%d.%m.%Y", "%Y/%m/%d", "%d/%m/%Y"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S", "%H:%M"];

/// Recognizes calendar dates, optionally with a time of day.
///
/// A date alone compares by calendar day; a date with `T<time>` compares by
/// minute.
#[derive(Debug, Clone)]
pub struct DateRecognizer {
    keys: CommonKeys,
}

impl Default for DateRecognizer {
    fn default() -> Self {
        Self::new(DATE_KEYS)
    }
}

impl DateRecognizer {
    /// Creates the recognizer claiming `keys`.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: CommonKeys::new(keys),
        }
    }
}

impl Recognizer for DateRecognizer {
    fn test_value(&self, raw: &str) -> bool {
        looks_like_date(raw)
    }

    fn test_common_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn create(&self, operator: Operator, value: &str) -> Option<TestEntry> {
        let comparison = operator.comparison()?;
        match parse_date(value) {
            Some((value, exact)) => Some(TestEntry::DateTime {
                comparison,
                value,
                exact,
            }),
            None if looks_like_date(value) => {
                tracing::debug!(value, "unparsable date, matching nothing");
                Some(TestEntry::Const(false))
            }
            None => None,
        }
    }
}

/// Two dots, two slashes, or dashes at positions 4 and 7.
pub fn looks_like_date(raw: &str) -> bool {
    let raw = raw.trim();
    let date_part = raw.split('T').next().unwrap_or(raw);
    if !date_part.starts_with(|c: char| c.is_ascii_digit()) {
        return false;
    }
    let bytes = date_part.as_bytes();
    date_part.matches('.').count() == 2
        || date_part.matches('/').count() == 2
        || (bytes.len() >= 8 && bytes[4] == b'-' && bytes[7] == b'-')
}

/// Parses a date with an optional `T<time>` suffix.
///
/// Returns the moment and whether it carried a time of day.
pub fn parse_date(raw: &str) -> Option<(NaiveDateTime, bool)> {
    let raw = raw.trim();
    let (date_part, time_part) = match raw.split_once(|c: char| c == 'T' || c == 't') {
        Some((date, time)) => (date, Some(time)),
        None => (raw, None),
    };

    let date = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date_part, format).ok())?;

    match time_part {
        None => Some((date.and_time(NaiveTime::MIN), false)),
        Some(time_part) => {
            let time = TIME_FORMATS
                .iter()
                .find_map(|format| NaiveTime::parse_from_str(time_part, format).ok())?;
            Some((date.and_time(time), true))
        }
    }
}
