//! Typed comparison predicates.
//!
//! A [`TestEntry`] is the unit of comparison stored in every leaf of a
//! [`FilterTreeNode`](super::FilterTreeNode). Testers hand it a [`Value`] in one of
//! five representations and the entry applies its coercion rules:
//!
//! - boolean → number: `true` is `1.0`, `false` is `0.0`
//! - date/time → number: seconds since midnight
//! - duration → number: total seconds
//! - string → native type: parsed per entry kind, a failed parse never matches

use std::borrow::Cow;
use std::fmt;

use chrono::{NaiveDateTime, TimeDelta, Timelike};
use regex::Regex;

use super::units::{date, duration};

/// Absolute tolerance used for numeric equality.
pub const NUMBER_TOLERANCE: f64 = 1e-4;

/// A value produced by a tester for comparison against a [`TestEntry`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    /// Text value.
    Str(&'a str),
    /// Numeric value.
    Num(f64),
    /// Boolean value.
    Bool(bool),
    /// Time span.
    Duration(TimeDelta),
    /// Calendar date and time of day.
    DateTime(NaiveDateTime),
}

impl Value<'_> {
    /// Coerces the value to a number using the canonical rules.
    ///
    /// Strings contribute their leading number (`"12.5 km"` is `12.5`).
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Str(s) => parse_leading_number(s),
            Value::Num(n) => Some(*n),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Duration(d) => Some(duration_seconds(*d)),
            Value::DateTime(dt) => Some(time_of_day_seconds(dt)),
        }
    }

    /// Returns the display text string and regex entries match against.
    pub fn to_text(&self) -> Cow<'_, str> {
        match self {
            Value::Str(s) => Cow::Borrowed(s),
            Value::Num(n) => Cow::Owned(format_number(*n)),
            Value::Bool(b) => Cow::Borrowed(if *b { "true" } else { "false" }),
            Value::Duration(d) => Cow::Owned(format_duration(*d)),
            Value::DateTime(dt) => Cow::Owned(dt.format("%Y-%m-%dT%H:%M:%S").to_string()),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(value: &'a str) -> Self {
        Value::Str(value)
    }
}

impl From<f64> for Value<'_> {
    fn from(value: f64) -> Self {
        Value::Num(value)
    }
}

impl From<i64> for Value<'_> {
    fn from(value: i64) -> Self {
        Value::Num(value as f64)
    }
}

impl From<bool> for Value<'_> {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<TimeDelta> for Value<'_> {
    fn from(value: TimeDelta) -> Self {
        Value::Duration(value)
    }
}

impl From<NaiveDateTime> for Value<'_> {
    fn from(value: NaiveDateTime) -> Self {
        Value::DateTime(value)
    }
}

/// Ordering comparison used by numeric, duration and date entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Comparison {
    /// Actual value is less than the expected one.
    Less,
    /// Actual value is greater than the expected one.
    More,
    /// Values are equal (within [`NUMBER_TOLERANCE`] for floats).
    Equal,
    /// Actual value is less than or equal to the expected one.
    LessEqual,
    /// Actual value is greater than or equal to the expected one.
    MoreEqual,
}

impl Comparison {
    /// Compares `actual` against `expected`.
    pub fn compare(self, actual: f64, expected: f64) -> bool {
        let equal = (actual - expected).abs() < NUMBER_TOLERANCE;
        match self {
            Comparison::Less => actual < expected && !equal,
            Comparison::More => actual > expected && !equal,
            Comparison::Equal => equal,
            Comparison::LessEqual => actual < expected || equal,
            Comparison::MoreEqual => actual > expected || equal,
        }
    }

    /// Compares an integral difference `actual - expected` against zero.
    pub fn compare_delta(self, delta: i64) -> bool {
        match self {
            Comparison::Less => delta < 0,
            Comparison::More => delta > 0,
            Comparison::Equal => delta == 0,
            Comparison::LessEqual => delta <= 0,
            Comparison::MoreEqual => delta >= 0,
        }
    }

    /// Returns the operator symbol for display.
    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::Less => "<",
            Comparison::More => ">",
            Comparison::Equal => "=",
            Comparison::LessEqual => "<=",
            Comparison::MoreEqual => ">=",
        }
    }
}

/// A predicate testable against every [`Value`] representation.
#[derive(Debug, Clone)]
pub enum TestEntry {
    /// Case-insensitive substring or whole-string match.
    ///
    /// `text` is stored already folded (see [`TestEntry::string`]).
    String {
        /// Folded needle.
        text: String,
        /// Whole-string match instead of substring.
        whole: bool,
        /// Disables separator folding.
        strict: bool,
    },

    /// Compiled regular expression.
    Regex(Regex),

    /// Numeric comparison.
    Number {
        /// How the tested value relates to `value`.
        comparison: Comparison,
        /// Expected value.
        value: f64,
    },

    /// Truthiness check.
    Bool(bool),

    /// Fixed result regardless of the tested value.
    Const(bool),

    /// Time span comparison.
    ///
    /// Tested values are read in seconds: numbers are seconds and a bare number
    /// in a string is seconds too. The recognizer's default unit applies to the
    /// query literal only.
    Duration {
        /// How the tested value relates to `value`.
        comparison: Comparison,
        /// Expected span.
        value: TimeDelta,
    },

    /// Date comparison, by minutes when `exact` and by calendar days otherwise.
    DateTime {
        /// How the tested value relates to `value`.
        comparison: Comparison,
        /// Expected moment.
        value: NaiveDateTime,
        /// Whether the expected moment carried a time of day.
        exact: bool,
    },
}

impl TestEntry {
    /// Creates a string entry, folding `text` the same way tested values are folded.
    pub fn string(text: &str, whole: bool, strict: bool) -> Self {
        TestEntry::String {
            text: fold(text, strict),
            whole,
            strict,
        }
    }

    /// Creates a numeric entry.
    pub fn number(comparison: Comparison, value: f64) -> Self {
        TestEntry::Number { comparison, value }
    }

    /// Tests a value against this entry.
    pub fn test(&self, value: &Value<'_>) -> bool {
        match self {
            TestEntry::String {
                text,
                whole,
                strict,
            } => {
                let haystack = fold(&value.to_text(), *strict);
                if *whole {
                    haystack == *text
                } else {
                    haystack.contains(text.as_str())
                }
            }
            TestEntry::Regex(regex) => regex.is_match(&value.to_text()),
            TestEntry::Number {
                comparison,
                value: expected,
            } => value
                .as_number()
                .is_some_and(|actual| comparison.compare(actual, *expected)),
            TestEntry::Bool(expected) => truthiness(value) == *expected,
            TestEntry::Const(result) => *result,
            TestEntry::Duration {
                comparison,
                value: expected,
            } => {
                let actual = match value {
                    Value::Str(s) => duration::parse_duration(s, duration::DEFAULT_UNIT)
                        .map(duration_seconds),
                    other => other.as_number(),
                };
                actual.is_some_and(|actual| comparison.compare(actual, duration_seconds(*expected)))
            }
            TestEntry::DateTime {
                comparison,
                value: expected,
                exact,
            } => {
                let actual = match value {
                    Value::DateTime(dt) => *dt,
                    Value::Str(s) => match date::parse_date(s) {
                        Some((dt, _)) => dt,
                        None => return false,
                    },
                    _ => return false,
                };
                let delta = if *exact {
                    (actual - *expected).num_minutes()
                } else {
                    (actual.date() - expected.date()).num_days()
                };
                comparison.compare_delta(delta)
            }
        }
    }
}

impl PartialEq for TestEntry {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                TestEntry::String {
                    text: a,
                    whole: aw,
                    strict: as_,
                },
                TestEntry::String {
                    text: b,
                    whole: bw,
                    strict: bs,
                },
            ) => a == b && aw == bw && as_ == bs,
            (TestEntry::Regex(a), TestEntry::Regex(b)) => a.as_str() == b.as_str(),
            (
                TestEntry::Number {
                    comparison: ac,
                    value: av,
                },
                TestEntry::Number {
                    comparison: bc,
                    value: bv,
                },
            ) => ac == bc && av == bv,
            (TestEntry::Bool(a), TestEntry::Bool(b)) => a == b,
            (TestEntry::Const(a), TestEntry::Const(b)) => a == b,
            (
                TestEntry::Duration {
                    comparison: ac,
                    value: av,
                },
                TestEntry::Duration {
                    comparison: bc,
                    value: bv,
                },
            ) => ac == bc && av == bv,
            (
                TestEntry::DateTime {
                    comparison: ac,
                    value: av,
                    exact: ae,
                },
                TestEntry::DateTime {
                    comparison: bc,
                    value: bv,
                    exact: be,
                },
            ) => ac == bc && av == bv && ae == be,
            _ => false,
        }
    }
}

impl fmt::Display for TestEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TestEntry::String { text, whole, .. } => {
                if *whole {
                    write!(f, "equals({text:?})")
                } else {
                    write!(f, "contains({text:?})")
                }
            }
            TestEntry::Regex(regex) => write!(f, "/{}/", regex.as_str()),
            TestEntry::Number { comparison, value } => {
                write!(f, "{} {}", comparison.symbol(), format_number(*value))
            }
            TestEntry::Bool(b) => write!(f, "{}", if *b { "+" } else { "-" }),
            TestEntry::Const(b) => write!(f, "const({b})"),
            TestEntry::Duration { comparison, value } => {
                write!(f, "{} {}", comparison.symbol(), format_duration(*value))
            }
            TestEntry::DateTime {
                comparison,
                value,
                exact,
            } => {
                let shown = if *exact {
                    value.format("%Y-%m-%dT%H:%M").to_string()
                } else {
                    value.format("%Y-%m-%d").to_string()
                };
                write!(f, "{} {}", comparison.symbol(), shown)
            }
        }
    }
}

/// Lower-cases `text`; unless `strict`, also maps `_`, `-` and whitespace to a space.
fn fold(text: &str, strict: bool) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .map(|c| {
            if !strict && (c == '_' || c == '-' || c.is_whitespace()) {
                ' '
            } else {
                c
            }
        })
        .collect()
}

fn truthiness(value: &Value<'_>) -> bool {
    match value {
        Value::Str(s) => {
            let s = s.trim();
            !(s.is_empty()
                || s == "0"
                || ["false", "no", "off"]
                    .iter()
                    .any(|word| s.eq_ignore_ascii_case(word)))
        }
        Value::Num(n) => *n != 0.0,
        Value::Bool(b) => *b,
        Value::Duration(d) => !d.is_zero(),
        Value::DateTime(_) => true,
    }
}

pub(crate) fn duration_seconds(d: TimeDelta) -> f64 {
    d.num_milliseconds() as f64 / 1000.0
}

fn time_of_day_seconds(dt: &NaiveDateTime) -> f64 {
    let time = dt.time();
    time.num_seconds_from_midnight() as f64 + f64::from(time.nanosecond()) / 1e9
}

pub(crate) fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

fn format_duration(d: TimeDelta) -> String {
    let total = d.num_seconds();
    let (sign, total) = if total < 0 { ("-", -total) } else { ("", total) };
    format!(
        "{sign}{}:{:02}:{:02}",
        total / 3600,
        (total / 60) % 60,
        total % 60
    )
}

/// Returns the byte length of the number at the start of `s`, or 0.
///
/// Accepts an optional sign, digits with an optional fraction and an optional
/// exponent.
pub(crate) fn number_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let len = bytes.len();
    let mut i = 0;
    if i < len && (bytes[i] == b'-' || bytes[i] == b'+') {
        i += 1;
    }
    let int_start = i;
    while i < len && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;
    if i < len && bytes[i] == b'.' {
        let mut j = i + 1;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        let fraction = j - i - 1;
        if digits > 0 || fraction > 0 {
            digits += fraction;
            i = j;
        }
    }
    if digits == 0 {
        return 0;
    }
    if i < len && (bytes[i] == b'e' || bytes[i] == b'E') {
        let mut j = i + 1;
        if j < len && (bytes[j] == b'-' || bytes[j] == b'+') {
            j += 1;
        }
        let exp_start = j;
        while j < len && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }
    i
}

/// Parses `s` as a number when the whole (trimmed) string is one.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let s = s.trim();
    let len = number_prefix_len(s);
    if len == 0 || len != s.len() {
        return None;
    }
    s.parse().ok()
}

/// Parses the number at the start of `s`, ignoring anything after it.
pub(crate) fn parse_leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let len = number_prefix_len(s);
    if len == 0 {
        return None;
    }
    s[..len].parse().ok()
}
