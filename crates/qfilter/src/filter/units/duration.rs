//! Duration recognizer.
//!
//! Two forms are accepted:
//!
//! - colon form with 2 to 4 segments read right to left as seconds, minutes,
//!   hours and days (`1:30`, `1:02:03.5`, `2:00:00:00`)
//! - `<number><unit>` sequences (`90s`, `1h30m`, `2wk`); `ms` aside, a unit is
//!   looked up by its first two letters, so `minutes` is `mi` and `months` is `mo`
//!
//! A number without unit or colon uses the recognizer's default unit.

use chrono::TimeDelta;

use super::{CommonKeys, Recognizer};
use crate::filter::entry::{number_prefix_len, TestEntry};
use crate::filter::splitter::Operator;

/// Default keys claimed by the duration recognizer.
pub const DURATION_KEYS: &[&str] = &["time", "duration", "laptime", "age"];

/// Seconds in the default unit.
pub const DEFAULT_UNIT: f64 = 1.0;

const MINUTE: f64 = 60.0;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;

/// Recognizes durations, compared as time spans.
#[derive(Debug, Clone)]
pub struct DurationRecognizer {
    keys: CommonKeys,
    default_unit: f64,
}

impl Default for DurationRecognizer {
    fn default() -> Self {
        Self::new(DURATION_KEYS)
    }
}

impl DurationRecognizer {
    /// Creates the recognizer claiming `keys`, with seconds as default unit.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keys: CommonKeys::new(keys),
            default_unit: DEFAULT_UNIT,
        }
    }

    /// Sets the unit assumed for bare numbers, in seconds.
    pub fn with_default_unit(mut self, seconds: f64) -> Self {
        self.default_unit = seconds;
        self
    }
}

impl Recognizer for DurationRecognizer {
    fn test_value(&self, raw: &str) -> bool {
        let raw = raw.trim();
        if raw.contains(':') {
            return parse_colon_form(raw).is_some();
        }
        matches!(parse_unit_form(raw, self.default_unit), Some((_, true)))
    }

    fn test_common_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn create(&self, operator: Operator, value: &str) -> Option<TestEntry> {
        let comparison = operator.comparison()?;
        let value = parse_duration(value, self.default_unit)?;
        Some(TestEntry::Duration { comparison, value })
    }
}

/// Returns seconds per unit for a unit word.
pub fn unit_seconds(unit: &str) -> Option<f64> {
    let unit = unit.to_ascii_lowercase();
    let head: String = unit.chars().take(2).collect();
    match head.as_str() {
        "ms" => Some(0.001),
        "y" | "ye" | "yr" => Some(365.0 * DAY),
        "mo" | "mn" => Some(30.0 * DAY),
        "w" | "we" | "wk" => Some(7.0 * DAY),
        "d" | "da" => Some(DAY),
        "h" | "hr" | "ho" => Some(HOUR),
        "m" | "mi" => Some(MINUTE),
        "s" | "sc" | "se" => Some(1.0),
        _ => None,
    }
}

/// Parses a duration, using `default_unit` seconds for a bare number.
pub fn parse_duration(value: &str, default_unit: f64) -> Option<TimeDelta> {
    let value = value.trim();
    let seconds = if value.contains(':') {
        parse_colon_form(value)?
    } else {
        parse_unit_form(value, default_unit)?.0
    };
    if !seconds.is_finite() {
        return None;
    }
    TimeDelta::try_milliseconds((seconds * 1000.0).round() as i64)
}

fn parse_colon_form(value: &str) -> Option<f64> {
    let segments: Vec<&str> = value.split(':').collect();
    if !(2..=4).contains(&segments.len()) {
        return None;
    }

    const MULTIPLIERS: [f64; 4] = [1.0, MINUTE, HOUR, DAY];
    let mut total = 0.0;
    for (index, segment) in segments.iter().rev().enumerate() {
        let valid = if index == 0 {
            !segment.is_empty()
                && segment.chars().all(|c| c.is_ascii_digit() || c == '.')
                && segment.chars().filter(|c| *c == '.').count() <= 1
                && segment.chars().any(|c| c.is_ascii_digit())
        } else {
            !segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())
        };
        if !valid {
            return None;
        }
        let number: f64 = segment.parse().ok()?;
        total += number * MULTIPLIERS[index];
    }
    Some(total)
}

/// Returns the total seconds and whether any explicit unit was present.
fn parse_unit_form(value: &str, default_unit: f64) -> Option<(f64, bool)> {
    let mut rest = value;
    let mut total = 0.0;
    let mut explicit = false;
    let mut parts = 0;

    while !rest.is_empty() {
        let len = number_prefix_len(rest);
        if len == 0 {
            return None;
        }
        let number: f64 = rest[..len].parse().ok()?;
        rest = &rest[len..];

        let unit_len = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        let unit = &rest[..unit_len];
        rest = &rest[unit_len..];
        parts += 1;

        if unit.is_empty() {
            if parts > 1 || !rest.is_empty() {
                return None;
            }
            total += number * default_unit;
        } else {
            total += number * unit_seconds(unit)?;
            explicit = true;
        }
    }

    if parts == 0 {
        return None;
    }
    Some((total, explicit))
}
