//! Generic `<number><postfix>` recognizer.
//!
//! The postfix is the run of letters (and `/`) directly after the number, cut to
//! at most `max_postfix` characters, lower-cased and stripped of `/`. The cut
//! decides which table entry a long unit word lands on: with the default four
//! letters `inches` is read as `inch` and `kilometers` as `kilo`.

use std::fmt;

use super::{CommonKeys, Recognizer};
use crate::filter::entry::{number_prefix_len, TestEntry};
use crate::filter::splitter::Operator;

/// Maps a normalized postfix to the multiplier into the base unit.
pub type Convert = fn(&str) -> Option<f64>;

/// Default keys claimed by the distance recognizer.
pub const DISTANCE_KEYS: &[&str] = &["length", "len", "distance"];
/// Default keys claimed by the speed recognizer.
pub const SPEED_KEYS: &[&str] = &["speed", "topspeed", "maxspeed"];
/// Default keys claimed by the power recognizer.
pub const POWER_KEYS: &[&str] = &["power", "bhp"];
/// Default keys claimed by the torque recognizer.
pub const TORQUE_KEYS: &[&str] = &["torque"];
/// Default keys claimed by the weight recognizer.
pub const WEIGHT_KEYS: &[&str] = &["weight", "mass"];

/// Recognizer converting unit-suffixed numbers into a base unit.
#[derive(Clone)]
pub struct UnitRecognizer {
    name: &'static str,
    keys: CommonKeys,
    convert: Convert,
    max_postfix: usize,
}

impl fmt::Debug for UnitRecognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitRecognizer")
            .field("name", &self.name)
            .field("keys", &self.keys)
            .field("max_postfix", &self.max_postfix)
            .finish()
    }
}

impl UnitRecognizer {
    /// Default number of postfix characters scanned.
    pub const DEFAULT_MAX_POSTFIX: usize = 4;

    /// Creates a recognizer from a postfix table.
    pub fn new<I, S>(name: &'static str, keys: I, convert: Convert) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name,
            keys: CommonKeys::new(keys),
            convert,
            max_postfix: Self::DEFAULT_MAX_POSTFIX,
        }
    }

    /// Overrides how many postfix characters are scanned.
    pub fn with_max_postfix(mut self, max_postfix: usize) -> Self {
        self.max_postfix = max_postfix;
        self
    }

    /// Distance in meters.
    pub fn distance<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new("distance", keys, distance_multiplier)
    }

    /// Speed in km/h.
    pub fn speed<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new("speed", keys, speed_multiplier)
    }

    /// Power in bhp.
    pub fn power<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new("power", keys, power_multiplier)
    }

    /// Torque in Nm.
    pub fn torque<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new("torque", keys, torque_multiplier)
    }

    /// Weight in kg.
    pub fn weight<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::new("weight", keys, weight_multiplier)
    }

    /// Name given at construction.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Parses `value` into the base unit.
    ///
    /// A missing postfix means the base unit; an unknown one is a refusal.
    pub fn parse(&self, value: &str) -> Option<f64> {
        self.parse_parts(value).map(|(number, multiplier, _)| number * multiplier)
    }

    /// Returns `(number, multiplier, had_postfix)`.
    fn parse_parts(&self, value: &str) -> Option<(f64, f64, bool)> {
        let value = value.trim();
        let len = number_prefix_len(value);
        if len == 0 {
            return None;
        }
        let number: f64 = value[..len].parse().ok()?;
        let rest = &value[len..];

        let postfix: String = rest
            .chars()
            .take_while(|c| c.is_ascii_alphabetic() || *c == '/')
            .take(self.max_postfix)
            .filter(|c| *c != '/')
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if postfix.is_empty() {
            if rest.is_empty() {
                return Some((number, 1.0, false));
            }
            return None;
        }

        let multiplier = (self.convert)(&postfix)?;
        Some((number, multiplier, true))
    }
}

impl Recognizer for UnitRecognizer {
    fn test_value(&self, raw: &str) -> bool {
        matches!(self.parse_parts(raw), Some((_, _, true)))
    }

    fn test_common_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn create(&self, operator: Operator, value: &str) -> Option<TestEntry> {
        let comparison = operator.comparison()?;
        let value = self.parse(value)?;
        Some(TestEntry::number(comparison, value))
    }
}

fn distance_multiplier(postfix: &str) -> Option<f64> {
    match postfix {
        "mi" | "mile" => Some(1609.34),
        "km" | "kilo" => Some(1000.0),
        "m" => Some(1.0),
        "yd" | "yard" => Some(0.9144),
        "ft" | "foot" | "feet" => Some(0.3048),
        "in" | "inch" => Some(0.0254),
        "cm" | "cent" => Some(0.01),
        "mm" | "mill" => Some(0.001),
        _ => None,
    }
}

fn speed_multiplier(postfix: &str) -> Option<f64> {
    match postfix {
        "kph" | "kmh" => Some(1.0),
        "ms" | "mps" => Some(3.6),
        "knot" => Some(1.852),
        "mph" | "mh" => Some(1.60934),
        "fps" | "fs" => Some(1.09728),
        _ => None,
    }
}

fn power_multiplier(postfix: &str) -> Option<f64> {
    match postfix {
        "hp" | "bhp" => Some(1.0),
        "gw" => Some(1_341_020.0),
        "mw" => Some(1341.02),
        "kw" => Some(1.34102),
        "w" => Some(0.00134102),
        _ => None,
    }
}

fn torque_multiplier(postfix: &str) -> Option<f64> {
    match postfix {
        "nm" => Some(1.0),
        "knm" => Some(1000.0),
        "lbft" | "ftlb" => Some(1.35582),
        "kgm" => Some(9.80665),
        _ => None,
    }
}

fn weight_multiplier(postfix: &str) -> Option<f64> {
    match postfix {
        "kg" | "kilo" => Some(1.0),
        "t" | "tonn" => Some(1000.0),
        "st" | "ston" => Some(6.35029),
        "lb" | "lbs" => Some(0.453592),
        "oz" | "ounc" => Some(0.0283495),
        "g" | "gram" => Some(0.001),
        _ => None,
    }
}
