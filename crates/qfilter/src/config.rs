//! Serializable recognizer configuration.
//!
//! Every section is optional; missing sections keep the built-in keys.
//!
//! ```toml
//! [date]
//! keys = ["date", "released"]
//!
//! [duration]
//! default_unit = "min"
//!
//! [[unit]]
//! kind = "speed"
//! keys = ["speed", "topspeed"]
//! ```

use serde::{Deserialize, Serialize};

use crate::filter::units::{
    date::DATE_KEYS, duration, size::SIZE_KEYS, unit, unit::DISTANCE_KEYS, DateRecognizer,
    DurationRecognizer, FileSizeRecognizer, Recognizers, UnitRecognizer,
};

/// Configuration for the recognizers a parser consults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizerConfig {
    /// Date recognizer.
    #[serde(default)]
    pub date: KeysConfig,

    /// Distance recognizer.
    #[serde(default)]
    pub distance: KeysConfig,

    /// File size recognizer.
    #[serde(default)]
    pub size: KeysConfig,

    /// Duration recognizer.
    #[serde(default)]
    pub duration: DurationConfig,

    /// Extra unit recognizers, consulted after the built-in ones.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unit: Vec<UnitConfig>,
}

/// Common keys of a built-in recognizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeysConfig {
    /// Replaces the built-in keys when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,
}

/// Duration recognizer settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DurationConfig {
    /// Replaces the built-in keys when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<Vec<String>>,

    /// Unit of bare numbers, such as `s`, `min` or `h`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_unit: Option<String>,
}

/// An extra unit recognizer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitConfig {
    /// Unit table to use.
    pub kind: UnitKind,
    /// Keys the recognizer claims; empty keeps the table's default keys.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keys: Vec<String>,
}

/// Unit tables available for extra recognizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitKind {
    /// Meters.
    Distance,
    /// Kilometers per hour.
    Speed,
    /// Brake horsepower.
    Power,
    /// Newton meters.
    Torque,
    /// Kilograms.
    Weight,
}

impl UnitKind {
    /// Keys claimed when none are configured.
    pub fn default_keys(self) -> &'static [&'static str] {
        match self {
            UnitKind::Distance => unit::DISTANCE_KEYS,
            UnitKind::Speed => unit::SPEED_KEYS,
            UnitKind::Power => unit::POWER_KEYS,
            UnitKind::Torque => unit::TORQUE_KEYS,
            UnitKind::Weight => unit::WEIGHT_KEYS,
        }
    }

    /// Builds the recognizer for this table, using the default keys when
    /// `keys` is empty.
    pub fn recognizer(self, keys: &[String]) -> UnitRecognizer {
        let keys: Vec<&str> = if keys.is_empty() {
            self.default_keys().to_vec()
        } else {
            keys.iter().map(String::as_str).collect()
        };
        match self {
            UnitKind::Distance => UnitRecognizer::distance(keys),
            UnitKind::Speed => UnitRecognizer::speed(keys),
            UnitKind::Power => UnitRecognizer::power(keys),
            UnitKind::Torque => UnitRecognizer::torque(keys),
            UnitKind::Weight => UnitRecognizer::weight(keys),
        }
    }
}

impl RecognizerConfig {
    /// Builds the recognizer list: date, distance, file size and duration,
    /// then the extra units in file order.
    pub fn build(&self) -> Recognizers {
        let date = self.date.keys.as_deref();
        let distance = self.distance.keys.as_deref();
        let size = self.size.keys.as_deref();
        let durations = self.duration.keys.as_deref();

        let mut recognizers = Recognizers::empty()
            .with(match date {
                Some(keys) => DateRecognizer::new(keys),
                None => DateRecognizer::new(DATE_KEYS),
            })
            .with(match distance {
                Some(keys) => UnitRecognizer::distance(keys),
                None => UnitRecognizer::distance(DISTANCE_KEYS),
            })
            .with(match size {
                Some(keys) => FileSizeRecognizer::new(keys),
                None => FileSizeRecognizer::new(SIZE_KEYS),
            })
            .with(
                match durations {
                    Some(keys) => DurationRecognizer::new(keys),
                    None => DurationRecognizer::default(),
                }
                .with_default_unit(self.duration_unit()),
            );

        for unit in &self.unit {
            recognizers.push(unit.kind.recognizer(&unit.keys));
        }
        recognizers
    }

    /// Seconds per bare duration number.
    ///
    /// An unknown unit falls back to seconds.
    pub fn duration_unit(&self) -> f64 {
        let Some(unit) = self.duration.default_unit.as_deref() else {
            return duration::DEFAULT_UNIT;
        };
        duration::unit_seconds(unit).unwrap_or_else(|| {
            tracing::warn!(unit, "unknown duration unit, using seconds");
            duration::DEFAULT_UNIT
        })
    }
}
