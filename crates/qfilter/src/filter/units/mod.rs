//! Unit-aware value recognizers.
//!
//! A [`Recognizer`] gets first right of refusal on a literal before the parser
//! falls back to plain numbers and strings. Recognizers are kept in an ordered
//! [`Recognizers`] list handed to the [`FilterParser`](super::FilterParser); the
//! first one that accepts wins, so the order matters where recognizers overlap
//! (`5m` is five meters, not five minutes, because distance comes before
//! duration in the default list).

pub mod date;
pub mod duration;
pub mod size;
pub mod unit;

use std::fmt;
use std::sync::Arc;

pub use date::DateRecognizer;
pub use duration::DurationRecognizer;
pub use size::FileSizeRecognizer;
pub use unit::UnitRecognizer;

use super::entry::TestEntry;
use super::splitter::Operator;

/// A pluggable literal recognizer.
pub trait Recognizer: fmt::Debug + Send + Sync {
    /// Returns true if the raw literal looks like a value of this kind.
    fn test_value(&self, raw: &str) -> bool;

    /// Returns true if a bare property key belongs to this kind.
    fn test_common_key(&self, key: &str) -> bool;

    /// Builds an entry for `value`, or `None` to let the next recognizer try.
    ///
    /// `operator` is never [`Operator::True`] or [`Operator::False`].
    fn create(&self, operator: Operator, value: &str) -> Option<TestEntry>;
}

/// Ordered list of recognizers consulted by the parser.
#[derive(Debug, Clone)]
pub struct Recognizers {
    entries: Vec<Arc<dyn Recognizer>>,
}

impl Default for Recognizers {
    /// Date, distance, file size and duration, in that order.
    fn default() -> Self {
        Self::empty()
            .with(DateRecognizer::default())
            .with(UnitRecognizer::distance(unit::DISTANCE_KEYS))
            .with(FileSizeRecognizer::default())
            .with(DurationRecognizer::default())
    }
}

impl Recognizers {
    /// Creates a list without any recognizer.
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Appends a recognizer after the existing ones.
    pub fn push(&mut self, recognizer: impl Recognizer + 'static) {
        self.entries.push(Arc::new(recognizer));
    }

    /// Appends an already shared recognizer.
    pub fn push_shared(&mut self, recognizer: Arc<dyn Recognizer>) {
        self.entries.push(recognizer);
    }

    /// Builder form of [`Recognizers::push`].
    pub fn with(mut self, recognizer: impl Recognizer + 'static) -> Self {
        self.push(recognizer);
        self
    }

    /// Iterates recognizers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Recognizer>> {
        self.entries.iter()
    }

    /// Number of registered recognizers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no recognizer is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs the recognizers for a literal.
    ///
    /// With a key, recognizers claiming that key go first; then every
    /// recognizer accepting the raw value gets a turn. Both passes keep
    /// registration order.
    pub(crate) fn create(
        &self,
        key: Option<&str>,
        operator: Operator,
        value: &str,
    ) -> Option<TestEntry> {
        if let Some(key) = key {
            let by_key = self
                .iter()
                .filter(|r| r.test_common_key(key))
                .find_map(|r| r.create(operator, value));
            if by_key.is_some() {
                return by_key;
            }
        }

        self.iter()
            .filter(|r| r.test_value(value))
            .find_map(|r| r.create(operator, value))
    }
}

/// Lower-cased property keys a recognizer claims.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommonKeys(Vec<String>);

impl CommonKeys {
    /// Creates the key set, lower-casing every key.
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            keys.into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .collect(),
        )
    }

    /// Returns true if `key` is one of the claimed keys.
    pub fn contains(&self, key: &str) -> bool {
        self.0.iter().any(|k| k.eq_ignore_ascii_case(key))
    }

    /// The claimed keys.
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}
