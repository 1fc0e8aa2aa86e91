//! File size recognizer backed by `parse-size`.

use parse_size::parse_size;

use super::{CommonKeys, Recognizer};
use crate::filter::entry::{number_prefix_len, TestEntry};
use crate::filter::splitter::Operator;

/// Default keys claimed by the file size recognizer.
pub const SIZE_KEYS: &[&str] = &["size", "filesize"];

const SIZE_SUFFIXES: &[&str] = &["kb", "mb", "gb", "tb"];

/// Recognizes readable sizes such as `2mb` or `1.5 GB`, compared in bytes.
///
/// Multipliers are decimal: `2mb` is 2 000 000 bytes.
#[derive(Debug, Clone)]
pub struct FileSizeRecognizer {
    keys: CommonKeys,
}

impl Default for FileSizeRecognizer {
    fn default() -> Self {
        Self::new(SIZE_KEYS)
    }
}

impl FileSizeRecognizer {
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

    /// Parses a readable size into bytes.
    pub fn parse(value: &str) -> Option<u64> {
        parse_size(value.trim()).ok()
    }
}

impl Recognizer for FileSizeRecognizer {
    fn test_value(&self, raw: &str) -> bool {
        let raw = raw.trim();
        let len = number_prefix_len(raw);
        if len == 0 {
            return false;
        }
        let suffix = raw[len..].trim_start().to_ascii_lowercase();
        SIZE_SUFFIXES.contains(&suffix.as_str())
    }

    fn test_common_key(&self, key: &str) -> bool {
        self.keys.contains(key)
    }

    fn create(&self, operator: Operator, value: &str) -> Option<TestEntry> {
        let comparison = operator.comparison()?;
        let bytes = Self::parse(value)?;
        Some(TestEntry::number(comparison, bytes as f64))
    }
}
