//! [`Tester`] for JSON records.

use serde_json::Value as Json;

use crate::filter::{Filter, TestEntry, Tester, Value};

/// Fields a keyless value is tested against when none are configured.
pub const DEFAULT_FIELDS: &[&str] = &["name", "id", "title"];

/// Evaluates filters against [`serde_json::Value`] records.
///
/// Keys look up object fields, exact match first and then ignoring case.
/// Arrays match when any element matches; an empty array, `null` or a missing
/// field is tested as an empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonTester {
    default_fields: Vec<String>,
}

impl Default for JsonTester {
    fn default() -> Self {
        Self::new(DEFAULT_FIELDS.iter().copied())
    }
}

impl JsonTester {
    /// Creates a tester using `default_fields` for keyless values.
    pub fn new<I, S>(default_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            default_fields: default_fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Fields keyless values are tested against, in order.
    pub fn default_fields(&self) -> &[String] {
        &self.default_fields
    }

    /// Looks up a field of an object record.
    pub fn field<'j>(record: &'j Json, key: &str) -> Option<&'j Json> {
        let object = record.as_object()?;
        object.get(key).or_else(|| {
            object
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(key))
                .map(|(_, value)| value)
        })
    }
}

impl Tester<Json> for JsonTester {
    fn test(&self, item: &Json, key: Option<&str>, entry: &TestEntry) -> bool {
        match key {
            Some(key) => match Self::field(item, key) {
                Some(value) => test_json(value, entry),
                None => entry.test(&Value::Str("")),
            },
            None if item.is_object() => self
                .default_fields
                .iter()
                .filter_map(|name| Self::field(item, name))
                .any(|value| test_json(value, entry)),
            None => test_json(item, entry),
        }
    }

    fn test_child(&self, item: &Json, key: &str, filter: &Filter) -> bool {
        match Self::field(item, key) {
            Some(Json::Array(children)) => children.iter().any(|child| filter.test(self, child)),
            Some(child @ Json::Object(_)) => filter.test(self, child),
            _ => false,
        }
    }
}

fn test_json(value: &Json, entry: &TestEntry) -> bool {
    match value {
        Json::Null => entry.test(&Value::Str("")),
        Json::Bool(b) => entry.test(&Value::Bool(*b)),
        Json::Number(n) => n.as_f64().is_some_and(|n| entry.test(&Value::Num(n))),
        Json::String(s) => entry.test(&Value::Str(s)),
        Json::Array(items) if items.is_empty() => entry.test(&Value::Str("")),
        Json::Array(items) => items.iter().any(|item| test_json(item, entry)),
        // Objects only answer truthiness.
        Json::Object(_) => matches!(entry, TestEntry::Bool(true) | TestEntry::Const(true)),
    }
}
