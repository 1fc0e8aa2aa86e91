//! The adapter a compiled filter calls back into.

use super::ast::Filter;
use super::entry::TestEntry;

/// Resolves properties of domain objects for a [`Filter`].
///
/// Implementations look up the property named by `key`, convert it to a
/// [`Value`](super::Value) and pass it to [`TestEntry::test`]. They must be
/// pure: a filter may call them several times for the same item and keeps no
/// memo of earlier answers.
pub trait Tester<T: ?Sized> {
    /// Tests the property `key` of `item`; `None` means the item's default
    /// text (usually its name).
    fn test(&self, item: &T, key: Option<&str>, entry: &TestEntry) -> bool;

    /// Tests the nested collection `key` of `item` against `filter`.
    ///
    /// Items without nested collections match nothing.
    fn test_child(&self, item: &T, key: &str, filter: &Filter) -> bool {
        let _ = (item, key, filter);
        false
    }
}
