//! Convenient re-exports of the most commonly used types.
//!
//! ```
//! use qfilter::prelude::*;
//! ```

pub use crate::config::{RecognizerConfig, UnitConfig, UnitKind};
pub use crate::filter::{
    Comparison, Filter, FilterParser, FilterTreeNode, Operator, Recognizer, Recognizers,
    TestEntry, Tester, Value,
};
pub use crate::json::JsonTester;
