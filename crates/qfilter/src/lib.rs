//! Text-query filter engine.
//!
//! Compiles one-line queries such as `brand:ferrari & year>=2015 | #favorite`
//! into an immutable [`Filter`] and evaluates it against any item type through
//! a caller-supplied [`Tester`].
//!
//! # Quick Start
//!
//! ```
//! use qfilter::prelude::*;
//! use serde_json::json;
//!
//! let filter = qfilter::parse("brand:ferrari & year>=2015");
//! let tester = JsonTester::default();
//!
//! assert!(filter.test(&tester, &json!({ "brand": "Ferrari", "year": 2017 })));
//! assert!(!filter.test(&tester, &json!({ "brand": "Porsche", "year": 2017 })));
//! ```

pub mod config;
pub mod filter;
pub mod json;
pub mod prelude;

pub use filter::{
    parse, Filter, FilterParser, FilterTreeNode, Recognizer, Recognizers, TestEntry, Tester,
    Value,
};
