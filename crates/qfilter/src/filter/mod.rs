//! Filter expression parser and evaluator.
//!
//! This module compiles a single-line query into an immutable predicate tree
//! and evaluates it against arbitrary items through a [`Tester`].
//!
//! # Supported Syntax
//!
//! ## Plain Values
//! - `ferrari` - Default property contains "ferrari" (case-insensitive, `_`/`-`/space folded)
//! - `ks_*`, `f?x` - Wildcards, matched against the whole value
//! - `"ks_ferrari"` - Whole value equals the text exactly
//! - `'ferr'` - Value contains the text exactly
//! - `` `^ks_\d+` `` - Regular expression
//!
//! ## Properties
//! - `brand:ferrari` - Property contains the value (numbers compare equal)
//! - `brand=ferrari` - Property equals the value
//! - `year>2000`, `year<2000`, `year>=2000`, `year<=2000` - Ordering
//! - `active+`, `active-` - Property is truthy or falsy
//! - `#favorite` - Shorthand for `tag:favorite`
//! - `year>2000,2010` - Later bare values reuse the key: `year>2000 | year:2010`
//!
//! ## Units
//! - `len>5km` - Distances in meters
//! - `size>2mb` - File sizes in bytes
//! - `time<1:30`, `age>2w` - Durations
//! - `date>2015-03-12` - Dates, by day or by minute with a time part
//!
//! ## Nested Collections
//! - `skins(active+ & name:red)` - Some nested item matches the sub-filter
//! - `skins.active+` - Shorthand for `skins(active+)`
//!
//! ## Boolean Operators
//! - `&` or whitespace - AND
//! - `|` or `,` - OR
//! - `^` - exclusive OR
//! - `!` - NOT
//! - `()` - Grouping
//!
//! # Example
//!
//! ```
//! use qfilter::filter::{parse, Tester, TestEntry, Value};
//!
//! struct Car {
//!     brand: &'static str,
//!     year: i64,
//! }
//!
//! struct CarTester;
//!
//! impl Tester<Car> for CarTester {
//!     fn test(&self, car: &Car, key: Option<&str>, entry: &TestEntry) -> bool {
//!         match key {
//!             None | Some("brand") => entry.test(&Value::Str(car.brand)),
//!             Some("year") => entry.test(&Value::from(car.year)),
//!             Some(_) => false,
//!         }
//!     }
//! }
//!
//! let filter = parse("brand:ferrari & year>=2015");
//! assert!(filter.test(&CarTester, &Car { brand: "Ferrari", year: 2017 }));
//! assert!(!filter.test(&CarTester, &Car { brand: "Ferrari", year: 2003 }));
//! ```

mod ast;
mod entry;
pub mod glob;
mod parser;
pub mod splitter;
mod tester;
pub mod units;

pub use ast::{Filter, FilterTreeNode};
pub use entry::{Comparison, TestEntry, Value, NUMBER_TOLERANCE};
pub use parser::{parse, FilterParser, MAX_DEPTH, MAX_TERMS};
pub use splitter::{FilterPropertyValue, Operator};
pub use tester::Tester;
pub use units::{Recognizer, Recognizers};

#[cfg(test)]
mod tests;
