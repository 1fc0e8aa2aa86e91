//! Abstract Syntax Tree (AST) for filter expressions.

use std::fmt;

use super::entry::TestEntry;
use super::tester::Tester;

/// A node of a compiled filter.
///
/// Nodes are immutable once built; the constructors below drop [`Empty`]
/// operands so a missing side of a binary operator never changes the result.
///
/// [`Empty`]: FilterTreeNode::Empty
#[derive(Debug, Clone, PartialEq)]
pub enum FilterTreeNode {
    /// A predicate tested against one property, or the default property
    /// when `key` is `None`.
    Value {
        /// Lower-cased property key.
        key: Option<String>,
        /// Predicate applied to the property value.
        entry: TestEntry,
    },

    /// Logical AND of two nodes.
    And(Box<FilterTreeNode>, Box<FilterTreeNode>),

    /// Logical OR of two nodes.
    Or(Box<FilterTreeNode>, Box<FilterTreeNode>),

    /// Exclusive OR of two nodes (`^`).
    Nor(Box<FilterTreeNode>, Box<FilterTreeNode>),

    /// Logical NOT of a node.
    Not(Box<FilterTreeNode>),

    /// A sub-filter applied to a nested collection property.
    Child {
        /// Lower-cased collection key.
        key: String,
        /// Filter evaluated against the nested items.
        filter: Box<Filter>,
    },

    /// Matches everything.
    Empty,
}

impl FilterTreeNode {
    /// Creates a keyed or keyless value node.
    pub fn value(key: Option<&str>, entry: TestEntry) -> Self {
        FilterTreeNode::Value {
            key: key.map(str::to_string),
            entry,
        }
    }

    /// Creates a node matching nothing.
    pub fn never() -> Self {
        FilterTreeNode::value(None, TestEntry::Const(false))
    }

    /// Creates an AND node.
    pub fn and(left: FilterTreeNode, right: FilterTreeNode) -> Self {
        match (left, right) {
            (FilterTreeNode::Empty, other) | (other, FilterTreeNode::Empty) => other,
            (left, right) => FilterTreeNode::And(Box::new(left), Box::new(right)),
        }
    }

    /// Creates an OR node.
    pub fn or(left: FilterTreeNode, right: FilterTreeNode) -> Self {
        match (left, right) {
            (FilterTreeNode::Empty, other) | (other, FilterTreeNode::Empty) => other,
            (left, right) => FilterTreeNode::Or(Box::new(left), Box::new(right)),
        }
    }

    /// Creates an exclusive OR node.
    pub fn nor(left: FilterTreeNode, right: FilterTreeNode) -> Self {
        match (left, right) {
            (FilterTreeNode::Empty, other) | (other, FilterTreeNode::Empty) => other,
            (left, right) => FilterTreeNode::Nor(Box::new(left), Box::new(right)),
        }
    }

    /// Creates a NOT node. Negating [`FilterTreeNode::Empty`] keeps it empty.
    pub fn negate(inner: FilterTreeNode) -> Self {
        match inner {
            FilterTreeNode::Empty => FilterTreeNode::Empty,
            inner => FilterTreeNode::Not(Box::new(inner)),
        }
    }

    /// Creates a child node.
    pub fn child(key: impl Into<String>, filter: Filter) -> Self {
        FilterTreeNode::Child {
            key: key.into(),
            filter: Box::new(filter),
        }
    }

    /// Evaluates the node for one item.
    pub fn test<T: ?Sized, S: Tester<T> + ?Sized>(&self, tester: &S, item: &T) -> bool {
        match self {
            FilterTreeNode::Value { key, entry } => tester.test(item, key.as_deref(), entry),
            FilterTreeNode::And(left, right) => {
                left.test(tester, item) && right.test(tester, item)
            }
            FilterTreeNode::Or(left, right) => {
                left.test(tester, item) || right.test(tester, item)
            }
            FilterTreeNode::Nor(left, right) => {
                let left = left.test(tester, item);
                let right = right.test(tester, item);
                left ^ right
            }
            FilterTreeNode::Not(inner) => !inner.test(tester, item),
            FilterTreeNode::Child { key, filter } => tester.test_child(item, key, filter),
            FilterTreeNode::Empty => true,
        }
    }
}

impl fmt::Display for FilterTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterTreeNode::Value {
                key: Some(key),
                entry,
            } => write!(f, "{key} {entry}"),
            FilterTreeNode::Value { key: None, entry } => write!(f, "{entry}"),
            FilterTreeNode::And(left, right) => write!(f, "({left} & {right})"),
            FilterTreeNode::Or(left, right) => write!(f, "({left} | {right})"),
            FilterTreeNode::Nor(left, right) => write!(f, "({left} ^ {right})"),
            FilterTreeNode::Not(inner) => write!(f, "!{inner}"),
            FilterTreeNode::Child { key, filter } => write!(f, "{key}({})", filter.root),
            FilterTreeNode::Empty => f.write_str("*"),
        }
    }
}

/// A compiled filter: the tree plus the property keys it references.
///
/// Filters never change after parsing and can be shared between threads.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    root: FilterTreeNode,
    properties: Vec<String>,
}

impl Default for Filter {
    fn default() -> Self {
        Self::new(FilterTreeNode::Empty, Vec::new())
    }
}

impl Filter {
    /// Wraps a tree and its de-duplicated property keys.
    pub fn new(root: FilterTreeNode, properties: Vec<String>) -> Self {
        Self { root, properties }
    }

    /// The root node.
    pub fn root(&self) -> &FilterTreeNode {
        &self.root
    }

    /// Distinct property keys referenced at this level, in order of appearance.
    pub fn properties(&self) -> &[String] {
        &self.properties
    }

    /// Returns true if the filter matches everything.
    pub fn is_empty(&self) -> bool {
        self.root == FilterTreeNode::Empty
    }

    /// Returns true if `item` passes the filter.
    pub fn test<T: ?Sized, S: Tester<T> + ?Sized>(&self, tester: &S, item: &T) -> bool {
        self.root.test(tester, item)
    }

    /// Returns the items of `items` passing the filter.
    pub fn filter_items<'b, T, S: Tester<T> + ?Sized>(
        &self,
        tester: &S,
        items: &'b [T],
    ) -> Vec<&'b T> {
        items.iter().filter(|item| self.test(tester, *item)).collect()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}
