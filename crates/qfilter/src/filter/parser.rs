//! Recursive descent parser for filter expressions.

use std::convert::Infallible;
use std::str::FromStr;

use super::ast::{Filter, FilterTreeNode};
use super::entry::{parse_number, TestEntry};
use super::glob::{compile_glob, compile_regex, is_glob, unescape};
use super::splitter::{expand_tag, is_key, is_spaced_operator, split_value, Operator};
use super::units::Recognizers;

/// Deepest group nesting parsed; deeper groups match nothing.
pub const MAX_DEPTH: usize = 64;

/// Most values a filter may hold; a longer filter matches nothing.
pub const MAX_TERMS: usize = 1024;

/// Parser for filter expressions.
///
/// The parser works directly on characters, without a separate lexer, and
/// never fails: malformed fragments become predicates that match nothing.
///
/// # Grammar
///
/// ```text
/// filter ::= or
/// or     ::= nor (("|" | ",") nor)*
/// nor    ::= and ("^" and)*
/// and    ::= not (("&" | <whitespace>) not)*
/// not    ::= "!"* value
/// value  ::= literal | "(" filter ")" | key "(" filter ")"
/// ```
///
/// # Operator Precedence (highest to lowest)
///
/// 1. `!` (NOT) - unary
/// 2. `&` or whitespace (AND)
/// 3. `^` (exclusive OR)
/// 4. `|` or `,` (OR)
///
/// # Example
///
/// ```
/// use qfilter::{FilterParser, FilterTreeNode};
///
/// let parser = FilterParser::default();
/// let filter = parser.parse("brand:ferrari & year>=2015");
/// assert!(matches!(filter.root(), FilterTreeNode::And(_, _)));
/// assert_eq!(filter.properties(), ["brand", "year"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterParser {
    recognizers: Recognizers,
}

impl FilterParser {
    /// Creates a parser consulting `recognizers` in order.
    pub fn new(recognizers: Recognizers) -> Self {
        Self { recognizers }
    }

    /// The recognizers this parser consults.
    pub fn recognizers(&self) -> &Recognizers {
        &self.recognizers
    }

    /// Parses a filter expression.
    ///
    /// An empty expression matches everything.
    pub fn parse(&self, input: &str) -> Filter {
        let mut state = ParseState::new(self, input);
        let mut root = state.parse_sequence(false);
        if state.truncated {
            tracing::debug!(limit = MAX_TERMS, "filter has too many values, matching nothing");
            root = FilterTreeNode::never();
        }
        let filter = Filter::new(root, state.properties);
        tracing::trace!(input, filter = %filter, "parsed filter");
        filter
    }

    /// Builds the predicate for one value.
    ///
    /// Flags and quoted values are handled first, then the recognizers get their
    /// turn, then plain numbers (keyed values only), wildcards and strings.
    pub fn create_entry(&self, key: Option<&str>, operator: Operator, value: &str) -> TestEntry {
        match operator {
            Operator::True => return TestEntry::Bool(true),
            Operator::False => return TestEntry::Bool(false),
            _ => {}
        }

        if let Some((quote, inner)) = quoted_parts(value) {
            return match quote {
                '"' => TestEntry::string(inner, true, true),
                '\'' => TestEntry::string(inner, false, true),
                _ => compile_regex(inner).map_or(TestEntry::Const(false), TestEntry::Regex),
            };
        }

        if let Some(entry) = self.recognizers.create(key, operator, value) {
            return entry;
        }

        let Some(comparison) = operator.comparison() else {
            return TestEntry::Const(false);
        };

        if value.is_empty() {
            tracing::debug!(?key, %operator, "missing value, matching nothing");
            return TestEntry::Const(false);
        }

        if key.is_some() {
            if let Some(number) = parse_number(value) {
                return TestEntry::number(comparison, number);
            }
        }

        match operator {
            Operator::Same | Operator::Equal if is_glob(value) => {
                compile_glob(value).map_or(TestEntry::Const(false), TestEntry::Regex)
            }
            Operator::Same => TestEntry::string(&unescape(value), false, false),
            Operator::Equal => TestEntry::string(&unescape(value), true, false),
            _ => {
                tracing::debug!(value, %operator, "ordering a non-number, matching nothing");
                TestEntry::Const(false)
            }
        }
    }
}

/// Parses `input` with the default recognizers.
pub fn parse(input: &str) -> Filter {
    FilterParser::default().parse(input)
}

impl FromStr for Filter {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(parse(s))
    }
}

/// A parsed operand and, for a plain unkeyed literal, its raw text.
struct Operand {
    node: FilterTreeNode,
    bare: Option<String>,
}

impl Operand {
    fn node(node: FilterTreeNode) -> Self {
        Self { node, bare: None }
    }

    fn empty() -> Self {
        Self::node(FilterTreeNode::Empty)
    }
}

/// Key and negation a following bare literal inherits.
type KeyContext = Option<(String, bool)>;

fn key_context(node: &FilterTreeNode) -> KeyContext {
    match node {
        FilterTreeNode::Value { key: Some(key), .. } => Some((key.clone(), false)),
        FilterTreeNode::Not(inner) => match inner.as_ref() {
            FilterTreeNode::Value { key: Some(key), .. } => Some((key.clone(), true)),
            _ => None,
        },
        _ => None,
    }
}

/// Characters that end an operand.
fn ends_operand(c: char) -> bool {
    matches!(c, '&' | '|' | ',' | '^' | ')')
}

/// Splits a value wrapped in matching quotes into the quote and the inner text.
fn quoted_parts(value: &str) -> Option<(char, &str)> {
    let quote = value.chars().next()?;
    if !matches!(quote, '"' | '\'' | '`') {
        return None;
    }
    let inner = value[quote.len_utf8()..].strip_suffix(quote)?;
    Some((quote, inner))
}

struct ParseState<'p> {
    parser: &'p FilterParser,
    chars: Vec<char>,
    position: usize,
    depth: usize,
    terms: usize,
    truncated: bool,
    properties: Vec<String>,
}

impl<'p> ParseState<'p> {
    fn new(parser: &'p FilterParser, input: &str) -> Self {
        Self {
            parser,
            chars: input.chars().collect(),
            position: 0,
            depth: 0,
            terms: 0,
            truncated: false,
            properties: Vec::new(),
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.position).copied()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    /// Skips whitespace, returning whether any was skipped.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek().is_some_and(char::is_whitespace) {
            self.position += 1;
        }
        self.position > start
    }

    fn next_non_whitespace(&self) -> Option<char> {
        self.chars[self.position..]
            .iter()
            .copied()
            .find(|c| !c.is_whitespace())
    }

    fn add_property(&mut self, key: &str) {
        if !self.properties.iter().any(|p| p == key) {
            self.properties.push(key.to_string());
        }
    }

    /// Parses expressions until the end of input (or `)` inside a group).
    ///
    /// Anything left after a complete expression, such as a stray `)` at the top
    /// level, is skipped and the rest is AND-ed on.
    fn parse_sequence(&mut self, in_group: bool) -> FilterTreeNode {
        let mut node = self.parse_or().node;
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => break,
                Some(')') if in_group => break,
                Some(')') => {
                    tracing::debug!(position = self.position, "skipping unbalanced ')'");
                    self.advance();
                }
                Some(_) => {}
            }

            let start = self.position;
            let rest = self.parse_or().node;
            if self.position == start {
                self.advance();
            }
            node = FilterTreeNode::and(node, rest);
        }
        node
    }

    /// Parses OR expressions: `nor (("|" | ",") nor)*`
    fn parse_or(&mut self) -> Operand {
        let mut result = self.parse_nor();
        let mut context = key_context(&result.node);

        loop {
            self.skip_whitespace();
            let separator = match self.peek() {
                Some(c @ ('|' | ',')) => c,
                _ => break,
            };
            self.advance();

            let right = self.parse_nor();
            let right = if separator == ',' {
                self.inherit(&mut context, right)
            } else {
                context = key_context(&right.node);
                right.node
            };
            result = Operand::node(FilterTreeNode::or(result.node, right));
        }

        result
    }

    /// Parses exclusive OR expressions: `and ("^" and)*`
    fn parse_nor(&mut self) -> Operand {
        let mut result = self.parse_and();

        loop {
            self.skip_whitespace();
            if self.peek() != Some('^') {
                break;
            }
            self.advance();

            let right = self.parse_and();
            result = Operand::node(FilterTreeNode::nor(result.node, right.node));
        }

        result
    }

    /// Parses AND expressions: `not (("&" | <whitespace>) not)*`
    fn parse_and(&mut self) -> Operand {
        let mut result = self.parse_not();
        let mut context = key_context(&result.node);

        loop {
            let spaced = self.skip_whitespace();
            let implicit = match self.peek() {
                Some('&') => {
                    self.advance();
                    false
                }
                Some(c) if spaced && !ends_operand(c) => true,
                _ => break,
            };

            let right = self.parse_not();
            let right = if implicit {
                self.inherit(&mut context, right)
            } else {
                context = key_context(&right.node);
                right.node
            };
            result = Operand::node(FilterTreeNode::and(result.node, right));
        }

        result
    }

    /// Gives a bare literal the key of the operand before it.
    ///
    /// `year>2000,2010` reads as `year>2000 | year:2010`; a negated key
    /// (`!brand:bmw,audi`) passes its negation on as well.
    fn inherit(&self, context: &mut KeyContext, operand: Operand) -> FilterTreeNode {
        if let (Some((key, negated)), Some(raw)) = (context.as_ref(), operand.bare.as_deref()) {
            let entry = self.parser.create_entry(Some(key), Operator::Same, raw);
            let node = FilterTreeNode::value(Some(key), entry);
            return if *negated {
                FilterTreeNode::negate(node)
            } else {
                node
            };
        }
        *context = key_context(&operand.node);
        operand.node
    }

    /// Parses NOT expressions: `"!"* value`
    fn parse_not(&mut self) -> Operand {
        let mut negations = 0usize;
        loop {
            self.skip_whitespace();
            if self.peek() != Some('!') {
                break;
            }
            self.advance();
            negations += 1;
        }

        let operand = self.parse_value();
        match negations {
            0 => operand,
            n if n % 2 == 1 => Operand::node(FilterTreeNode::negate(operand.node)),
            _ => Operand::node(operand.node),
        }
    }

    /// Parses a literal or a group; a missing operand is [`FilterTreeNode::Empty`].
    fn parse_value(&mut self) -> Operand {
        self.skip_whitespace();
        match self.peek() {
            None => Operand::empty(),
            Some(c) if ends_operand(c) => Operand::empty(),
            Some('(') => {
                self.advance();
                Operand::node(self.parse_group(None))
            }
            Some(_) => self.parse_literal(),
        }
    }

    fn parse_literal(&mut self) -> Operand {
        let text = self.read_literal();
        if text.is_empty() {
            return Operand::empty();
        }

        // Past the limit the rest is only consumed, which keeps the tree shallow.
        if !self.take_term() {
            if self.peek() == Some('(') {
                self.advance();
                self.skip_group();
            }
            return Operand::empty();
        }

        if self.peek() == Some('(') {
            self.advance();
            let key = unescape(&text).to_lowercase();
            return Operand::node(self.parse_group(Some(key)));
        }

        self.literal_node(&text)
    }

    /// Counts one more value, or returns false once [`MAX_TERMS`] is reached.
    fn take_term(&mut self) -> bool {
        if self.terms >= MAX_TERMS {
            self.truncated = true;
            return false;
        }
        self.terms += 1;
        true
    }

    /// Parses the inside of a group whose `(` was just consumed.
    fn parse_group(&mut self, child_key: Option<String>) -> FilterTreeNode {
        if self.depth >= MAX_DEPTH {
            tracing::debug!(depth = self.depth, "filter nested too deeply, matching nothing");
            self.skip_group();
            return if self.take_term() {
                FilterTreeNode::never()
            } else {
                FilterTreeNode::Empty
            };
        }

        self.depth += 1;
        let outer = std::mem::take(&mut self.properties);
        let inner = self.parse_sequence(true);
        let inner_properties = std::mem::replace(&mut self.properties, outer);
        self.depth -= 1;

        if self.advance() != Some(')') {
            tracing::debug!("unclosed group, matching nothing");
            return FilterTreeNode::never();
        }

        match child_key {
            Some(key) => {
                self.add_property(&key);
                FilterTreeNode::child(key, Filter::new(inner, inner_properties))
            }
            None => {
                for key in &inner_properties {
                    self.add_property(key);
                }
                inner
            }
        }
    }

    /// Skips to the `)` closing the current group.
    fn skip_group(&mut self) {
        let mut level = 1usize;
        while let Some(c) = self.advance() {
            match c {
                '\\' => {
                    self.advance();
                }
                '(' => level += 1,
                ')' => {
                    level -= 1;
                    if level == 0 {
                        break;
                    }
                }
                _ => {}
            }
        }
    }

    /// Reads literal text up to whitespace or a control character.
    ///
    /// Escapes are resolved except for `\*`, `\?`, `\\` and escaped quotes, which
    /// stay escaped for the wildcard translator and so never open a quoted value.
    fn read_literal(&mut self) -> String {
        let mut text = String::new();
        while let Some(c) = self.peek() {
            match c {
                '\\' => {
                    self.advance();
                    match self.advance() {
                        Some(escaped @ ('*' | '?' | '\\' | '"' | '\'' | '`')) => {
                            text.push('\\');
                            text.push(escaped);
                        }
                        Some(escaped) => text.push(escaped),
                        None => text.push_str("\\\\"),
                    }
                }
                '"' | '\'' | '`' if at_value_start(&text) => self.read_quoted(c, &mut text),
                '&' | '|' | ',' | '^' | '(' | ')' => break,
                c if c.is_whitespace() => {
                    if !self.whitespace_joins(&text) {
                        break;
                    }
                    self.skip_whitespace();
                }
                _ => {
                    text.push(c);
                    self.advance();
                }
            }
        }
        text
    }

    /// Copies a quoted section verbatim, quotes included.
    ///
    /// An unterminated quote runs to the end of input.
    fn read_quoted(&mut self, quote: char, text: &mut String) {
        text.push(quote);
        self.advance();
        while let Some(c) = self.advance() {
            text.push(c);
            if c == quote {
                break;
            }
        }
    }

    /// Whether whitespace at the current position belongs to the literal.
    ///
    /// Only the spaces around a key's operator do: `year > 2000`.
    fn whitespace_joins(&self, text: &str) -> bool {
        let Some(next) = self.next_non_whitespace() else {
            return false;
        };
        if is_key(text) {
            return is_spaced_operator(next);
        }
        let Some(split) = split_value(text) else {
            return false;
        };
        if split.operator.comparison().is_none() {
            return false;
        }
        if split.value.is_empty() {
            return !ends_operand(next) && next != '(';
        }
        self.unit_follows(&split.key, split.operator, &split.value)
    }

    /// Whether the next word is a unit for the number just read: `len>5 km`.
    fn unit_follows(&self, key: &str, operator: Operator, value: &str) -> bool {
        if parse_number(value).is_none() {
            return false;
        }
        let word: String = self.chars[self.position..]
            .iter()
            .copied()
            .skip_while(|c| c.is_whitespace())
            .take_while(|c| !c.is_whitespace() && !ends_operand(*c) && *c != '(')
            .collect();
        if word.is_empty() || !word.chars().all(char::is_alphabetic) {
            return false;
        }
        self.parser
            .recognizers
            .create(Some(key), operator, &format!("{value}{word}"))
            .is_some()
    }

    fn literal_node(&mut self, text: &str) -> Operand {
        let text = expand_tag(text);

        if let Some(split) = split_value(&text) {
            let entry = self
                .parser
                .create_entry(Some(&split.key), split.operator, &split.value);
            let node = FilterTreeNode::value(Some(&split.key), entry);
            return match split.child_key {
                Some(child_key) => {
                    self.add_property(&child_key);
                    let filter = Filter::new(node, vec![split.key]);
                    Operand::node(FilterTreeNode::child(child_key, filter))
                }
                None => {
                    self.add_property(&split.key);
                    Operand::node(node)
                }
            };
        }

        let entry = self.parser.create_entry(None, Operator::Same, &text);
        let bare = quoted_parts(&text).is_none().then(|| text.to_string());
        Operand {
            node: FilterTreeNode::value(None, entry),
            bare,
        }
    }
}

/// Whether a quote at this point opens a quoted value.
fn at_value_start(text: &str) -> bool {
    text.is_empty()
        || text == "#"
        || split_value(text).is_some_and(|split| split.value.is_empty())
}
