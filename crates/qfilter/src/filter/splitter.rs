//! Splits the `key<op>value` head off a literal.

use std::borrow::Cow;
use std::fmt;

use super::entry::Comparison;

/// Comparison operator written between a key and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    /// `:` - contains, or equals for numbers.
    Same,
    /// `+` - property is truthy.
    True,
    /// `-` or `−` - property is falsy.
    False,
    /// `>`
    More,
    /// `<`
    Less,
    /// `≥`, `>=` or `=>`
    MoreEqual,
    /// `≤`, `<=` or `=<`
    LessEqual,
    /// `=` - whole-value match.
    Equal,
}

impl Operator {
    /// Maps a single operator character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            ':' => Some(Operator::Same),
            '+' => Some(Operator::True),
            '-' | '−' => Some(Operator::False),
            '>' => Some(Operator::More),
            '<' => Some(Operator::Less),
            '≥' => Some(Operator::MoreEqual),
            '≤' => Some(Operator::LessEqual),
            '=' => Some(Operator::Equal),
            _ => None,
        }
    }

    /// Maps a two-character alias.
    pub fn from_pair(first: char, second: char) -> Option<Self> {
        match (first, second) {
            ('>', '=') | ('=', '>') => Some(Operator::MoreEqual),
            ('<', '=') | ('=', '<') => Some(Operator::LessEqual),
            _ => None,
        }
    }

    /// The ordering comparison this operator stands for.
    ///
    /// `Same` compares as equality; `True` and `False` have none.
    pub fn comparison(self) -> Option<Comparison> {
        match self {
            Operator::Same | Operator::Equal => Some(Comparison::Equal),
            Operator::More => Some(Comparison::More),
            Operator::Less => Some(Comparison::Less),
            Operator::MoreEqual => Some(Comparison::MoreEqual),
            Operator::LessEqual => Some(Comparison::LessEqual),
            Operator::True | Operator::False => None,
        }
    }

    /// Whether the operator only stands at the end of a literal.
    fn is_flag(self) -> bool {
        matches!(self, Operator::True | Operator::False)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            Operator::Same => ":",
            Operator::True => "+",
            Operator::False => "-",
            Operator::More => ">",
            Operator::Less => "<",
            Operator::MoreEqual => ">=",
            Operator::LessEqual => "<=",
            Operator::Equal => "=",
        };
        f.write_str(symbol)
    }
}

/// Operators that may be surrounded by spaces (`year > 2000`).
pub(crate) fn is_spaced_operator(c: char) -> bool {
    matches!(c, ':' | '<' | '>' | '≥' | '≤' | '=')
}

/// A literal split into its key, operator and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterPropertyValue {
    /// Collection key for `child.key<op>value`.
    pub child_key: Option<String>,
    /// Lower-cased property key.
    pub key: String,
    /// Operator between key and value.
    pub operator: Operator,
    /// Raw value text.
    pub value: String,
}

/// Splits `text` into key, operator and value.
///
/// Returns `None` when the text does not start with an ASCII-letter key
/// followed by an operator. `+`, `-` and `−` only count when nothing follows
/// them, so `ks-ferrari` stays a plain literal while `active-` does not.
pub fn split_value(text: &str) -> Option<FilterPropertyValue> {
    let key_len = ascii_letters(text);
    if key_len == 0 {
        return None;
    }
    let mut key = &text[..key_len];
    let mut child_key = None;
    let mut rest = &text[key_len..];

    if let Some(after_dot) = rest.strip_prefix('.') {
        let child_len = ascii_letters(after_dot);
        if child_len == 0 {
            return None;
        }
        child_key = Some(key);
        key = &after_dot[..child_len];
        rest = &after_dot[child_len..];
    }

    let rest = rest.trim_start();
    let (operator, operator_len) = read_operator(rest)?;
    let value = rest[operator_len..].trim_start();
    if operator.is_flag() && !value.is_empty() {
        return None;
    }

    Some(FilterPropertyValue {
        child_key: child_key.map(str::to_ascii_lowercase),
        key: key.to_ascii_lowercase(),
        operator,
        value: value.to_string(),
    })
}

/// Returns true if `text` is a bare key (`letters` or `letters.letters`).
pub(crate) fn is_key(text: &str) -> bool {
    let key_len = ascii_letters(text);
    if key_len == 0 {
        return false;
    }
    match text[key_len..].strip_prefix('.') {
        Some(child) => {
            let child_len = ascii_letters(child);
            child_len > 0 && child_len == child.len()
        }
        None => key_len == text.len(),
    }
}

/// Rewrites `#tag` to `tag:tag`.
pub fn expand_tag(text: &str) -> Cow<'_, str> {
    match text.strip_prefix('#') {
        Some(tag) if !tag.is_empty() => Cow::Owned(format!("tag:{tag}")),
        _ => Cow::Borrowed(text),
    }
}

fn ascii_letters(text: &str) -> usize {
    text.find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(text.len())
}

fn read_operator(text: &str) -> Option<(Operator, usize)> {
    let mut chars = text.chars();
    let first = chars.next()?;
    if let Some(second) = chars.next() {
        if let Some(operator) = Operator::from_pair(first, second) {
            return Some((operator, first.len_utf8() + second.len_utf8()));
        }
    }
    Operator::from_char(first).map(|operator| (operator, first.len_utf8()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(text: &str) -> (Option<String>, String, Operator, String) {
        let value = split_value(text).unwrap_or_else(|| panic!("{text} should split"));
        (value.child_key, value.key, value.operator, value.value)
    }

    #[test]
    fn test_single_char_operators() {
        assert_eq!(
            split("brand:ferrari"),
            (None, "brand".into(), Operator::Same, "ferrari".into())
        );
        assert_eq!(split("year>2000").2, Operator::More);
        assert_eq!(split("year<2000").2, Operator::Less);
        assert_eq!(split("year=2000").2, Operator::Equal);
        assert_eq!(split("year≥2000").2, Operator::MoreEqual);
        assert_eq!(split("year≤2000").2, Operator::LessEqual);
    }

    #[test]
    fn test_two_char_aliases() {
        assert_eq!(split("year>=2015").2, Operator::MoreEqual);
        assert_eq!(split("year=>2015").2, Operator::MoreEqual);
        assert_eq!(split("year<=2015").2, Operator::LessEqual);
        assert_eq!(split("year=<2015").2, Operator::LessEqual);
        assert_eq!(split("year>=2015").3, "2015");
    }

    #[test]
    fn test_flags() {
        assert_eq!(
            split("active+"),
            (None, "active".into(), Operator::True, String::new())
        );
        assert_eq!(split("active-").2, Operator::False);
        assert_eq!(split("active−").2, Operator::False);
        assert!(split_value("ks-ferrari").is_none());
        assert!(split_value("a+b").is_none());
    }

    #[test]
    fn test_key_is_lowercased() {
        assert_eq!(split("Brand:Ferrari").1, "brand");
        assert_eq!(split("Brand:Ferrari").3, "Ferrari");
    }

    #[test]
    fn test_spaces_around_operator() {
        assert_eq!(
            split("year > 2000"),
            (None, "year".into(), Operator::More, "2000".into())
        );
    }

    #[test]
    fn test_child_key() {
        assert_eq!(
            split("skins.active+"),
            (
                Some("skins".into()),
                "active".into(),
                Operator::True,
                String::new()
            )
        );
        assert!(split_value("skins.:x").is_none());
    }

    #[test]
    fn test_no_split() {
        assert!(split_value("ferrari").is_none());
        assert!(split_value("ks_ferrari").is_none());
        assert!(split_value("2015-03-12").is_none());
        assert!(split_value(":x").is_none());
        assert!(split_value("").is_none());
    }

    #[test]
    fn test_is_key() {
        assert!(is_key("year"));
        assert!(is_key("skins.name"));
        assert!(!is_key("year2"));
        assert!(!is_key("skins."));
        assert!(!is_key(""));
    }

    #[test]
    fn test_expand_tag() {
        assert_eq!(expand_tag("#favorite"), "tag:favorite");
        assert_eq!(expand_tag("#"), "#");
        assert_eq!(expand_tag("favorite"), "favorite");
    }
}
