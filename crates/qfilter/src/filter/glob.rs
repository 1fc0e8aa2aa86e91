//! Wildcard and raw regular expression support.
//!
//! Literals keep a backslash in front of an escaped `*`, `?` or `\` so the
//! translator emits them verbatim; every other escape has already been
//! resolved by the parser.

use regex::{Regex, RegexBuilder};

/// Returns true if `text` holds an unescaped `*` or `?`.
pub fn is_glob(text: &str) -> bool {
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '*' | '?' => return true,
            _ => {}
        }
    }
    false
}

/// Resolves the escapes the parser kept for the translator.
pub fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some(escaped) => out.push(escaped),
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Translates a wildcard pattern into an anchored regular expression source.
pub fn glob_to_regex(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 8);
    pattern.push('^');
    let mut chars = text.chars();
    while let Some(c) = chars.next() {
        match c {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            '\\' => {
                let escaped = chars.next().unwrap_or('\\');
                pattern.push_str(&regex::escape(escaped.encode_utf8(&mut [0; 4])));
            }
            other => pattern.push_str(&regex::escape(other.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');
    pattern
}

/// Compiles a wildcard pattern, case-insensitively.
pub fn compile_glob(text: &str) -> Option<Regex> {
    compile(&glob_to_regex(text))
}

/// Compiles a user-written regular expression, case-insensitively.
///
/// Returns `None` when the expression is invalid.
pub fn compile_regex(pattern: &str) -> Option<Regex> {
    compile(pattern)
}

fn compile(pattern: &str) -> Option<Regex> {
    match RegexBuilder::new(pattern)
        .case_insensitive(true)
        .dot_matches_new_line(true)
        .build()
    {
        Ok(regex) => Some(regex),
        Err(e) => {
            tracing::debug!(pattern, error = %e, "invalid regular expression, matching nothing");
            None
        }
    }
}
